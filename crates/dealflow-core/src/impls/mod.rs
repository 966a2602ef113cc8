//! Impls - 実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - InMemoryCompanyStore / InMemoryDealStore / InMemoryMessageStore / InMemoryTaskStore
//! - StaticRegistry: 固定レコードを返すレジストリ（障害のシミュレーション付き）
//!
//! # 本番用実装
//! RDB ストアやレジストリの HTTP クライアントはこの crate の外で同じ trait を実装する。

pub mod inmem_company;
pub mod inmem_deal;
pub mod inmem_message;
pub mod inmem_task;
pub mod static_registry;

pub use self::inmem_company::InMemoryCompanyStore;
pub use self::inmem_deal::InMemoryDealStore;
pub use self::inmem_message::InMemoryMessageStore;
pub use self::inmem_task::InMemoryTaskStore;
pub use self::static_registry::StaticRegistry;
