//! Ports - 抽象化レイヤー
//!
//! 外部システム（RDB、企業レジストリ、時刻）との境界を trait で表す。
//!
//! # 設計原則
//! - コアはこれらの trait にだけ依存する
//! - ストア trait は `#[async_trait]` + `Send + Sync`（`Arc<dyn _>` で共有）
//! - 一意性の判定はストアの `create` だけが行う
//! - 開発用・テスト用の実装は `impls` にある

pub mod clock;
pub mod company_store;
pub mod deal_store;
pub mod id_generator;
pub mod message_store;
pub mod registry_lookup;
pub mod task_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::company_store::CompanyStore;
pub use self::deal_store::DealStore;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::message_store::MessageStore;
pub use self::registry_lookup::RegistryLookup;
pub use self::task_store::TaskStore;
