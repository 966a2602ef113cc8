//! App - アプリケーション層
//!
//! Ports を組み合わせて商談画面が必要とする操作を提供する。
//!
//! # コンポーネント
//! - **DealSaveOrchestrator**: 会社を同定してから商談を保存
//! - **ActivityService**: メッセージ・タスクの変更（更新後のタイムラインエントリを返す）
//! - **AppBuilder**: Ports を `DealflowApp` に組み立てる（不足があれば即エラー）

pub mod activity;
pub mod builder;
pub mod orchestrator;

pub use self::activity::{ActivityService, Recorded};
pub use self::builder::{AppBuilder, BuildError, DealflowApp};
pub use self::orchestrator::{DealSaveOrchestrator, SaveOptions, SavedDeal};
