//! dealflow-core
//!
//! 商談パイプラインのコア。会社の同定と商談アクティビティのタイムライン。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ID、会社、商談、メッセージ、タスク、エラー）
//! - **ports**: 抽象化レイヤー（CompanyStore, RegistryLookup, DealStore, MessageStore, TaskStore, Clock, IdGenerator）
//! - **impls**: 開発用・テスト用のインメモリ実装
//! - **resolver**: CompanyResolver（税番号・名前での照合、レジストリ照会、手動作成）
//! - **timeline**: TimelineAggregator とインクリメンタル更新される Timeline
//! - **app**: アプリケーション層（DealSaveOrchestrator, ActivityService, AppBuilder）
//! - **config**: CoreConfig

pub mod domain;
pub mod ports;
pub mod impls;
pub mod resolver;
pub mod timeline;
pub mod app;
pub mod config;
