//! Domain - ドメインモデル
//!
//! ID、会社、商談、メッセージ、タスク、エラー型。
//! ストアや外部サービスには依存しない。

pub mod company;
pub mod deal;
pub mod errors;
pub mod ids;
pub mod message;
pub mod task;

pub use company::{
    BankDetails, Company, CompanyEnrichment, CompanyPatch, NewCompany, Provenance, TaxId,
    name_key,
};
pub use deal::{CompanyInput, Contact, Deal, DealForm, NewDeal, StageId};
pub use errors::{
    ActivityError, ErrorKind, LookupError, ResolveError, SaveError, StoreError,
    TaskTransitionError, TimelineError,
};
pub use ids::{CompanyId, DealId, Id, IdMarker, MessageId, TaskId};
pub use message::{Direction, Message, MessageUpdate, NewMessage};
pub use task::{NewTask, PendingCompletion, Subtask, Task, TaskRow, TaskStatus};
