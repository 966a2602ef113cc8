//! TaskStore port.

use async_trait::async_trait;

use crate::domain::{DealId, NewTask, StoreError, Task, TaskId};

/// TaskStore persists deal tasks.
///
/// State transitions happen on the `Task` value; `update` writes the result
/// back as a whole. `id`, `deal_id` and `created_at` are never changed by an
/// update.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, task: NewTask) -> Result<Task, StoreError>;

    async fn get(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

    async fn list_by_deal(&self, deal_id: DealId) -> Result<Vec<Task>, StoreError>;

    async fn update(&self, task: Task) -> Result<Task, StoreError>;
}
