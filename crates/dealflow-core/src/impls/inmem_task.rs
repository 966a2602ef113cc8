//! InMemoryTaskStore - development/test task store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DealId, NewTask, StoreError, Task, TaskId, TaskRow};
use crate::ports::{Clock, IdGenerator, SystemClock, TaskStore, UlidGenerator};

pub struct InMemoryTaskStore {
    tasks: Arc<Mutex<Vec<Task>>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTaskStore {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(Vec::new())),
            ids,
            clock,
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new(
            Arc::new(UlidGenerator::new(SystemClock)),
            Arc::new(SystemClock),
        )
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: NewTask) -> Result<Task, StoreError> {
        let task = task.into_task(self.ids.generate_task_id(), self.clock.now());
        if task.text.is_empty() {
            return Err(StoreError::Rejected("task text must not be empty".into()));
        }
        self.tasks.lock().await.push(task.clone());
        Ok(task)
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.lock().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_by_deal(&self, deal_id: DealId) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.lock().await;
        Ok(tasks.iter().filter(|t| t.deal_id == deal_id).cloned().collect())
    }

    async fn update(&self, task: Task) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.lock().await;
        let Some(stored) = tasks.iter_mut().find(|t| t.id == task.id) else {
            return Err(StoreError::NotFound(task.id.to_string()));
        };
        // deal_id and created_at are write-once
        let row = TaskRow {
            id: stored.id,
            deal_id: stored.deal_id,
            text: task.text.clone(),
            is_done: task.is_done(),
            in_progress: task.in_progress(),
            completion_comment: task.completion_comment().map(str::to_string),
            subtasks: task.subtasks().to_vec(),
            created_at: stored.created_at,
        };
        *stored = Task::from(row);
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_cannot_move_task_in_time_or_deal() {
        let store = InMemoryTaskStore::default();
        let deal_id = DealId::from_ulid(ulid::Ulid::new());
        let task = store
            .create(NewTask {
                deal_id,
                text: "Call back".into(),
                subtasks: vec!["dial".into()],
            })
            .await
            .unwrap();

        let mut changed = task.clone();
        changed.deal_id = DealId::from_ulid(ulid::Ulid::new());
        changed.created_at = task.created_at + chrono::Duration::days(1);
        changed.toggle_subtask(0).unwrap();

        let stored = store.update(changed).await.unwrap();
        assert_eq!(stored.deal_id, deal_id);
        assert_eq!(stored.created_at, task.created_at);
        assert!(stored.subtasks()[0].is_done);
        assert_eq!(store.list_by_deal(deal_id).await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn blank_task_is_rejected() {
        let store = InMemoryTaskStore::default();
        let err = store
            .create(NewTask {
                deal_id: DealId::from_ulid(ulid::Ulid::new()),
                text: "   ".into(),
                subtasks: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }
}
