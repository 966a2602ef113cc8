//! ActivityService - message and task mutations on a deal's feed.
//!
//! Every mutation loads the current record, validates it, writes it back and
//! returns the stored record together with its re-rendered timeline entry.
//! A rejected transition never reaches the store.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{
    ActivityError, DealId, Direction, Message, MessageId, MessageUpdate, NewMessage, NewTask,
    PendingCompletion, StoreError, Task, TaskId,
};
use crate::ports::{MessageStore, TaskStore};
use crate::timeline::{TimelineAggregator, TimelineEntry};

/// A stored record and its refreshed feed entry (`None` once hidden).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recorded<T> {
    pub record: T,
    pub entry: Option<TimelineEntry>,
}

pub struct ActivityService {
    messages: Arc<dyn MessageStore>,
    tasks: Arc<dyn TaskStore>,
    aggregator: TimelineAggregator,
}

impl ActivityService {
    pub fn new(
        messages: Arc<dyn MessageStore>,
        tasks: Arc<dyn TaskStore>,
        aggregator: TimelineAggregator,
    ) -> Self {
        Self {
            messages,
            tasks,
            aggregator,
        }
    }

    async fn load_message(&self, id: MessageId) -> Result<Message, ActivityError> {
        self.messages
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
    }

    async fn load_task(&self, id: TaskId) -> Result<Task, ActivityError> {
        self.tasks
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
    }

    async fn render_message(&self, message: Message) -> Result<Recorded<Message>, ActivityError> {
        let target = match message.reply_to {
            Some(id) => self.messages.get(id).await?,
            None => None,
        };
        let entry = self.aggregator.render_message(&message, target.as_ref());
        Ok(Recorded {
            record: message,
            entry,
        })
    }

    fn render_task(&self, task: Task) -> Recorded<Task> {
        Recorded {
            entry: Some(self.aggregator.render_task(&task)),
            record: task,
        }
    }

    /// Load, mutate, store. `f` failing leaves the stored task untouched.
    async fn mutate_task<F>(&self, id: TaskId, f: F) -> Result<Recorded<Task>, ActivityError>
    where
        F: FnOnce(&mut Task) -> Result<(), ActivityError> + Send,
    {
        let mut task = self.load_task(id).await?;
        f(&mut task)?;
        let task = self.tasks.update(task).await?;
        debug!(task_id = %task.id, status = ?task.status(), "task updated");
        Ok(self.render_task(task))
    }

    // -- messages --

    /// Post a message, optionally as a reply.
    ///
    /// The reply target must exist and belong to the same deal; a deleted
    /// target is allowed and renders as a placeholder.
    pub async fn post_message(
        &self,
        deal_id: DealId,
        text: &str,
        direction: Direction,
        reply_to: Option<MessageId>,
    ) -> Result<Recorded<Message>, ActivityError> {
        if text.trim().is_empty() {
            return Err(ActivityError::EmptyText);
        }
        if let Some(target_id) = reply_to {
            let target = self
                .messages
                .get(target_id)
                .await?
                .ok_or(ActivityError::ReplyTargetNotFound(target_id))?;
            if target.deal_id != deal_id {
                return Err(ActivityError::CrossDealReply(target_id));
            }
        }

        let message = self
            .messages
            .create(NewMessage {
                deal_id,
                text: text.to_string(),
                direction,
                reply_to,
            })
            .await?;
        info!(message_id = %message.id, %deal_id, "posted message");
        self.render_message(message).await
    }

    pub async fn edit_message(
        &self,
        id: MessageId,
        text: &str,
    ) -> Result<Recorded<Message>, ActivityError> {
        let current = self.load_message(id).await?;
        if current.is_deleted() {
            return Err(ActivityError::MessageDeleted(id));
        }
        if text.trim().is_empty() {
            return Err(ActivityError::EmptyText);
        }
        let message = self
            .messages
            .update(
                id,
                MessageUpdate::Edit {
                    text: text.to_string(),
                },
            )
            .await?;
        debug!(message_id = %id, "edited message");
        self.render_message(message).await
    }

    /// Soft delete. Deleting twice keeps the first `deleted_at`.
    pub async fn delete_message(&self, id: MessageId) -> Result<Recorded<Message>, ActivityError> {
        let current = self.load_message(id).await?;
        let message = if current.is_deleted() {
            current
        } else {
            let message = self.messages.update(id, MessageUpdate::Delete).await?;
            info!(message_id = %id, "deleted message");
            message
        };
        Ok(Recorded {
            record: message,
            entry: None,
        })
    }

    // -- tasks --

    pub async fn create_task(
        &self,
        deal_id: DealId,
        text: &str,
        subtasks: Vec<String>,
    ) -> Result<Recorded<Task>, ActivityError> {
        if text.trim().is_empty() {
            return Err(ActivityError::EmptyText);
        }
        let task = self
            .tasks
            .create(NewTask {
                deal_id,
                text: text.to_string(),
                subtasks,
            })
            .await?;
        info!(task_id = %task.id, %deal_id, "created task");
        Ok(self.render_task(task))
    }

    /// Open <-> InProgress.
    pub async fn toggle_task_progress(&self, id: TaskId) -> Result<Recorded<Task>, ActivityError> {
        self.mutate_task(id, |task| {
            task.toggle_progress()?;
            Ok(())
        })
        .await
    }

    /// Enter the "awaiting completion comment" step. Nothing is stored until
    /// the returned token is committed.
    pub async fn request_task_completion(
        &self,
        id: TaskId,
    ) -> Result<PendingCompletion, ActivityError> {
        let task = self.load_task(id).await?;
        Ok(task.request_completion()?)
    }

    pub async fn commit_task_completion(
        &self,
        pending: PendingCompletion,
        comment: Option<&str>,
    ) -> Result<Recorded<Task>, ActivityError> {
        let comment = comment.map(str::to_string);
        let recorded = self
            .mutate_task(pending.task_id(), move |task| {
                pending.commit(task, comment.as_deref())?;
                Ok(())
            })
            .await?;
        info!(task_id = %recorded.record.id, "completed task");
        Ok(recorded)
    }

    pub async fn reopen_task(&self, id: TaskId) -> Result<Recorded<Task>, ActivityError> {
        self.mutate_task(id, |task| Ok(task.reopen()?)).await
    }

    pub async fn add_subtask(
        &self,
        id: TaskId,
        text: &str,
    ) -> Result<Recorded<Task>, ActivityError> {
        let text = text.to_string();
        self.mutate_task(id, move |task| Ok(task.add_subtask(&text)?))
            .await
    }

    /// Rejected while the task is done.
    pub async fn toggle_subtask(
        &self,
        id: TaskId,
        index: usize,
    ) -> Result<Recorded<Task>, ActivityError> {
        self.mutate_task(id, |task| {
            task.toggle_subtask(index)?;
            Ok(())
        })
        .await
    }
}
