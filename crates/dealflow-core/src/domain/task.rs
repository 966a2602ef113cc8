//! Deal tasks and their completion state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::TaskTransitionError;
use super::ids::{DealId, TaskId};

/// Persisted task status, derived from the `is_done`/`in_progress` flags.
///
/// State transitions:
/// - Open <-> InProgress (plain toggle)
/// - Open | InProgress -> (awaiting completion comment) -> Done
/// - Done -> Open (reopen clears the completion comment)
///
/// The "awaiting completion comment" step is never stored; it is the
/// [`PendingCompletion`] token held by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Done,
}

/// Checklist item. No identity of its own; addressed by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub text: String,
    pub is_done: bool,
}

impl Subtask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_done: false,
        }
    }
}

/// A task attached to a deal.
///
/// Invariant: `is_done` implies `!in_progress`. All mutations go through the
/// transition methods below so the invariant holds after every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaskRow")]
pub struct Task {
    pub id: TaskId,
    pub deal_id: DealId,
    pub text: String,
    is_done: bool,
    in_progress: bool,
    completion_comment: Option<String>,
    subtasks: Vec<Subtask>,
    pub created_at: DateTime<Utc>,
}

/// Task fields as a store hands them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: TaskId,
    pub deal_id: DealId,
    pub text: String,
    pub is_done: bool,
    pub in_progress: bool,
    pub completion_comment: Option<String>,
    pub subtasks: Vec<Subtask>,
    pub created_at: DateTime<Utc>,
}

/// A row that claims both done and in progress is read as done.
impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            deal_id: row.deal_id,
            text: row.text,
            is_done: row.is_done,
            in_progress: row.in_progress && !row.is_done,
            completion_comment: if row.is_done {
                row.completion_comment
            } else {
                None
            },
            subtasks: row.subtasks,
            created_at: row.created_at,
        }
    }
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn completion_comment(&self) -> Option<&str> {
        self.completion_comment.as_deref()
    }

    /// Subtasks exactly as stored.
    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    pub fn status(&self) -> TaskStatus {
        if self.is_done {
            TaskStatus::Done
        } else if self.in_progress {
            TaskStatus::InProgress
        } else {
            TaskStatus::Open
        }
    }

    /// Subtasks as they should be displayed: all done while the parent is done.
    pub fn effective_subtasks(&self) -> Vec<Subtask> {
        self.subtasks
            .iter()
            .map(|s| Subtask {
                text: s.text.clone(),
                is_done: self.is_done || s.is_done,
            })
            .collect()
    }

    /// Open <-> InProgress.
    pub fn toggle_progress(&mut self) -> Result<TaskStatus, TaskTransitionError> {
        match self.status() {
            TaskStatus::Open => self.in_progress = true,
            TaskStatus::InProgress => self.in_progress = false,
            TaskStatus::Done => return Err(TaskTransitionError::AlreadyDone),
        }
        Ok(self.status())
    }

    /// Open -> InProgress. Starting an in-progress task is a no-op.
    pub fn start(&mut self) -> Result<(), TaskTransitionError> {
        if self.is_done {
            return Err(TaskTransitionError::AlreadyDone);
        }
        self.in_progress = true;
        Ok(())
    }

    /// InProgress -> Open.
    pub fn stop(&mut self) -> Result<(), TaskTransitionError> {
        match self.status() {
            TaskStatus::InProgress => {
                self.in_progress = false;
                Ok(())
            }
            TaskStatus::Open => Err(TaskTransitionError::NotInProgress),
            TaskStatus::Done => Err(TaskTransitionError::AlreadyDone),
        }
    }

    /// Open | InProgress -> awaiting completion comment.
    pub fn request_completion(&self) -> Result<PendingCompletion, TaskTransitionError> {
        if self.is_done {
            return Err(TaskTransitionError::AlreadyDone);
        }
        Ok(PendingCompletion {
            task_id: self.id,
            from: self.status(),
        })
    }

    /// Done -> Open. Clears `in_progress` and the completion comment.
    pub fn reopen(&mut self) -> Result<(), TaskTransitionError> {
        if !self.is_done {
            return Err(TaskTransitionError::NotDone);
        }
        self.is_done = false;
        self.in_progress = false;
        self.completion_comment = None;
        Ok(())
    }

    /// Append a checklist item.
    pub fn add_subtask(&mut self, text: &str) -> Result<(), TaskTransitionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskTransitionError::EmptyText);
        }
        self.subtasks.push(Subtask::new(text));
        Ok(())
    }

    /// Flip one checklist item. Rejected, with no mutation, while the parent is done.
    pub fn toggle_subtask(&mut self, index: usize) -> Result<bool, TaskTransitionError> {
        if self.is_done {
            return Err(TaskTransitionError::SubtasksLocked);
        }
        let len = self.subtasks.len();
        let subtask = self
            .subtasks
            .get_mut(index)
            .ok_or(TaskTransitionError::SubtaskOutOfRange { index, len })?;
        subtask.is_done = !subtask.is_done;
        Ok(subtask.is_done)
    }

    /// Rename the task.
    pub fn set_text(&mut self, text: &str) -> Result<(), TaskTransitionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskTransitionError::EmptyText);
        }
        self.text = text.to_string();
        Ok(())
    }
}

/// Transient "awaiting completion comment" step of a single task.
///
/// Obtained from [`Task::request_completion`]; dropping it cancels the
/// completion without touching the task.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending completion does nothing until committed"]
pub struct PendingCompletion {
    task_id: TaskId,
    from: TaskStatus,
}

impl PendingCompletion {
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Status the task was in when completion was requested.
    pub fn from_status(&self) -> TaskStatus {
        self.from
    }

    /// -> Done, capturing the optional comment. A blank comment is stored as none.
    pub fn commit(
        self,
        task: &mut Task,
        comment: Option<&str>,
    ) -> Result<(), TaskTransitionError> {
        if task.id != self.task_id {
            return Err(TaskTransitionError::TaskMismatch);
        }
        if task.is_done {
            return Err(TaskTransitionError::AlreadyDone);
        }
        task.is_done = true;
        task.in_progress = false;
        task.completion_comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Ok(())
    }
}

/// Task fields before the store has assigned an id and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub deal_id: DealId,
    pub text: String,
    #[serde(default)]
    pub subtasks: Vec<String>,
}

impl NewTask {
    pub fn into_task(self, id: TaskId, created_at: DateTime<Utc>) -> Task {
        let subtasks = self
            .subtasks
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(Subtask::new)
            .collect();
        Task::from(TaskRow {
            id,
            deal_id: self.deal_id,
            text: self.text.trim().to_string(),
            is_done: false,
            in_progress: false,
            completion_comment: None,
            subtasks,
            created_at,
        })
    }
}
