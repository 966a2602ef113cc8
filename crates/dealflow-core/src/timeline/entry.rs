//! Timeline entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::domain::{
    DealId, Direction, Message, MessageId, Subtask, Task, TaskId, TaskStatus,
};

/// Rendering knobs for the activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineOptions {
    /// Max characters of the quoted line in a reply preview.
    pub reply_excerpt_chars: usize,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            reply_excerpt_chars: 80,
        }
    }
}

/// What a reply shows of the message it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReplyPreview {
    Available { message_id: MessageId, excerpt: String },
    /// Target was soft-deleted; rendered as a one-line placeholder.
    Deleted { message_id: MessageId },
    /// Target is not among the deal's messages.
    Missing { message_id: MessageId },
}

impl ReplyPreview {
    pub fn message_id(&self) -> MessageId {
        match self {
            ReplyPreview::Available { message_id, .. }
            | ReplyPreview::Deleted { message_id }
            | ReplyPreview::Missing { message_id } => *message_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub id: MessageId,
    pub deal_id: DealId,
    pub text: String,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub reply: Option<ReplyPreview>,
}

impl MessageEntry {
    pub(crate) fn new(message: &Message, reply: Option<ReplyPreview>) -> Self {
        Self {
            id: message.id,
            deal_id: message.deal_id,
            text: message.text.clone(),
            direction: message.direction,
            created_at: message.created_at,
            edited_at: message.edited_at,
            reply,
        }
    }
}

/// Synthetic "task created" entry. Carries the task's live state, not a
/// snapshot from creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAnnouncementEntry {
    pub task_id: TaskId,
    pub deal_id: DealId,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub status: TaskStatus,
    pub completion_comment: Option<String>,
    /// Effective subtasks: all done while the task is done.
    pub subtasks: Vec<Subtask>,
    pub done_count: usize,
}

impl From<&Task> for TaskAnnouncementEntry {
    fn from(task: &Task) -> Self {
        let subtasks = task.effective_subtasks();
        let done_count = subtasks.iter().filter(|s| s.is_done).count();
        Self {
            task_id: task.id,
            deal_id: task.deal_id,
            created_at: task.created_at,
            text: task.text.clone(),
            status: task.status(),
            completion_comment: task.completion_comment().map(str::to_string),
            subtasks,
            done_count,
        }
    }
}

/// Identifies one entry in a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntryId {
    Message(MessageId),
    Task(TaskId),
}

impl From<MessageId> for EntryId {
    fn from(id: MessageId) -> Self {
        EntryId::Message(id)
    }
}

impl From<TaskId> for EntryId {
    fn from(id: TaskId) -> Self {
        EntryId::Task(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEntry {
    Message(MessageEntry),
    TaskAnnouncement(TaskAnnouncementEntry),
}

impl TimelineEntry {
    pub fn id(&self) -> EntryId {
        match self {
            TimelineEntry::Message(m) => EntryId::Message(m.id),
            TimelineEntry::TaskAnnouncement(t) => EntryId::Task(t.task_id),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            TimelineEntry::Message(m) => m.created_at,
            TimelineEntry::TaskAnnouncement(t) => t.created_at,
        }
    }

    /// `(created_at, ulid, kind)`. The kind rank only matters if a message
    /// and a task share a ULID, which a single generator never produces.
    pub fn sort_key(&self) -> (DateTime<Utc>, Ulid, u8) {
        match self {
            TimelineEntry::Message(m) => (m.created_at, m.id.as_ulid(), 1),
            TimelineEntry::TaskAnnouncement(t) => (t.created_at, t.task_id.as_ulid(), 0),
        }
    }

    pub fn as_message(&self) -> Option<&MessageEntry> {
        match self {
            TimelineEntry::Message(m) => Some(m),
            TimelineEntry::TaskAnnouncement(_) => None,
        }
    }

    pub fn as_task(&self) -> Option<&TaskAnnouncementEntry> {
        match self {
            TimelineEntry::TaskAnnouncement(t) => Some(t),
            TimelineEntry::Message(_) => None,
        }
    }
}

/// First line of `text`, cut to `max_chars` characters with a trailing `…`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("").trim_end();
    match line.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &line[..cut]),
        None => line.to_string(),
    }
}
