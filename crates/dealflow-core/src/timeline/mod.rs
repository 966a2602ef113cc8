//! Deal activity feed.
//!
//! `TimelineAggregator::build` merges a deal's messages and tasks into one
//! ordered list. It is a pure function of its inputs: the same messages and
//! tasks always give the same entries in the same order.
//!
//! `Timeline` also supports incremental updates (`upsert_task`,
//! `upsert_message`) so a caller can refresh one entry after a mutation
//! without rebuilding the whole feed.

mod entry;

pub use self::entry::{
    EntryId, MessageEntry, ReplyPreview, TaskAnnouncementEntry, TimelineEntry, TimelineOptions,
    excerpt,
};

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Message, MessageId, Task, TimelineError};

/// What a reply can still see of its target.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplyTarget {
    Live(String),
    Deleted,
}

/// An ordered activity feed for one deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    #[serde(skip)]
    targets: HashMap<MessageId, ReplyTarget>,
    #[serde(skip)]
    options: TimelineOptions,
}

impl Timeline {
    fn empty(options: TimelineOptions) -> Self {
        Self {
            entries: Vec::new(),
            targets: HashMap::new(),
            options,
        }
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelineEntry> {
        self.entries.iter()
    }

    pub fn entry(&self, id: impl Into<EntryId>) -> Option<&TimelineEntry> {
        let id = id.into();
        self.entries.iter().find(|e| e.id() == id)
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    /// Replace an entry whose sort key is unchanged, or insert at its sorted slot.
    fn put(&mut self, entry: TimelineEntry) -> usize {
        if let Some(pos) = self.position(entry.id()) {
            if self.entries[pos].sort_key() == entry.sort_key() {
                self.entries[pos] = entry;
                return pos;
            }
            self.entries.remove(pos);
        }
        let key = entry.sort_key();
        let pos = self.entries.partition_point(|e| e.sort_key() < key);
        self.entries.insert(pos, entry);
        pos
    }

    fn preview(&self, reply_to: MessageId) -> ReplyPreview {
        match self.targets.get(&reply_to) {
            Some(ReplyTarget::Live(text)) => ReplyPreview::Available {
                message_id: reply_to,
                excerpt: excerpt(text, self.options.reply_excerpt_chars),
            },
            Some(ReplyTarget::Deleted) => ReplyPreview::Deleted {
                message_id: reply_to,
            },
            None => ReplyPreview::Missing {
                message_id: reply_to,
            },
        }
    }

    fn remember(&mut self, message: &Message) {
        let target = if message.is_deleted() {
            ReplyTarget::Deleted
        } else {
            ReplyTarget::Live(message.text.clone())
        };
        self.targets.insert(message.id, target);
    }

    /// Insert or refresh the announcement for `task`.
    pub fn upsert_task(&mut self, task: &Task) -> &TimelineEntry {
        let pos = self.put(TimelineEntry::TaskAnnouncement(task.into()));
        &self.entries[pos]
    }

    /// Insert, refresh or (when soft-deleted) drop the entry for `message`.
    ///
    /// Replies quoting `message` get their preview refreshed. Returns the
    /// rendered entry, or `None` for a deleted message.
    pub fn upsert_message(&mut self, message: &Message) -> Option<&TimelineEntry> {
        self.remember(message);

        let id = EntryId::Message(message.id);
        if message.is_deleted() {
            if let Some(pos) = self.position(id) {
                self.entries.remove(pos);
            }
        } else {
            let reply = message.reply_to.map(|target| self.preview(target));
            self.put(TimelineEntry::Message(MessageEntry::new(message, reply)));
        }

        let refreshed = self.preview(message.id);
        for entry in &mut self.entries {
            if let TimelineEntry::Message(m) = entry
                && let Some(reply) = &mut m.reply
                && reply.message_id() == message.id
            {
                *reply = refreshed.clone();
            }
        }

        self.entry(id)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineEntry;
    type IntoIter = std::slice::Iter<'a, TimelineEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds timelines with one set of rendering options.
#[derive(Debug, Clone, Default)]
pub struct TimelineAggregator {
    options: TimelineOptions,
}

impl TimelineAggregator {
    pub fn new(options: TimelineOptions) -> Self {
        Self { options }
    }

    /// Merge `messages` and `tasks` into an ordered feed.
    ///
    /// Deleted messages are not rendered but still answer reply previews.
    pub fn build(&self, messages: &[Message], tasks: &[Task]) -> Timeline {
        let mut timeline = Timeline::empty(self.options.clone());
        for message in messages {
            timeline.remember(message);
        }

        let mut entries: Vec<TimelineEntry> = messages
            .iter()
            .filter(|m| !m.is_deleted())
            .map(|m| {
                let reply = m.reply_to.map(|target| timeline.preview(target));
                TimelineEntry::Message(MessageEntry::new(m, reply))
            })
            .chain(tasks.iter().map(|t| TimelineEntry::TaskAnnouncement(t.into())))
            .collect();
        entries.sort_by_key(TimelineEntry::sort_key);

        timeline.entries = entries;
        timeline
    }

    /// Render a single message, quoting `target` when it is the reply target.
    /// `None` for a deleted message.
    pub fn render_message(
        &self,
        message: &Message,
        target: Option<&Message>,
    ) -> Option<TimelineEntry> {
        let mut messages: Vec<Message> = target.into_iter().cloned().collect();
        messages.push(message.clone());
        self.build(&messages, &[]).entry(message.id).cloned()
    }

    pub fn render_task(&self, task: &Task) -> TimelineEntry {
        TimelineEntry::TaskAnnouncement(task.into())
    }

    /// Re-render the announcement `entry` after `task` changed. Position is
    /// untouched; `created_at` never changes for a task.
    pub fn on_task_changed(
        &self,
        entry: &TimelineEntry,
        task: &Task,
    ) -> Result<TimelineEntry, TimelineError> {
        match entry {
            TimelineEntry::TaskAnnouncement(current) if current.task_id == task.id => {
                Ok(TimelineEntry::TaskAnnouncement(task.into()))
            }
            _ => Err(TimelineError::EntryMismatch(task.id)),
        }
    }
}
