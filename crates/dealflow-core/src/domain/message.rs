//! Chat messages attached to a deal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{DealId, MessageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// A message in a deal's activity log.
///
/// Deleted messages keep their row (`deleted_at` set) so replies pointing at
/// them stay resolvable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub deal_id: DealId,
    pub text: String,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
    pub reply_to: Option<MessageId>,
    pub edited_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Apply an update at `now`.
    ///
    /// Deleting twice keeps the first `deleted_at`.
    pub fn apply(&mut self, update: MessageUpdate, now: DateTime<Utc>) {
        match update {
            MessageUpdate::Edit { text } => {
                self.text = text;
                self.edited_at = Some(now);
            }
            MessageUpdate::Delete => {
                if self.deleted_at.is_none() {
                    self.deleted_at = Some(now);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub deal_id: DealId,
    pub text: String,
    pub direction: Direction,
    pub reply_to: Option<MessageId>,
}

/// The only mutations a message supports after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MessageUpdate {
    Edit { text: String },
    Delete,
}
