//! MessageStore port.

use async_trait::async_trait;

use crate::domain::{DealId, Message, MessageId, MessageUpdate, NewMessage, StoreError};

/// MessageStore persists a deal's chat log.
///
/// Deletion is soft: `update(id, MessageUpdate::Delete)` sets `deleted_at`
/// and the row stays readable through `get` and `list_by_deal`.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create(&self, message: NewMessage) -> Result<Message, StoreError>;

    async fn get(&self, id: MessageId) -> Result<Option<Message>, StoreError>;

    /// Every message of the deal, deleted ones included.
    async fn list_by_deal(&self, deal_id: DealId) -> Result<Vec<Message>, StoreError>;

    async fn update(&self, id: MessageId, update: MessageUpdate) -> Result<Message, StoreError>;
}
