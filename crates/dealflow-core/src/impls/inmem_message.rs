//! InMemoryMessageStore - development/test message store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DealId, Message, MessageId, MessageUpdate, NewMessage, StoreError};
use crate::ports::{Clock, IdGenerator, MessageStore, SystemClock, UlidGenerator};

pub struct InMemoryMessageStore {
    messages: Arc<Mutex<Vec<Message>>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageStore {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            ids,
            clock,
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new(
            Arc::new(UlidGenerator::new(SystemClock)),
            Arc::new(SystemClock),
        )
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create(&self, message: NewMessage) -> Result<Message, StoreError> {
        let message = Message {
            id: self.ids.generate_message_id(),
            deal_id: message.deal_id,
            text: message.text,
            direction: message.direction,
            created_at: self.clock.now(),
            reply_to: message.reply_to,
            edited_at: None,
            deleted_at: None,
        };
        self.messages.lock().await.push(message.clone());
        Ok(message)
    }

    async fn get(&self, id: MessageId) -> Result<Option<Message>, StoreError> {
        let messages = self.messages.lock().await;
        Ok(messages.iter().find(|m| m.id == id).cloned())
    }

    async fn list_by_deal(&self, deal_id: DealId) -> Result<Vec<Message>, StoreError> {
        let messages = self.messages.lock().await;
        Ok(messages
            .iter()
            .filter(|m| m.deal_id == deal_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: MessageId, update: MessageUpdate) -> Result<Message, StoreError> {
        let mut messages = self.messages.lock().await;
        let Some(message) = messages.iter_mut().find(|m| m.id == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        message.apply(update, self.clock.now());
        Ok(message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    #[tokio::test]
    async fn deleted_messages_stay_listed() {
        let store = InMemoryMessageStore::default();
        let deal_id = DealId::from_ulid(ulid::Ulid::new());
        let other_deal = DealId::from_ulid(ulid::Ulid::new());

        let m = store
            .create(NewMessage {
                deal_id,
                text: "hello".into(),
                direction: Direction::Incoming,
                reply_to: None,
            })
            .await
            .unwrap();
        store
            .create(NewMessage {
                deal_id: other_deal,
                text: "elsewhere".into(),
                direction: Direction::Outgoing,
                reply_to: None,
            })
            .await
            .unwrap();

        let deleted = store.update(m.id, MessageUpdate::Delete).await.unwrap();
        assert!(deleted.is_deleted());

        let listed = store.list_by_deal(deal_id).await.unwrap();
        assert_eq!(listed, vec![deleted]);
    }
}
