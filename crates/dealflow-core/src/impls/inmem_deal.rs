//! InMemoryDealStore - development/test deal store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Deal, DealId, NewDeal, StoreError};
use crate::ports::{Clock, DealStore, IdGenerator, SystemClock, UlidGenerator};

pub struct InMemoryDealStore {
    deals: Arc<Mutex<HashMap<DealId, Deal>>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl InMemoryDealStore {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            deals: Arc::new(Mutex::new(HashMap::new())),
            ids,
            clock,
        }
    }
}

impl Default for InMemoryDealStore {
    fn default() -> Self {
        Self::new(
            Arc::new(UlidGenerator::new(SystemClock)),
            Arc::new(SystemClock),
        )
    }
}

#[async_trait]
impl DealStore for InMemoryDealStore {
    async fn create(&self, deal: NewDeal) -> Result<Deal, StoreError> {
        let now = self.clock.now();
        let deal = Deal {
            id: self.ids.generate_deal_id(),
            title: deal.title,
            company_id: deal.company_id,
            stage: deal.stage,
            contact: deal.contact,
            value: deal.value,
            created_at: now,
            updated_at: now,
        };
        self.deals.lock().await.insert(deal.id, deal.clone());
        Ok(deal)
    }

    async fn get(&self, id: DealId) -> Result<Option<Deal>, StoreError> {
        Ok(self.deals.lock().await.get(&id).cloned())
    }

    async fn update(&self, mut deal: Deal) -> Result<Deal, StoreError> {
        let mut deals = self.deals.lock().await;
        let Some(stored) = deals.get_mut(&deal.id) else {
            return Err(StoreError::NotFound(deal.id.to_string()));
        };
        deal.created_at = stored.created_at;
        deal.updated_at = self.clock.now();
        *stored = deal.clone();
        Ok(deal)
    }

    /// Deals ordered by creation (id order).
    async fn list(&self) -> Result<Vec<Deal>, StoreError> {
        let mut deals: Vec<Deal> = self.deals.lock().await.values().cloned().collect();
        deals.sort_by_key(|d| d.id);
        Ok(deals)
    }
}
