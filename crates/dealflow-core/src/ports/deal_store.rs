//! DealStore port.

use async_trait::async_trait;

use crate::domain::{Deal, DealId, NewDeal, StoreError};

#[async_trait]
pub trait DealStore: Send + Sync {
    async fn create(&self, deal: NewDeal) -> Result<Deal, StoreError>;

    async fn get(&self, id: DealId) -> Result<Option<Deal>, StoreError>;

    /// Replace the stored deal. The store refreshes `updated_at`.
    async fn update(&self, deal: Deal) -> Result<Deal, StoreError>;

    async fn list(&self) -> Result<Vec<Deal>, StoreError>;
}
