//! CompanyStore port - the source of truth for company identity.

use async_trait::async_trait;

use crate::domain::{Company, CompanyId, CompanyPatch, NewCompany, StoreError};

/// CompanyStore persists companies.
///
/// # Uniqueness
/// `create` is the single place the identity invariant is enforced:
/// - at most one company per normalized tax id (`StoreError::DuplicateTaxId`)
/// - at most one company per name key among companies without a usable tax id
///   (`StoreError::DuplicateName`)
///
/// The resolver reacts to those two errors by re-reading and re-resolving.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Company>, StoreError>;

    async fn get(&self, id: CompanyId) -> Result<Option<Company>, StoreError>;

    async fn create(&self, company: NewCompany) -> Result<Company, StoreError>;

    async fn update(&self, id: CompanyId, patch: CompanyPatch) -> Result<Company, StoreError>;
}
