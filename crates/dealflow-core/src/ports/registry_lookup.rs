//! RegistryLookup port - external company registry, queried by tax id.

use async_trait::async_trait;

use crate::domain::{CompanyEnrichment, LookupError};

/// RegistryLookup answers "what does the registry know about this tax id?".
///
/// - `Ok(Some(_))`: found
/// - `Ok(None)`: authoritative miss
/// - `Err(LookupError::Unavailable)`: the service failed; callers never retry it
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<CompanyEnrichment>, LookupError>;
}
