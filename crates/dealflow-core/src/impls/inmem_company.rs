//! InMemoryCompanyStore - development/test company store.
//!
//! Enforces the same uniqueness rules a relational store would enforce with
//! unique indexes, under one lock, so concurrent creates race exactly the
//! way they would against the real store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Company, CompanyId, CompanyPatch, NewCompany, StoreError, TaxId};
use crate::ports::{CompanyStore, IdGenerator, SystemClock, UlidGenerator};

#[derive(Default)]
struct CompanyState {
    /// Insertion order is preserved for `find_all`.
    companies: Vec<Company>,
    /// Fail the next write with this error (test hook).
    next_error: Option<StoreError>,
}

impl CompanyState {
    fn check_unique(&self, candidate: &Company) -> Result<(), StoreError> {
        let others = self.companies.iter().filter(|c| c.id != candidate.id);
        match candidate.normalized_tax_id() {
            Some(tax_id) => {
                let taken = others
                    .clone()
                    .any(|c| c.normalized_tax_id().as_ref() == Some(&tax_id));
                if taken {
                    return Err(StoreError::DuplicateTaxId(tax_id.to_string()));
                }
            }
            None => {
                let key = candidate.name_key();
                let taken = others
                    .filter(|c| c.normalized_tax_id().is_none())
                    .any(|c| c.name_key() == key);
                if taken {
                    return Err(StoreError::DuplicateName(candidate.name.clone()));
                }
            }
        }
        Ok(())
    }
}

/// In-memory CompanyStore.
pub struct InMemoryCompanyStore {
    state: Arc<Mutex<CompanyState>>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryCompanyStore {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CompanyState::default())),
            ids,
        }
    }

    /// Make the next create/update fail with `error`.
    pub async fn fail_next_write(&self, error: StoreError) {
        self.state.lock().await.next_error = Some(error);
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.companies.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of stored companies whose normalized tax id equals `tax_id`.
    pub async fn count_tax_id(&self, tax_id: &TaxId) -> usize {
        self.state
            .lock()
            .await
            .companies
            .iter()
            .filter(|c| c.normalized_tax_id().as_ref() == Some(tax_id))
            .count()
    }
}

impl Default for InMemoryCompanyStore {
    fn default() -> Self {
        Self::new(Arc::new(UlidGenerator::new(SystemClock)))
    }
}

#[async_trait]
impl CompanyStore for InMemoryCompanyStore {
    async fn find_all(&self) -> Result<Vec<Company>, StoreError> {
        Ok(self.state.lock().await.companies.clone())
    }

    async fn get(&self, id: CompanyId) -> Result<Option<Company>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, company: NewCompany) -> Result<Company, StoreError> {
        let mut state = self.state.lock().await;
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        if company.name.trim().is_empty() {
            return Err(StoreError::Rejected("company name must not be empty".into()));
        }
        let company = company.into_company(self.ids.generate_company_id());
        state.check_unique(&company)?;
        state.companies.push(company.clone());
        Ok(company)
    }

    async fn update(&self, id: CompanyId, patch: CompanyPatch) -> Result<Company, StoreError> {
        let mut state = self.state.lock().await;
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        let Some(pos) = state.companies.iter().position(|c| c.id == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        let mut updated = state.companies[pos].clone();
        patch.apply(&mut updated);
        state.check_unique(&updated)?;
        state.companies[pos] = updated.clone();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanyEnrichment, Provenance};

    fn verified(tax_id: &str, name: &str) -> NewCompany {
        NewCompany::verified(
            &TaxId::normalize(tax_id).unwrap(),
            name,
            CompanyEnrichment::default(),
        )
    }

    #[tokio::test]
    async fn create_assigns_id_and_lists_in_order() {
        let store = InMemoryCompanyStore::default();
        let a = store.create(NewCompany::manual("Alpha", None)).await.unwrap();
        let b = store.create(NewCompany::manual("Beta", None)).await.unwrap();
        assert_ne!(a.id, b.id);

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![a.clone(), b]);
        assert_eq!(store.get(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn duplicate_tax_id_is_rejected_on_normalized_form() {
        let store = InMemoryCompanyStore::default();
        store.create(verified("7707083893", "Vector")).await.unwrap();

        let err = store
            .create(NewCompany::manual("Other name", Some("7707-083-893")))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateTaxId("7707083893".into()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_name_only_applies_without_tax_id() {
        let store = InMemoryCompanyStore::default();
        store.create(NewCompany::manual("Vector LLC", None)).await.unwrap();

        let err = store
            .create(NewCompany::manual("  vector   LLC", Some("bogus")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));

        // a verified record with the same name is a different company
        store.create(verified("7707083893", "Vector LLC")).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn update_applies_patch_and_keeps_identity() {
        let store = InMemoryCompanyStore::default();
        let created = store
            .create(NewCompany::manual("Vector", Some("7707083893")))
            .await
            .unwrap();

        let updated = store
            .update(
                created.id,
                CompanyPatch::from_registry(CompanyEnrichment {
                    legal_address: Some("Moscow".into()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Vector");
        assert_eq!(updated.tax_id, created.tax_id);
        assert_eq!(updated.provenance, Provenance::RegistryVerified);
        assert_eq!(updated.enrichment.legal_address.as_deref(), Some("Moscow"));
    }

    #[tokio::test]
    async fn update_missing_company_is_not_found() {
        let store = InMemoryCompanyStore::default();
        let id = UlidGenerator::new(SystemClock).generate_company_id();
        let err = store.update(id, CompanyPatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn injected_failure_hits_next_write_only() {
        let store = InMemoryCompanyStore::default();
        store.fail_next_write(StoreError::Backend("disk full".into())).await;

        let err = store.create(NewCompany::manual("Alpha", None)).await.unwrap_err();
        assert_eq!(err, StoreError::Backend("disk full".into()));
        assert!(store.is_empty().await);

        store.create(NewCompany::manual("Alpha", None)).await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
