//! StaticRegistry - registry lookup backed by a fixed table.
//!
//! Used by the CLI (table loaded from a JSON file) and by tests, which can
//! also switch it to "unavailable" to exercise the degrade path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{CompanyEnrichment, LookupError, TaxId};
use crate::ports::RegistryLookup;

#[derive(Default)]
pub struct StaticRegistry {
    records: HashMap<String, CompanyEnrichment>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry answering from `records`, keyed by tax id in any spelling.
    pub fn from_records(records: impl IntoIterator<Item = (String, CompanyEnrichment)>) -> Self {
        let records = records
            .into_iter()
            .map(|(tax_id, record)| {
                let key = TaxId::normalize(&tax_id)
                    .map(|t| t.to_string())
                    .unwrap_or(tax_id);
                (key, record)
            })
            .collect();
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn with_record(mut self, tax_id: &str, record: CompanyEnrichment) -> Self {
        let key = TaxId::normalize(tax_id)
            .map(|t| t.to_string())
            .unwrap_or_else(|| tax_id.to_string());
        self.records.insert(key, record);
        self
    }

    /// Toggle the simulated outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// How many lookups have been made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistryLookup for StaticRegistry {
    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<CompanyEnrichment>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LookupError::Unavailable("registry is offline".into()));
        }
        let key = TaxId::normalize(tax_id)
            .map(|t| t.to_string())
            .unwrap_or_else(|| tax_id.to_string());
        Ok(self.records.get(&key).cloned())
    }
}
