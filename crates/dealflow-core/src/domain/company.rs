//! Company records and the identity keys used to match them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CompanyId;

/// Where a company's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Typed in by a user; the tax id (if any) is unverified.
    Manual,
    /// Seeded from the registry lookup service.
    RegistryVerified,
}

/// A normalized tax identifier: 10 or 12 ASCII digits.
///
/// Only values that pass [`TaxId::normalize`] exist, so holding a `TaxId`
/// means it is usable for identity matching and registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxId(String);

impl TaxId {
    /// Strip every non-digit and accept the result only at length 10 or 12.
    pub fn normalize(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.len() {
            10 | 12 => Some(Self(digits)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for TaxId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value).ok_or_else(|| format!("invalid tax id: {value:?}"))
    }
}

impl From<TaxId> for String {
    fn from(value: TaxId) -> Self {
        value.0
    }
}

/// Case-insensitive, trimmed, whitespace-collapsed form of a company name.
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Bank requisites returned by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: Option<String>,
    pub bic: Option<String>,
    pub account: Option<String>,
}

/// Everything the registry lookup can tell us about a company.
///
/// Every field is optional; the registry decides what it knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyEnrichment {
    pub name: Option<String>,
    pub legal_address: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub management_name: Option<String>,
    pub management_title: Option<String>,
    pub bank: Option<BankDetails>,
    pub employee_count: Option<u32>,
    /// Authorized capital in minor currency units.
    pub capital: Option<i64>,
    pub status: Option<String>,
}

/// A persisted company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    /// Normalized for registry records, trimmed as typed for manual ones.
    pub tax_id: Option<String>,
    pub provenance: Provenance,
    pub enrichment: CompanyEnrichment,
}

impl Company {
    /// The usable tax id of this record, if any.
    pub fn normalized_tax_id(&self) -> Option<TaxId> {
        self.tax_id.as_deref().and_then(TaxId::normalize)
    }

    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }
}

/// Company fields before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub tax_id: Option<String>,
    pub provenance: Provenance,
    pub enrichment: CompanyEnrichment,
}

impl NewCompany {
    /// A manually entered company: name plus the raw tax id, nothing else.
    pub fn manual(name: &str, raw_tax_id: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            tax_id: raw_tax_id
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            provenance: Provenance::Manual,
            enrichment: CompanyEnrichment::default(),
        }
    }

    /// A registry-verified company. The registry's name wins over the typed one.
    ///
    /// `tax_id` is the value the registry was queried with; normally a
    /// [`TaxId`], or the raw input when the caller forced a lookup.
    pub fn verified(
        tax_id: impl AsRef<str>,
        typed_name: &str,
        enrichment: CompanyEnrichment,
    ) -> Self {
        let name = enrichment
            .name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| typed_name.trim())
            .to_string();
        Self {
            name,
            tax_id: Some(tax_id.as_ref().trim().to_string()),
            provenance: Provenance::RegistryVerified,
            enrichment,
        }
    }

    pub fn normalized_tax_id(&self) -> Option<TaxId> {
        self.tax_id.as_deref().and_then(TaxId::normalize)
    }

    pub fn into_company(self, id: CompanyId) -> Company {
        Company {
            id,
            name: self.name,
            tax_id: self.tax_id,
            provenance: self.provenance,
            enrichment: self.enrichment,
        }
    }
}

/// Partial update for a company. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub provenance: Option<Provenance>,
    pub enrichment: Option<CompanyEnrichment>,
}

impl CompanyPatch {
    /// Patch that applies a fresh registry answer.
    pub fn from_registry(enrichment: CompanyEnrichment) -> Self {
        Self {
            name: enrichment
                .name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            provenance: Some(Provenance::RegistryVerified),
            enrichment: Some(enrichment),
        }
    }

    /// Apply onto `company`. Identity (`id`, `tax_id`) never changes here.
    pub fn apply(self, company: &mut Company) {
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(provenance) = self.provenance {
            company.provenance = provenance;
        }
        if let Some(enrichment) = self.enrichment {
            company.enrichment = enrichment;
        }
    }
}
