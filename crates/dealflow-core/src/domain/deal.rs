//! Deal records and the form input that creates/updates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CompanyId, DealId};

/// Reference into the externally owned, ordered stage list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(String);

impl StageId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Free-text contact fields of a deal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    pub title: String,
    pub company_id: CompanyId,
    pub stage: StageId,
    pub contact: Contact,
    /// Monetary value in minor currency units.
    pub value: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Deal fields before the store has assigned an id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeal {
    pub title: String,
    pub company_id: CompanyId,
    pub stage: StageId,
    pub contact: Contact,
    pub value: Option<i64>,
}

/// Company sub-fields as typed into the deal form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub tax_id: Option<String>,
}

impl CompanyInput {
    pub fn new(name: impl Into<String>, tax_id: Option<&str>) -> Self {
        Self {
            name: name.into(),
            tax_id: tax_id.map(str::to_string),
        }
    }
}

/// Raw deal form submitted by the UI.
///
/// `deal_id == None` creates a deal, otherwise the existing deal is updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealForm {
    pub deal_id: Option<DealId>,
    pub title: String,
    pub company: CompanyInput,
    pub stage: StageId,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub value: Option<i64>,
}

impl DealForm {
    pub fn into_new_deal(self, company_id: CompanyId) -> NewDeal {
        NewDeal {
            title: self.title.trim().to_string(),
            company_id,
            stage: self.stage,
            contact: self.contact,
            value: self.value,
        }
    }

    /// Copy the form onto an existing deal. Timestamps are the store's concern.
    pub fn apply_to(self, deal: &mut Deal, company_id: CompanyId) {
        deal.title = self.title.trim().to_string();
        deal.company_id = company_id;
        deal.stage = self.stage;
        deal.contact = self.contact;
        deal.value = self.value;
    }
}
