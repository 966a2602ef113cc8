//! DealSaveOrchestrator - the deal form's save path.
//!
//! Save sequence:
//! 1. validate the form (title)
//! 2. load the deal being edited, if any
//! 3. read the current company list and resolve the company once
//! 4. create or update the deal with the resolved company id
//!
//! A registry outage or miss comes back as a recoverable
//! `SaveError::Resolve`; the caller re-submits with `manual_fallback`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{Company, CompanyId, Deal, DealForm, DealId, SaveError, StoreError};
use crate::ports::{CompanyStore, DealStore, MessageStore, RegistryLookup, TaskStore};
use crate::resolver::{CompanyResolver, Resolution, ResolveOptions, ResolverPolicy};
use crate::timeline::{Timeline, TimelineAggregator};

/// Switches for one save attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Create the company manually instead of asking the registry.
    pub manual_fallback: bool,
    /// Ask the registry even when the tax id does not normalize.
    pub force_lookup: bool,
}

impl SaveOptions {
    pub fn manual_fallback() -> Self {
        Self {
            manual_fallback: true,
            ..Self::default()
        }
    }
}

impl From<SaveOptions> for ResolveOptions {
    fn from(options: SaveOptions) -> Self {
        ResolveOptions {
            manual_fallback: options.manual_fallback,
            force_lookup: options.force_lookup,
        }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDeal {
    pub deal: Deal,
    pub resolution: Resolution,
}

impl SavedDeal {
    /// Whether resolution created a new company for this deal.
    pub fn is_new_company(&self) -> bool {
        self.resolution.created
    }
}

pub struct DealSaveOrchestrator {
    companies: Arc<dyn CompanyStore>,
    deals: Arc<dyn DealStore>,
    messages: Arc<dyn MessageStore>,
    tasks: Arc<dyn TaskStore>,
    resolver: CompanyResolver,
    aggregator: TimelineAggregator,
}

impl DealSaveOrchestrator {
    pub fn new(
        companies: Arc<dyn CompanyStore>,
        registry: Arc<dyn RegistryLookup>,
        deals: Arc<dyn DealStore>,
        messages: Arc<dyn MessageStore>,
        tasks: Arc<dyn TaskStore>,
        policy: ResolverPolicy,
        aggregator: TimelineAggregator,
    ) -> Self {
        Self {
            resolver: CompanyResolver::new(companies.clone(), registry, policy),
            companies,
            deals,
            messages,
            tasks,
            aggregator,
        }
    }

    pub fn resolver(&self) -> &CompanyResolver {
        &self.resolver
    }

    /// Save the deal form, resolving its company first.
    pub async fn save_deal(
        &self,
        form: DealForm,
        options: SaveOptions,
    ) -> Result<SavedDeal, SaveError> {
        if form.title.trim().is_empty() {
            return Err(SaveError::EmptyTitle);
        }

        let existing = match form.deal_id {
            Some(id) => Some(self.deals.get(id).await?.ok_or(SaveError::DealNotFound(id))?),
            None => None,
        };

        let known = self.companies.find_all().await?;
        let resolution = self
            .resolver
            .resolve(&form.company, &known, options.into())
            .await
            .inspect_err(|err| {
                if err.allows_manual_fallback() {
                    warn!(error = %err, "company resolution failed, manual fallback available");
                }
            })?;
        let company_id = resolution.company_id();

        let deal = match existing {
            Some(mut deal) => {
                form.apply_to(&mut deal, company_id);
                let deal = self.deals.update(deal).await?;
                info!(deal_id = %deal.id, %company_id, "updated deal");
                deal
            }
            None => {
                let deal = self.deals.create(form.into_new_deal(company_id)).await?;
                info!(deal_id = %deal.id, %company_id, "created deal");
                deal
            }
        };

        Ok(SavedDeal { deal, resolution })
    }

    /// The deal's merged activity feed.
    pub async fn deal_timeline(&self, deal_id: DealId) -> Result<Timeline, StoreError> {
        let messages = self.messages.list_by_deal(deal_id).await?;
        let tasks = self.tasks.list_by_deal(deal_id).await?;
        Ok(self.aggregator.build(&messages, &tasks))
    }

    /// Re-run registry enrichment for a deal's company.
    pub async fn refresh_company(&self, company_id: CompanyId) -> Result<Company, SaveError> {
        Ok(self.resolver.refresh_enrichment(company_id).await?)
    }
}
