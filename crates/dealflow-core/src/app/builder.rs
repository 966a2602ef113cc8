//! AppBuilder - Ports からアプリケーションサービスを組み立てる
//!
//! # Fail-fast
//! `build()` は必須の Port をまとめて検査し、足りないものを 1 つのエラーで全部返す。

use std::sync::Arc;

use crate::config::CoreConfig;
use crate::impls::{InMemoryCompanyStore, InMemoryDealStore, InMemoryMessageStore, InMemoryTaskStore};
use crate::ports::{
    Clock, CompanyStore, DealStore, IdGenerator, MessageStore, RegistryLookup, TaskStore,
    UlidGenerator,
};
use crate::timeline::TimelineAggregator;

use super::{ActivityService, DealSaveOrchestrator};

/// AppBuilder は [`DealflowApp`] を組み立てる
///
/// # Example
/// ```ignore
/// let app = AppBuilder::new()
///     .with_in_memory_stores(Arc::new(SystemClock))
///     .with_registry(Arc::new(StaticRegistry::new()))
///     .with_config(config)
///     .build()?;
/// ```
#[derive(Default)]
pub struct AppBuilder {
    companies: Option<Arc<dyn CompanyStore>>,
    registry: Option<Arc<dyn RegistryLookup>>,
    deals: Option<Arc<dyn DealStore>>,
    messages: Option<Arc<dyn MessageStore>>,
    tasks: Option<Arc<dyn TaskStore>>,
    config: CoreConfig,
}

/// BuildError is returned when the wiring is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Missing ports: {0:?}. These ports must be provided before build().")]
    MissingPorts(Vec<&'static str>),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_company_store(mut self, store: Arc<dyn CompanyStore>) -> Self {
        self.companies = Some(store);
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn RegistryLookup>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_deal_store(mut self, store: Arc<dyn DealStore>) -> Self {
        self.deals = Some(store);
        self
    }

    pub fn with_message_store(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.messages = Some(store);
        self
    }

    pub fn with_task_store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.tasks = Some(store);
        self
    }

    /// Use in-memory versions of all four stores, sharing one clock and id
    /// generator. The registry still has to be provided.
    pub fn with_in_memory_stores(self, clock: Arc<dyn Clock>) -> Self {
        let ids: Arc<dyn IdGenerator> = Arc::new(UlidGenerator::new(clock.clone()));
        self.with_company_store(Arc::new(InMemoryCompanyStore::new(ids.clone())))
            .with_deal_store(Arc::new(InMemoryDealStore::new(ids.clone(), clock.clone())))
            .with_message_store(Arc::new(InMemoryMessageStore::new(
                ids.clone(),
                clock.clone(),
            )))
            .with_task_store(Arc::new(InMemoryTaskStore::new(ids, clock)))
    }

    pub fn with_config(mut self, config: CoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the app, or list every port that was never provided.
    pub fn build(self) -> Result<DealflowApp, BuildError> {
        let mut missing = Vec::new();
        if self.companies.is_none() {
            missing.push("company_store");
        }
        if self.registry.is_none() {
            missing.push("registry_lookup");
        }
        if self.deals.is_none() {
            missing.push("deal_store");
        }
        if self.messages.is_none() {
            missing.push("message_store");
        }
        if self.tasks.is_none() {
            missing.push("task_store");
        }

        let (Some(companies), Some(registry), Some(deals), Some(messages), Some(tasks)) = (
            self.companies,
            self.registry,
            self.deals,
            self.messages,
            self.tasks,
        ) else {
            return Err(BuildError::MissingPorts(missing));
        };

        let aggregator = TimelineAggregator::new(self.config.timeline.clone());
        let orchestrator = DealSaveOrchestrator::new(
            companies,
            registry,
            deals,
            messages.clone(),
            tasks.clone(),
            self.config.resolver.clone(),
            aggregator.clone(),
        );
        let activity = ActivityService::new(messages, tasks, aggregator);

        Ok(DealflowApp {
            orchestrator,
            activity,
            config: self.config,
        })
    }
}

/// The wired application: deal saving plus the activity feed.
pub struct DealflowApp {
    pub orchestrator: DealSaveOrchestrator,
    pub activity: ActivityService,
    pub config: CoreConfig,
}
