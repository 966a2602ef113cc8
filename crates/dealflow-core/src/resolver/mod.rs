//! Company identity resolution.
//!
//! Decides whether typed company input refers to a known company, a company
//! the registry can verify, or a new manual entry. Priority order:
//!
//! 1. normalize the tax id (10 or 12 digits, otherwise ignored for matching)
//! 2. exact tax id match against the known companies
//! 3. exact name match (only when no usable tax id was given)
//! 4. registry lookup (usable tax id, or a forced raw one)
//! 5. manual creation
//!
//! The store's `create` is the only authority on uniqueness. Losing a create
//! race sends resolution back to step 2 with a fresh company list.

mod policy;

pub use self::policy::ResolverPolicy;

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{
    Company, CompanyEnrichment, CompanyId, CompanyInput, CompanyPatch, NewCompany, ResolveError,
    StoreError, TaxId, name_key,
};
use crate::ports::{CompanyStore, RegistryLookup};

/// Caller switches for one resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Skip the registry and create a manual record when nothing matches.
    pub manual_fallback: bool,
    /// Query the registry with the raw tax id even if it does not normalize.
    pub force_lookup: bool,
}

impl ResolveOptions {
    pub fn manual_fallback() -> Self {
        Self {
            manual_fallback: true,
            ..Self::default()
        }
    }
}

/// How the returned company was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Manual,
    RegistryVerified,
    Reused,
}

/// Non-fatal observations made while resolving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum ResolveNotice {
    /// The typed tax id has the wrong digit count; matched by name instead.
    InvalidTaxId { raw: String },
    /// A concurrent save created the company first; resolution was redone.
    ConflictRetried { attempt: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub company: Company,
    pub created: bool,
    pub source: ResolutionSource,
    pub notices: Vec<ResolveNotice>,
}

impl Resolution {
    pub fn company_id(&self) -> CompanyId {
        self.company.id
    }
}

/// What to do for an input against one snapshot of known companies.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Plan<'a> {
    Reuse(&'a Company),
    Lookup(String),
    Manual,
}

/// Input after trimming and tax id normalization.
#[derive(Debug, Clone)]
struct Normalized<'a> {
    name: &'a str,
    name_key: String,
    raw_tax_id: Option<&'a str>,
    tax_id: Option<TaxId>,
}

impl<'a> Normalized<'a> {
    fn new(input: &'a CompanyInput) -> Self {
        let name = input.name.trim();
        let raw_tax_id = input
            .tax_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        Self {
            name,
            name_key: name_key(name),
            raw_tax_id,
            tax_id: raw_tax_id.and_then(TaxId::normalize),
        }
    }

    fn plan<'k>(&self, known: &'k [Company], options: ResolveOptions) -> Plan<'k> {
        match &self.tax_id {
            Some(tax_id) => {
                if let Some(company) = known
                    .iter()
                    .find(|c| c.normalized_tax_id().as_ref() == Some(tax_id))
                {
                    return Plan::Reuse(company);
                }
            }
            None => {
                if !self.name_key.is_empty()
                    && let Some(company) = by_name(known, &self.name_key)
                {
                    return Plan::Reuse(company);
                }
            }
        }

        if options.manual_fallback {
            return Plan::Manual;
        }
        match (&self.tax_id, self.raw_tax_id) {
            (Some(tax_id), _) => Plan::Lookup(tax_id.to_string()),
            (None, Some(raw)) if options.force_lookup => Plan::Lookup(raw.to_string()),
            _ => Plan::Manual,
        }
    }
}

/// Name match. Companies without a usable tax id win over same-named
/// companies that have one: only the former are unique by name in the store.
fn by_name<'k>(known: &'k [Company], key: &str) -> Option<&'k Company> {
    let mut same_name = known.iter().filter(|c| c.name_key() == key);
    let first = same_name.clone().next()?;
    Some(
        same_name
            .find(|c| c.normalized_tax_id().is_none())
            .unwrap_or(first),
    )
}

/// CompanyResolver turns typed company input into a company reference.
///
/// # Example
/// ```ignore
/// let known = store.find_all().await?;
/// let resolution = resolver
///     .resolve(&CompanyInput::new("Vector LLC", Some("7707083893")), &known, ResolveOptions::default())
///     .await?;
/// ```
pub struct CompanyResolver {
    store: Arc<dyn CompanyStore>,
    registry: Arc<dyn RegistryLookup>,
    policy: ResolverPolicy,
}

impl CompanyResolver {
    pub fn new(
        store: Arc<dyn CompanyStore>,
        registry: Arc<dyn RegistryLookup>,
        policy: ResolverPolicy,
    ) -> Self {
        Self {
            store,
            registry,
            policy,
        }
    }

    /// Resolve `input` against the caller's snapshot of known companies.
    pub async fn resolve(
        &self,
        input: &CompanyInput,
        known: &[Company],
        options: ResolveOptions,
    ) -> Result<Resolution, ResolveError> {
        let input = Normalized::new(input);
        let mut notices = Vec::new();

        if let (Some(raw), None) = (input.raw_tax_id, &input.tax_id) {
            warn!(raw_tax_id = raw, "tax id has wrong digit count, ignoring it for matching");
            notices.push(ResolveNotice::InvalidTaxId {
                raw: raw.to_string(),
            });
        }
        if input.name.is_empty() && input.tax_id.is_none() {
            return Err(ResolveError::EmptyName);
        }

        let mut snapshot = Cow::Borrowed(known);
        // The registry answer is kept across conflict retries: it is queried at most once.
        let mut fetched: Option<(String, CompanyEnrichment)> = None;
        let mut conflicts = 0;
        // Name key of a draft the store rejected as a duplicate name.
        let mut rejected_name: Option<String> = None;

        loop {
            let plan = match (input.plan(&snapshot, options), rejected_name.as_deref()) {
                (Plan::Reuse(company), _) => Plan::Reuse(company),
                (plan, Some(key)) => by_name(&snapshot, key).map_or(plan, Plan::Reuse),
                (plan, None) => plan,
            };
            let (draft, source) = match plan {
                Plan::Reuse(company) => {
                    debug!(company_id = %company.id, "reusing known company");
                    return Ok(Resolution {
                        company: company.clone(),
                        created: false,
                        source: ResolutionSource::Reused,
                        notices,
                    });
                }
                Plan::Lookup(tax_id) => {
                    let cached = fetched
                        .as_ref()
                        .filter(|(queried, _)| *queried == tax_id)
                        .map(|(_, enrichment)| enrichment.clone());
                    let enrichment = match cached {
                        Some(enrichment) => enrichment,
                        None => {
                            let enrichment = self.lookup(&tax_id).await?;
                            fetched = Some((tax_id.clone(), enrichment.clone()));
                            enrichment
                        }
                    };
                    let draft = NewCompany::verified(&tax_id, input.name, enrichment);
                    (draft, ResolutionSource::RegistryVerified)
                }
                Plan::Manual => {
                    let draft = NewCompany::manual(input.name, input.raw_tax_id);
                    (draft, ResolutionSource::Manual)
                }
            };

            if draft.name.is_empty() {
                return Err(ResolveError::EmptyName);
            }

            let draft_key = name_key(&draft.name);
            match self.store.create(draft).await {
                Ok(company) => {
                    info!(
                        company_id = %company.id,
                        provenance = ?company.provenance,
                        "created company"
                    );
                    return Ok(Resolution {
                        company,
                        created: true,
                        source,
                        notices,
                    });
                }
                Err(err) if err.is_identity_conflict() && self.policy.allows_retry(conflicts) => {
                    conflicts += 1;
                    if matches!(err, StoreError::DuplicateName(_)) {
                        rejected_name = Some(draft_key);
                    }
                    warn!(error = %err, attempt = conflicts, "lost company create race, re-resolving");
                    notices.push(ResolveNotice::ConflictRetried { attempt: conflicts });
                    snapshot = Cow::Owned(self.store.find_all().await?);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Re-run the registry lookup for an existing company and store the answer.
    ///
    /// The tax id is never changed; the name only when the registry has one.
    pub async fn refresh_enrichment(&self, company_id: CompanyId) -> Result<Company, ResolveError> {
        let company = self
            .store
            .get(company_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(company_id.to_string()))?;
        let tax_id = company
            .normalized_tax_id()
            .ok_or(ResolveError::NotEnrichable(company_id))?;

        let enrichment = self.lookup(tax_id.as_str()).await?;
        let updated = self
            .store
            .update(company_id, CompanyPatch::from_registry(enrichment))
            .await?;
        info!(%company_id, "refreshed company enrichment");
        Ok(updated)
    }

    async fn lookup(&self, tax_id: &str) -> Result<CompanyEnrichment, ResolveError> {
        match self.registry.find_by_tax_id(tax_id).await {
            Ok(Some(enrichment)) => Ok(enrichment),
            Ok(None) => {
                info!(tax_id, "tax id not found in registry");
                Err(ResolveError::NotFoundInRegistry {
                    tax_id: tax_id.to_string(),
                })
            }
            Err(err) => {
                warn!(tax_id, error = %err, "registry lookup failed");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, LookupError, Provenance};
    use crate::impls::{InMemoryCompanyStore, StaticRegistry};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rstest::rstest;
    use tokio::sync::Barrier;

    const VECTOR_TAX_ID: &str = "7707083893";

    fn vector_record() -> CompanyEnrichment {
        CompanyEnrichment {
            name: Some("PJSC Vector".into()),
            legal_address: Some("19 Vavilova St, Moscow".into()),
            registration_date: NaiveDate::from_ymd_opt(1991, 6, 20),
            management_name: Some("H. Gref".into()),
            management_title: Some("CEO".into()),
            bank: None,
            employee_count: Some(200_000),
            capital: Some(676_118_598),
            status: Some("active".into()),
        }
    }

    struct Fixture {
        store: Arc<InMemoryCompanyStore>,
        registry: Arc<StaticRegistry>,
        resolver: CompanyResolver,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryCompanyStore::default());
        let registry = Arc::new(StaticRegistry::new().with_record(VECTOR_TAX_ID, vector_record()));
        let resolver = CompanyResolver::new(
            store.clone(),
            registry.clone(),
            ResolverPolicy::default(),
        );
        Fixture {
            store,
            registry,
            resolver,
        }
    }

    fn input(name: &str, tax_id: Option<&str>) -> CompanyInput {
        CompanyInput::new(name, tax_id)
    }

    #[rstest]
    #[case::valid_tax_id_goes_to_registry(Some("7707083893"), false, false, Some("7707083893"))]
    #[case::invalid_tax_id_is_manual(Some("12345"), false, false, None)]
    #[case::forced_lookup_uses_raw(Some("12345"), false, true, Some("12345"))]
    #[case::manual_fallback_skips_registry(Some("7707083893"), true, false, None)]
    #[case::no_tax_id_is_manual(None, false, false, None)]
    fn plan_for_unknown_company(
        #[case] tax_id: Option<&str>,
        #[case] manual_fallback: bool,
        #[case] force_lookup: bool,
        #[case] lookup: Option<&str>,
    ) {
        let raw = input("Vector LLC", tax_id);
        let normalized = Normalized::new(&raw);
        let plan = normalized.plan(
            &[],
            ResolveOptions {
                manual_fallback,
                force_lookup,
            },
        );
        let expected = match lookup {
            Some(key) => Plan::Lookup(key.to_string()),
            None => Plan::Manual,
        };
        assert_eq!(plan, expected);
    }

    #[tokio::test]
    async fn scenario_a_registry_verified_company_is_created() {
        let f = fixture();
        let resolution = f
            .resolver
            .resolve(
                &input("Vector LLC", Some(VECTOR_TAX_ID)),
                &[],
                ResolveOptions::default(),
            )
            .await
            .unwrap();

        assert!(resolution.created);
        assert_eq!(resolution.source, ResolutionSource::RegistryVerified);
        let company = &resolution.company;
        assert_eq!(company.provenance, Provenance::RegistryVerified);
        assert_eq!(company.name, "PJSC Vector");
        assert_eq!(company.tax_id.as_deref(), Some(VECTOR_TAX_ID));
        assert_eq!(company.enrichment, vector_record());
        assert_eq!(f.store.len().await, 1);
    }

    #[tokio::test]
    async fn scenario_b_same_tax_id_is_reused() {
        let f = fixture();
        let first = f
            .resolver
            .resolve(&input("Vector LLC", Some(VECTOR_TAX_ID)), &[], ResolveOptions::default())
            .await
            .unwrap();

        let known = f.store.find_all().await.unwrap();
        let second = f
            .resolver
            .resolve(
                &input("vector", Some("77-07-083-893")),
                &known,
                ResolveOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(second.source, ResolutionSource::Reused);
        assert!(!second.created);
        assert_eq!(second.company_id(), first.company_id());
        assert_eq!(f.store.len().await, 1);
        assert_eq!(f.registry.calls(), 1);
    }

    #[tokio::test]
    async fn scenario_c_name_match_is_case_insensitive() {
        let f = fixture();
        let existing = f
            .store
            .create(NewCompany::manual("VECTOR llc", None))
            .await
            .unwrap();
        let known = f.store.find_all().await.unwrap();

        let resolution = f
            .resolver
            .resolve(&input("  Vector LLC ", None), &known, ResolveOptions::default())
            .await
            .unwrap();

        assert_eq!(resolution.source, ResolutionSource::Reused);
        assert_eq!(resolution.company_id(), existing.id);
        assert_eq!(f.registry.calls(), 0);
    }

    #[tokio::test]
    async fn scenario_d_registry_outage_then_manual_fallback() {
        let f = fixture();
        f.registry.set_unavailable(true);

        let err = f
            .resolver
            .resolve(&input("Vector LLC", Some(VECTOR_TAX_ID)), &[], ResolveOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::LookupUnavailable(_)));
        assert!(err.allows_manual_fallback());
        assert!(f.store.is_empty().await);

        let typed = "7707 083 893";
        let resolution = f
            .resolver
            .resolve(
                &input("Vector LLC", Some(typed)),
                &[],
                ResolveOptions::manual_fallback(),
            )
            .await
            .unwrap();

        assert!(resolution.created);
        assert_eq!(resolution.source, ResolutionSource::Manual);
        assert_eq!(resolution.company.provenance, Provenance::Manual);
        assert_eq!(resolution.company.tax_id.as_deref(), Some(typed));
        assert_eq!(resolution.company.enrichment, CompanyEnrichment::default());
        // the outage was hit once, the fallback never asked again
        assert_eq!(f.registry.calls(), 1);
    }

    #[tokio::test]
    async fn registry_miss_is_reported() {
        let f = fixture();
        let err = f
            .resolver
            .resolve(&input("Nobody", Some("500100732259")), &[], ResolveOptions::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotFoundInRegistry {
                tax_id: "500100732259".into()
            }
        );
        assert!(f.store.is_empty().await);
    }

    #[tokio::test]
    async fn invalid_tax_id_degrades_to_manual_creation() {
        let f = fixture();
        let resolution = f
            .resolver
            .resolve(&input("Tiny Shop", Some("123-45")), &[], ResolveOptions::default())
            .await
            .unwrap();

        assert_eq!(resolution.source, ResolutionSource::Manual);
        assert_eq!(resolution.company.tax_id.as_deref(), Some("123-45"));
        assert_eq!(
            resolution.notices,
            vec![ResolveNotice::InvalidTaxId {
                raw: "123-45".into()
            }]
        );
        assert_eq!(f.registry.calls(), 0);
    }

    #[tokio::test]
    async fn tax_id_match_beats_name_match() {
        let f = fixture();
        let by_name = f
            .store
            .create(NewCompany::manual("Vector LLC", None))
            .await
            .unwrap();
        let by_tax_id = f
            .store
            .create(NewCompany::manual("Completely different", Some(VECTOR_TAX_ID)))
            .await
            .unwrap();
        let known = f.store.find_all().await.unwrap();

        let resolution = f
            .resolver
            .resolve(&input("Vector LLC", Some(VECTOR_TAX_ID)), &known, ResolveOptions::default())
            .await
            .unwrap();

        assert_eq!(resolution.company_id(), by_tax_id.id);
        assert_ne!(resolution.company_id(), by_name.id);
    }

    #[tokio::test]
    async fn usable_tax_id_skips_name_matching() {
        let f = fixture();
        f.store
            .create(NewCompany::manual("Vector LLC", None))
            .await
            .unwrap();
        let known = f.store.find_all().await.unwrap();

        let resolution = f
            .resolver
            .resolve(&input("Vector LLC", Some(VECTOR_TAX_ID)), &known, ResolveOptions::default())
            .await
            .unwrap();

        assert_eq!(resolution.source, ResolutionSource::RegistryVerified);
        assert_eq!(f.store.len().await, 2);
    }

    #[rstest]
    #[case::registry(Some(VECTOR_TAX_ID), ResolveOptions::default())]
    #[case::manual_with_tax_id(Some(VECTOR_TAX_ID), ResolveOptions::manual_fallback())]
    #[case::manual_by_name(None, ResolveOptions::default())]
    #[case::manual_with_bad_tax_id(Some("42"), ResolveOptions::default())]
    #[tokio::test]
    async fn resolve_is_idempotent_on_a_stale_snapshot(
        #[case] tax_id: Option<&str>,
        #[case] options: ResolveOptions,
    ) {
        let f = fixture();
        let raw = input("Vector LLC", tax_id);

        let first = f.resolver.resolve(&raw, &[], options).await.unwrap();
        let second = f.resolver.resolve(&raw, &[], options).await.unwrap();

        assert_eq!(first.company_id(), second.company_id());
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(second.source, ResolutionSource::Reused);
        assert!(matches!(
            second.notices.last(),
            Some(ResolveNotice::ConflictRetried { attempt: 1 })
        ));
        assert_eq!(f.store.len().await, 1);
    }

    #[tokio::test]
    async fn name_match_prefers_company_without_tax_id() {
        let f = fixture();
        let keyed = f
            .store
            .create(NewCompany::manual("Vector LLC", Some(VECTOR_TAX_ID)))
            .await
            .unwrap();
        let raw = input("Vector LLC", None);

        let first = f.resolver.resolve(&raw, &[], ResolveOptions::default()).await.unwrap();
        let second = f.resolver.resolve(&raw, &[], ResolveOptions::default()).await.unwrap();

        assert!(first.created);
        assert_ne!(first.company_id(), keyed.id);
        assert_eq!(second.source, ResolutionSource::Reused);
        assert_eq!(second.company_id(), first.company_id());

        let known = f.store.find_all().await.unwrap();
        assert_eq!(known[0].id, keyed.id);
        let third = f.resolver.resolve(&raw, &known, ResolveOptions::default()).await.unwrap();
        assert_eq!(third.company_id(), first.company_id());
        assert_eq!(f.store.len().await, 2);
    }

    #[tokio::test]
    async fn name_match_falls_back_to_company_with_tax_id() {
        let f = fixture();
        let keyed = f
            .store
            .create(NewCompany::manual("Vector LLC", Some(VECTOR_TAX_ID)))
            .await
            .unwrap();
        let known = f.store.find_all().await.unwrap();

        let resolution = f
            .resolver
            .resolve(&input("vector  llc", None), &known, ResolveOptions::default())
            .await
            .unwrap();

        assert_eq!(resolution.source, ResolutionSource::Reused);
        assert_eq!(resolution.company_id(), keyed.id);
    }

    #[tokio::test]
    async fn forced_lookup_reuses_company_holding_the_registry_name() {
        let store = Arc::new(InMemoryCompanyStore::default());
        let registry = Arc::new(StaticRegistry::new().with_record(
            "12345",
            CompanyEnrichment {
                name: Some("Acme".into()),
                ..CompanyEnrichment::default()
            },
        ));
        let resolver = CompanyResolver::new(
            store.clone(),
            registry.clone(),
            ResolverPolicy::default(),
        );
        let acme = store.create(NewCompany::manual("Acme", None)).await.unwrap();
        let options = ResolveOptions {
            force_lookup: true,
            ..ResolveOptions::default()
        };

        let resolution = resolver
            .resolve(&input("acme typo", Some("12345")), &[], options)
            .await
            .unwrap();

        assert_eq!(resolution.source, ResolutionSource::Reused);
        assert_eq!(resolution.company_id(), acme.id);
        assert!(matches!(
            resolution.notices.last(),
            Some(ResolveNotice::ConflictRetried { attempt: 1 })
        ));
        assert_eq!(registry.calls(), 1);
        assert_eq!(store.len().await, 1);
    }

    /// Holds every lookup until `n` callers are waiting, so they all miss
    /// the known companies before any of them creates.
    struct BarrierRegistry {
        inner: StaticRegistry,
        barrier: Barrier,
    }

    #[async_trait]
    impl RegistryLookup for BarrierRegistry {
        async fn find_by_tax_id(
            &self,
            tax_id: &str,
        ) -> Result<Option<CompanyEnrichment>, LookupError> {
            self.barrier.wait().await;
            self.inner.find_by_tax_id(tax_id).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_resolutions_create_one_company() {
        const CALLERS: usize = 4;
        let store = Arc::new(InMemoryCompanyStore::default());
        let registry = Arc::new(BarrierRegistry {
            inner: StaticRegistry::new().with_record(VECTOR_TAX_ID, vector_record()),
            barrier: Barrier::new(CALLERS),
        });
        let resolver = Arc::new(CompanyResolver::new(
            store.clone(),
            registry,
            ResolverPolicy::default(),
        ));

        let mut handles = Vec::new();
        for _ in 0..CALLERS {
            let resolver = resolver.clone();
            handles.push(tokio::spawn(async move {
                resolver
                    .resolve(
                        &CompanyInput::new("Vector LLC", Some(VECTOR_TAX_ID)),
                        &[],
                        ResolveOptions::default(),
                    )
                    .await
            }));
        }

        let mut ids = Vec::new();
        let mut created = 0;
        for handle in handles {
            let resolution = handle.await.unwrap().unwrap();
            if resolution.created {
                created += 1;
            }
            ids.push(resolution.company_id());
        }

        assert_eq!(created, 1);
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        let tax_id = TaxId::normalize(VECTOR_TAX_ID).unwrap();
        assert_eq!(store.count_tax_id(&tax_id).await, 1);
    }

    #[tokio::test]
    async fn persistent_conflict_gives_up_after_policy_limit() {
        let store = Arc::new(InMemoryCompanyStore::default());
        let resolver = CompanyResolver::new(
            store.clone(),
            Arc::new(StaticRegistry::new()),
            ResolverPolicy::new(0),
        );
        store
            .fail_next_write(StoreError::DuplicateName("Vector LLC".into()))
            .await;

        let err = resolver
            .resolve(&input("Vector LLC", None), &[], ResolveOptions::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::Persistence(StoreError::DuplicateName("Vector LLC".into()))
        );
    }

    #[tokio::test]
    async fn store_failure_is_fatal() {
        let f = fixture();
        f.store.fail_next_write(StoreError::Backend("down".into())).await;

        let err = f
            .resolver
            .resolve(&input("Vector LLC", None), &[], ResolveOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }

    #[tokio::test]
    async fn empty_name_without_tax_id_is_rejected() {
        let f = fixture();
        let err = f
            .resolver
            .resolve(&input("   ", Some("abc")), &[], ResolveOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::EmptyName);
    }

    #[tokio::test]
    async fn empty_name_with_tax_id_takes_registry_name() {
        let f = fixture();
        let resolution = f
            .resolver
            .resolve(&input("", Some(VECTOR_TAX_ID)), &[], ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(resolution.company.name, "PJSC Vector");
    }

    #[tokio::test]
    async fn refresh_enrichment_upgrades_manual_company() {
        let f = fixture();
        let manual = f
            .store
            .create(NewCompany::manual("Vector", Some("7707-083-893")))
            .await
            .unwrap();

        let refreshed = f.resolver.refresh_enrichment(manual.id).await.unwrap();

        assert_eq!(refreshed.id, manual.id);
        assert_eq!(refreshed.tax_id, manual.tax_id);
        assert_eq!(refreshed.name, "PJSC Vector");
        assert_eq!(refreshed.provenance, Provenance::RegistryVerified);
        assert_eq!(refreshed.enrichment, vector_record());
    }

    #[tokio::test]
    async fn refresh_enrichment_needs_a_usable_tax_id() {
        let f = fixture();
        let manual = f
            .store
            .create(NewCompany::manual("Corner Shop", Some("n/a")))
            .await
            .unwrap();

        let err = f.resolver.refresh_enrichment(manual.id).await.unwrap_err();
        assert_eq!(err, ResolveError::NotEnrichable(manual.id));
    }
}
