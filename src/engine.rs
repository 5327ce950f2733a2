//! Signal engine facade
//!
//! [`SignalEngine`] owns the report store, the drug registry and the
//! configuration, and exposes the four operations a presentation layer needs:
//! ingest, lookup, survey and reset. It is `Send + Sync` and meant to be
//! shared behind an `Arc`.

use std::sync::Arc;
use std::time::Instant;

use crate::algorithm::{self, LookupResult, SurveyEntry};
use crate::config::SignalConfig;
use crate::error::Result;
use crate::filter::{DemographicCondition, ReportFilter};
use crate::models::{CombinationReport, ReportRequest};
use crate::registry::DrugRegistry;
use crate::store::{InMemoryReportStore, ReportStore, TimeoutStore};
use crate::utils::{log_operation_complete, log_operation_start};

/// Builder for [`SignalEngine`]
#[derive(Default)]
pub struct SignalEngineBuilder {
    config: SignalConfig,
    store: Option<Arc<dyn ReportStore>>,
}

impl SignalEngineBuilder {
    /// Create a builder with the default configuration and an in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    #[must_use]
    pub fn with_config(mut self, config: SignalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the report store
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn ReportStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validate the configuration and build the engine
    pub fn build(self) -> Result<SignalEngine> {
        self.config.validate()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryReportStore::new()) as Arc<dyn ReportStore>);
        let store: Arc<dyn ReportStore> = match self.config.store_timeout() {
            Some(timeout) => Arc::new(TimeoutStore::new(store, timeout)),
            None => store,
        };
        let registry = DrugRegistry::from_config(Arc::clone(&store), &self.config);

        Ok(SignalEngine {
            store,
            registry,
            config: self.config,
        })
    }
}

/// Drug combination signal detection engine
pub struct SignalEngine {
    store: Arc<dyn ReportStore>,
    registry: DrugRegistry,
    config: SignalConfig,
}

impl SignalEngine {
    /// Start building an engine
    #[must_use]
    pub fn builder() -> SignalEngineBuilder {
        SignalEngineBuilder::new()
    }

    /// Engine over an empty in-memory store
    pub fn in_memory(config: SignalConfig) -> Result<Self> {
        Self::builder().with_config(config).build()
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Validate and store a report, registering unseen drugs
    pub async fn ingest(&self, request: &ReportRequest) -> Result<CombinationReport> {
        algorithm::ingest(
            self.store.as_ref(),
            &self.registry,
            &self.config.vocabularies,
            request,
        )
        .await
    }

    /// Signal details of one combination within a demographic stratum
    pub async fn lookup<S: AsRef<str>>(
        &self,
        names: &[S],
        condition: &DemographicCondition,
    ) -> Result<LookupResult> {
        algorithm::lookup(self.store.as_ref(), &self.config, names, condition).await
    }

    /// Combinations whose signal exceeds the threshold, ascending by percentage
    pub async fn survey(&self, condition: &DemographicCondition) -> Result<Vec<SurveyEntry>> {
        algorithm::survey(self.store.as_ref(), &self.config, condition).await
    }

    /// Number of reports in a demographic stratum
    pub async fn rows(&self, condition: &DemographicCondition) -> Result<u64> {
        self.store
            .count(&ReportFilter::condition(condition.clone()))
            .await
    }

    /// Remove every report and drug
    pub async fn reset(&self) -> Result<()> {
        let start = Instant::now();
        log_operation_start("Resetting", "report corpus");
        let rows = self.rows(&DemographicCondition::any()).await?;
        self.store.reset().await?;
        log_operation_complete("removed", "report corpus", rows as usize, Some(start.elapsed()));
        Ok(())
    }
}
