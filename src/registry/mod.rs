//! Drug registry
//!
//! Resolves drug names to registry entries, registering unseen names with a
//! stub baseline prevalence. Registration goes through the store's atomic
//! upsert so concurrent resolutions of the same name agree on one entry.

use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;
use rand::prelude::*;

use crate::config::SignalConfig;
use crate::error::Result;
use crate::models::Drug;
use crate::store::ReportStore;

/// Samples stub prevalence values for newly registered drugs
#[derive(Debug)]
pub struct PopulationSampler {
    range: RangeInclusive<f64>,
    rng: Mutex<StdRng>,
}

impl PopulationSampler {
    /// Create a sampler over `range`, seeded from `seed` or from OS entropy
    #[must_use]
    pub fn new(range: RangeInclusive<f64>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            range,
            rng: Mutex::new(rng),
        }
    }

    /// Create a sampler from the configured population range and seed
    #[must_use]
    pub fn from_config(config: &SignalConfig) -> Self {
        Self::new(
            config.population_min..=config.population_max,
            config.random_seed,
        )
    }

    /// Draw a prevalence value
    ///
    /// A poisoned lock is recovered; the generator state is valid after any
    /// panic in another holder.
    pub fn sample(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(self.range.clone())
    }
}

/// Resolve-or-create directory of drugs
pub struct DrugRegistry {
    store: Arc<dyn ReportStore>,
    sampler: PopulationSampler,
    max_attempts: usize,
}

impl DrugRegistry {
    /// Create a registry on top of a store
    #[must_use]
    pub fn new(
        store: Arc<dyn ReportStore>,
        sampler: PopulationSampler,
        max_attempts: usize,
    ) -> Self {
        Self {
            store,
            sampler,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create a registry configured from `config`
    #[must_use]
    pub fn from_config(store: Arc<dyn ReportStore>, config: &SignalConfig) -> Self {
        Self::new(
            store,
            PopulationSampler::from_config(config),
            config.resolve_attempts,
        )
    }

    /// Look up `name`, registering it with a sampled prevalence if it is unseen
    ///
    /// A `DuplicateNameConflict` from the store means another resolution won
    /// the race; the lookup is retried up to the configured number of attempts.
    pub async fn resolve(&self, name: &str) -> Result<Drug> {
        let names = [name.to_string()];
        let mut attempt = 0;
        loop {
            attempt += 1;

            if let Some(drug) = self.store.find_drugs(&names).await?.into_iter().next() {
                return Ok(drug);
            }

            let candidate = Drug::new(name, self.sampler.sample());
            match self.store.upsert_drug_if_absent(candidate).await {
                Ok(drug) => {
                    debug!(
                        "Registered drug '{}' with population {:.4}",
                        drug.name(),
                        drug.population()
                    );
                    return Ok(drug);
                }
                Err(e) if e.is_conflict() && attempt < self.max_attempts => {
                    debug!("Conflict registering '{name}' (attempt {attempt}), retrying lookup");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
