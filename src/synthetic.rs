//! Synthetic report corpora
//!
//! Generates random reports over the configured vocabularies so the engine
//! can be exercised without real submissions. Each report carries three drugs
//! with probability `three_drug_ratio` and two otherwise.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use rand::prelude::*;
use rand::seq::IndexedRandom;

use crate::config::SignalConfig;
use crate::engine::SignalEngine;
use crate::error::{MedifactError, Result};
use crate::models::{MAX_DRUGS, MIN_DRUGS, ReportRequest};
use crate::utils::log_operation_complete;
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar};

/// Oldest raw age drawn for a synthetic report
pub const MAX_SYNTHETIC_AGE: u32 = 99;

/// Generate `n` random report requests
pub fn generate_requests<R: Rng + ?Sized>(
    config: &SignalConfig,
    n: usize,
    rng: &mut R,
) -> Result<Vec<ReportRequest>> {
    let vocabularies = &config.vocabularies;
    if vocabularies.drug_names.len() < MAX_DRUGS {
        return Err(MedifactError::Config(format!(
            "synthetic corpora need at least {MAX_DRUGS} drug names, got {}",
            vocabularies.drug_names.len()
        )));
    }

    let requests = (0..n)
        .map(|_| {
            let size = if rng.random_bool(config.three_drug_ratio) {
                MAX_DRUGS
            } else {
                MIN_DRUGS
            };
            let drugs = vocabularies
                .drug_names
                .choose_multiple(&mut *rng, size)
                .cloned()
                .collect();
            let race = if vocabularies.races.is_empty() {
                None
            } else {
                Some(rng.random_range(0..vocabularies.races.len()) as u32)
            };
            ReportRequest {
                drugs,
                symptom: rng.random_range(0..vocabularies.symptoms.len()) as u32,
                age: rng.random_range(0..=MAX_SYNTHETIC_AGE),
                gender: rng.random_range(0..vocabularies.genders.len()) as u32,
                race,
            }
        })
        .collect();

    Ok(requests)
}

/// Ingest `n` synthetic reports into `engine`, returning how many were stored
///
/// Reports are ingested concurrently, one in flight per CPU, with a progress bar.
pub async fn seed_corpus(engine: &SignalEngine, n: usize, seed: Option<u64>) -> Result<usize> {
    let start = Instant::now();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let requests = generate_requests(engine.config(), n, &mut rng)?;

    let pb = create_main_progress_bar(n as u64, Some("Seeding synthetic reports"));
    let mut results = stream::iter(requests.iter())
        .map(|request| engine.ingest(request))
        .buffer_unordered(num_cpus::get());

    let mut stored = 0;
    while let Some(result) = results.next().await {
        result?;
        stored += 1;
        pb.inc(1);
    }
    finish_progress_bar(&pb, Some("Synthetic corpus ready"));

    log_operation_complete("seeded", "synthetic corpus", stored, Some(start.elapsed()));
    Ok(stored)
}
