//! Signal lookup for a single combination

use futures::try_join;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::signal::breakdown::{Breakdowns, ranked_groups, to_buckets};
use crate::algorithm::signal::score::score;
use crate::config::SignalConfig;
use crate::error::{MedifactError, Result};
use crate::filter::{DemographicCondition, ReportFilter};
use crate::models::{Combination, Drug, sort_canonical};
use crate::store::{GroupField, ReportStore};

/// Score returned when the corpus is too small to compute a signal
pub const INSUFFICIENT_DATA: f64 = -1.0;

/// Signal details of one combination within a demographic stratum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Drug names joined with `" + "`
    pub combination_label: String,
    /// Registry entries of the combination, in canonical order
    pub drugs: Vec<Drug>,
    /// Signal score, or `-1` when the stratum holds too few reports
    pub score: f64,
    /// Reports of exactly this combination in the stratum
    pub raw_count: u64,
    /// Reports in the stratum
    pub rows: u64,
    /// Configured signal threshold
    pub threshold: f64,
    /// Whether the score exceeds the threshold
    pub is_signal: bool,
    /// The combination's reports split by symptom and demographics
    pub breakdowns: Breakdowns,
}

/// Resolve the drugs of a combination to registry entries in canonical order
///
/// Fails with `UnknownDrug` listing every name the registry does not know.
pub async fn resolve_existing(
    store: &dyn ReportStore,
    combination: &Combination,
) -> Result<Vec<Drug>> {
    let mut drugs = store.find_drugs(combination.names()).await?;

    if drugs.len() != combination.len() {
        let missing = combination
            .names()
            .iter()
            .filter(|name| !drugs.iter().any(|d| d.name() == name.as_str()))
            .cloned()
            .collect();
        return Err(MedifactError::UnknownDrug(missing));
    }

    sort_canonical(&mut drugs);
    Ok(drugs)
}

/// Look up the signal of a combination of existing drugs
///
/// All counts and breakdowns are fetched concurrently. The score is only
/// computed once the stratum holds at least `min_lookup_rows` reports.
pub async fn lookup<S: AsRef<str>>(
    store: &dyn ReportStore,
    config: &SignalConfig,
    names: &[S],
    condition: &DemographicCondition,
) -> Result<LookupResult> {
    let combination = Combination::new(names)?;
    let drugs = resolve_existing(store, &combination).await?;

    let corpus = ReportFilter::condition(condition.clone());
    let scoped = ReportFilter::combination(combination.clone(), condition.clone());

    let (rows, raw_count, symptom, age, gender, race) = try_join!(
        store.count(&corpus),
        store.count(&scoped),
        ranked_groups(store, GroupField::Symptom, &scoped),
        ranked_groups(store, GroupField::Age, &scoped),
        ranked_groups(store, GroupField::Gender, &scoped),
        ranked_groups(store, GroupField::Race, &scoped),
    )?;

    let score = if rows >= config.min_lookup_rows {
        score(&drugs, raw_count, rows)?
    } else {
        INSUFFICIENT_DATA
    };
    debug!("Lookup {combination}: count {raw_count} of {rows} rows, score {score:.2}");

    let vocabularies = &config.vocabularies;
    Ok(LookupResult {
        combination_label: combination.label(),
        drugs,
        score,
        raw_count,
        rows,
        threshold: config.threshold,
        is_signal: score > config.threshold,
        breakdowns: Breakdowns {
            symptom: to_buckets(symptom, vocabularies),
            age: to_buckets(age, vocabularies),
            gender: to_buckets(gender, vocabularies),
            race: to_buckets(race, vocabularies),
        },
    })
}
