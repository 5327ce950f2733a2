//! Corpus-wide survey of combinations whose signal exceeds the threshold

use std::time::Instant;

use log::{info, warn};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::algorithm::signal::score::score;
use crate::config::SignalConfig;
use crate::error::{MedifactError, Result};
use crate::filter::{DemographicCondition, ReportFilter};
use crate::models::Drug;
use crate::store::{GroupCount, GroupField, GroupKey, ReportStore};

/// Minimum number of reports a combination needs before it is scored in a survey
pub const SURVEY_MIN_COUNT: u64 = 1;

/// A combination flagged by a survey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyEntry {
    /// Drug names joined with `" + "`
    pub combination_label: String,
    /// Drug names in canonical order
    pub drugs: Vec<String>,
    /// Score as a percentage of the threshold, rounded to two decimals
    pub percentage: f64,
    /// Raw signal score
    pub score: f64,
    /// Reports of the combination in the stratum
    pub count: u64,
}

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// List every combination in the stratum whose score exceeds the threshold
///
/// Unlike lookup, the survey does not require a minimum corpus size; every
/// observed combination is scored. Entries are sorted by ascending percentage.
pub async fn survey(
    store: &dyn ReportStore,
    config: &SignalConfig,
    condition: &DemographicCondition,
) -> Result<Vec<SurveyEntry>> {
    let start = Instant::now();
    let corpus = ReportFilter::condition(condition.clone());

    let rows = store.count(&corpus).await?;
    if rows == 0 {
        info!("Survey skipped: no reports match {condition:?}");
        return Ok(Vec::new());
    }

    let groups = store.group_by(GroupField::Combination, &corpus).await?;
    let populations = load_populations(store, &groups).await?;

    let mut entries: Vec<SurveyEntry> = groups
        .par_iter()
        .filter_map(|group| score_group(group, &populations, rows, config.threshold))
        .collect();

    entries.sort_by(|a, b| {
        a.percentage
            .total_cmp(&b.percentage)
            .then_with(|| a.combination_label.cmp(&b.combination_label))
    });

    info!(
        "Survey flagged {} of {} combinations over {} reports in {:?}",
        entries.len(),
        groups.len(),
        rows,
        start.elapsed()
    );
    Ok(entries)
}

/// Fetch every drug referenced by the groups in one store call
///
/// Every referenced drug must be registered with a valid prevalence.
async fn load_populations(
    store: &dyn ReportStore,
    groups: &[GroupCount],
) -> Result<FxHashMap<String, Drug>> {
    let names: FxHashSet<&String> = groups
        .iter()
        .filter_map(|group| match &group.key {
            GroupKey::Combination(combination) => Some(combination.names()),
            _ => None,
        })
        .flatten()
        .collect();
    let names: Vec<String> = names.into_iter().cloned().collect();

    let drugs: FxHashMap<String, Drug> = store
        .find_drugs(&names)
        .await?
        .into_iter()
        .map(|drug| (drug.name().to_string(), drug))
        .collect();

    let mut missing: Vec<String> = names
        .into_iter()
        .filter(|name| !drugs.contains_key(name))
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(MedifactError::UnknownDrug(missing));
    }
    drugs.values().try_for_each(Drug::validate)?;
    Ok(drugs)
}

/// Score one combination group; `None` when it is not reported
fn score_group(
    group: &GroupCount,
    populations: &FxHashMap<String, Drug>,
    rows: u64,
    threshold: f64,
) -> Option<SurveyEntry> {
    let GroupKey::Combination(combination) = &group.key else {
        warn!("Ignoring non-combination group {:?} in survey", group.key);
        return None;
    };
    if group.count < SURVEY_MIN_COUNT {
        return None;
    }

    // Names were checked against the registry in `load_populations`.
    let drugs: Vec<Drug> = combination
        .names()
        .iter()
        .filter_map(|name| populations.get(name).cloned())
        .collect();

    match score(&drugs, group.count, rows) {
        Ok(value) if value > threshold => Some(SurveyEntry {
            combination_label: combination.label(),
            drugs: combination.names().to_vec(),
            percentage: round2(value / threshold * 100.0),
            score: value,
            count: group.count,
        }),
        Ok(_) => None,
        Err(e) => {
            warn!("Skipping {combination} in survey: {e}");
            None
        }
    }
}
