//! Report ingestion
//!
//! Validates a submitted report, resolves its drugs through the registry and
//! appends the canonical report to the store.

use futures::future::try_join_all;
use log::debug;

use crate::config::Vocabularies;
use crate::error::{MedifactError, Result};
use crate::models::{Combination, CombinationReport, ReportRequest, age_bucket};
use crate::registry::DrugRegistry;
use crate::store::ReportStore;

/// Check the categorical codes of a request against the vocabularies
fn validate_codes(request: &ReportRequest, vocabularies: &Vocabularies) -> Result<()> {
    if request.symptom as usize >= vocabularies.symptoms.len() {
        return Err(MedifactError::invalid(format!(
            "unknown symptom code {}",
            request.symptom
        )));
    }
    if request.gender as usize >= vocabularies.genders.len() {
        return Err(MedifactError::invalid(format!(
            "unknown gender code {}",
            request.gender
        )));
    }
    if let Some(race) = request.race {
        if race as usize >= vocabularies.races.len() {
            return Err(MedifactError::invalid(format!("unknown race code {race}")));
        }
    }
    Ok(())
}

/// Validate, canonicalize and store a report
///
/// Unseen drug names are registered as a side effect. Drug resolution runs
/// concurrently; the report is only inserted once every name is resolved.
pub async fn ingest(
    store: &dyn ReportStore,
    registry: &DrugRegistry,
    vocabularies: &Vocabularies,
    request: &ReportRequest,
) -> Result<CombinationReport> {
    let combination = Combination::new(&request.drugs)?;
    validate_codes(request, vocabularies)?;

    try_join_all(combination.names().iter().map(|name| registry.resolve(name))).await?;

    let report = CombinationReport {
        drugs: combination,
        symptom: request.symptom,
        age: age_bucket(request.age),
        gender: request.gender,
        race: request.race,
    };
    store.insert(report.clone()).await?;

    debug!(
        "Stored report for {} (symptom {}, age bucket {})",
        report.drugs, report.symptom, report.age
    );
    Ok(report)
}
