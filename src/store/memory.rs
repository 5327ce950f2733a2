//! In-memory report store
//!
//! Keeps drugs in a name-keyed map and reports in an append-only vector, each
//! behind its own lock. Used by the demo binary and the test-suite.

use std::sync::{PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::error::{MedifactError, Result};
use crate::filter::{FilterCriteria, ReportFilter};
use crate::models::{CombinationReport, Drug};
use crate::store::{GroupCount, GroupField, GroupKey, ReportStore, StoreFuture};

fn poisoned<T>(_: PoisonError<T>) -> MedifactError {
    MedifactError::store("in-memory store lock poisoned")
}

/// Report store backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    drugs: RwLock<FxHashMap<String, Drug>>,
    reports: RwLock<Vec<CombinationReport>>,
}

impl InMemoryReportStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with pre-registered drugs
    #[must_use]
    pub fn with_drugs(drugs: impl IntoIterator<Item = Drug>) -> Self {
        let drugs = drugs
            .into_iter()
            .map(|drug| (drug.name().to_string(), drug))
            .collect();
        Self {
            drugs: RwLock::new(drugs),
            reports: RwLock::default(),
        }
    }

    fn count_matching(&self, filter: &ReportFilter) -> Result<u64> {
        let reports = self.reports.read().map_err(poisoned)?;
        Ok(reports.iter().filter(|r| filter.meets_criteria(r)).count() as u64)
    }

    fn find_named(&self, names: &[String]) -> Result<Vec<Drug>> {
        let drugs = self.drugs.read().map_err(poisoned)?;
        Ok(names.iter().filter_map(|name| drugs.get(name).cloned()).collect())
    }

    fn group_matching(&self, field: GroupField, filter: &ReportFilter) -> Result<Vec<GroupCount>> {
        let reports = self.reports.read().map_err(poisoned)?;
        let mut groups: FxHashMap<GroupKey, u64> = FxHashMap::default();
        for report in reports.iter().filter(|r| filter.meets_criteria(r)) {
            *groups.entry(field.key_of(report)).or_insert(0) += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(key, count)| GroupCount { key, count })
            .collect())
    }

    fn append(&self, report: CombinationReport) -> Result<()> {
        self.reports.write().map_err(poisoned)?.push(report);
        Ok(())
    }

    fn upsert(&self, candidate: Drug) -> Result<Drug> {
        candidate.validate()?;
        let mut drugs = self.drugs.write().map_err(poisoned)?;
        let stored = drugs
            .entry(candidate.name().to_string())
            .or_insert(candidate);
        Ok(stored.clone())
    }

    fn clear(&self) -> Result<()> {
        self.reports.write().map_err(poisoned)?.clear();
        self.drugs.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

impl ReportStore for InMemoryReportStore {
    fn count<'a>(&'a self, filter: &'a ReportFilter) -> StoreFuture<'a, u64> {
        Box::pin(async move { self.count_matching(filter) })
    }

    fn find_drugs<'a>(&'a self, names: &'a [String]) -> StoreFuture<'a, Vec<Drug>> {
        Box::pin(async move { self.find_named(names) })
    }

    fn group_by<'a>(
        &'a self,
        field: GroupField,
        filter: &'a ReportFilter,
    ) -> StoreFuture<'a, Vec<GroupCount>> {
        Box::pin(async move { self.group_matching(field, filter) })
    }

    fn insert(&self, report: CombinationReport) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.append(report) })
    }

    fn upsert_drug_if_absent(&self, candidate: Drug) -> StoreFuture<'_, Drug> {
        Box::pin(async move { self.upsert(candidate) })
    }

    fn reset(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.clear() })
    }
}
