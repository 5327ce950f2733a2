//! Report store interface
//!
//! The engine never talks to a database directly. Everything it needs from
//! persistence goes through [`ReportStore`]: counting, grouping, drug lookup,
//! atomic drug upsert, report insertion and a bulk reset.

pub mod memory;
pub mod timeout;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::ReportFilter;
use crate::models::{Combination, CombinationReport, Drug};

pub use memory::InMemoryReportStore;
pub use timeout::TimeoutStore;

/// Boxed future returned by store operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Report attribute a corpus can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    /// Canonical drug combination
    Combination,
    /// Symptom code
    Symptom,
    /// Age decade bucket
    Age,
    /// Gender code
    Gender,
    /// Race code (possibly missing)
    Race,
}

impl GroupField {
    /// Extract the grouping key of a report
    #[must_use]
    pub fn key_of(self, report: &CombinationReport) -> GroupKey {
        match self {
            Self::Combination => GroupKey::Combination(report.drugs.clone()),
            Self::Symptom => GroupKey::Symptom(report.symptom),
            Self::Age => GroupKey::Age(report.age),
            Self::Gender => GroupKey::Gender(report.gender),
            Self::Race => GroupKey::Race(report.race),
        }
    }
}

/// Value of a grouping key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupKey {
    /// Canonical drug combination
    Combination(Combination),
    /// Symptom code
    Symptom(u32),
    /// Age decade bucket
    Age(u32),
    /// Gender code
    Gender(u32),
    /// Race code
    Race(Option<u32>),
}

/// Number of reports sharing a grouping key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    /// Grouping key
    pub key: GroupKey,
    /// Number of matching reports
    pub count: u64,
}

/// Append-only storage of combination reports and the drug registry
///
/// Implementations must make [`ReportStore::upsert_drug_if_absent`] atomic with
/// respect to the drug name and must insert reports as whole records.
pub trait ReportStore: Send + Sync {
    /// Count reports matching a filter
    fn count<'a>(&'a self, filter: &'a ReportFilter) -> StoreFuture<'a, u64>;

    /// Find registry drugs whose name is in `names`; missing names are simply absent
    fn find_drugs<'a>(&'a self, names: &'a [String]) -> StoreFuture<'a, Vec<Drug>>;

    /// Count reports matching a filter grouped by one attribute (unordered)
    fn group_by<'a>(
        &'a self,
        field: GroupField,
        filter: &'a ReportFilter,
    ) -> StoreFuture<'a, Vec<GroupCount>>;

    /// Append a report
    fn insert(&self, report: CombinationReport) -> StoreFuture<'_, ()>;

    /// Insert `candidate` unless a drug with the same name exists; returns the stored drug
    ///
    /// May fail with `DuplicateNameConflict` when the backend detects a race on
    /// its uniqueness constraint; callers are expected to retry the lookup.
    fn upsert_drug_if_absent(&self, candidate: Drug) -> StoreFuture<'_, Drug>;

    /// Remove every report and drug
    fn reset(&self) -> StoreFuture<'_, ()>;
}
