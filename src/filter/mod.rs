//! Report filtering criteria
//!
//! This module provides the demographic conditions used to stratify the
//! corpus and the report filter the store evaluates.

use serde::{Deserialize, Serialize};

use crate::models::{Combination, CombinationReport};

/// Defines a criterion for filtering reports
pub trait FilterCriteria<T> {
    /// Determine if an entity meets the filter criteria
    fn meets_criteria(&self, entity: &T) -> bool;
}

/// Demographic stratum; every field that is set must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicCondition {
    /// Age decade bucket
    pub age: Option<u32>,
    /// Gender code
    pub gender: Option<u32>,
    /// Race code
    pub race: Option<u32>,
}

impl DemographicCondition {
    /// Condition matching every report
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to an age bucket
    #[must_use]
    pub const fn with_age(mut self, age_bucket: u32) -> Self {
        self.age = Some(age_bucket);
        self
    }

    /// Restrict to a gender code
    #[must_use]
    pub const fn with_gender(mut self, gender: u32) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Restrict to a race code
    #[must_use]
    pub const fn with_race(mut self, race: u32) -> Self {
        self.race = Some(race);
        self
    }
}

impl FilterCriteria<CombinationReport> for DemographicCondition {
    fn meets_criteria(&self, report: &CombinationReport) -> bool {
        if let Some(age) = self.age {
            if report.age != age {
                return false;
            }
        }
        if let Some(gender) = self.gender {
            if report.gender != gender {
                return false;
            }
        }
        if let Some(race) = self.race {
            if report.race != Some(race) {
                return false;
            }
        }
        true
    }
}

/// Filter evaluated by the report store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Only reports of exactly this combination
    pub combination: Option<Combination>,
    /// Demographic stratum
    pub condition: DemographicCondition,
}

impl ReportFilter {
    /// Filter on a demographic condition only
    #[must_use]
    pub fn condition(condition: DemographicCondition) -> Self {
        Self {
            combination: None,
            condition,
        }
    }

    /// Filter on a combination within a demographic condition
    #[must_use]
    pub fn combination(combination: Combination, condition: DemographicCondition) -> Self {
        Self {
            combination: Some(combination),
            condition,
        }
    }
}

impl FilterCriteria<CombinationReport> for ReportFilter {
    fn meets_criteria(&self, report: &CombinationReport) -> bool {
        if let Some(combination) = &self.combination {
            if &report.drugs != combination {
                return false;
            }
        }
        self.condition.meets_criteria(report)
    }
}
