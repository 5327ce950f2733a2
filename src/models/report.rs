//! Combination reports and the ingestion request they are built from

use serde::{Deserialize, Serialize};

use crate::models::combination::Combination;

/// Width of an age bucket in years
pub const AGE_BUCKET_YEARS: u32 = 10;

/// Convert a raw age in years into its decade bucket
#[must_use]
pub const fn age_bucket(age: u32) -> u32 {
    age / AGE_BUCKET_YEARS
}

/// A single submitted report of drugs taken together and the symptom observed
///
/// Reports are immutable once stored; the corpus only grows until it is reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationReport {
    /// Drugs taken together, in canonical order
    pub drugs: Combination,
    /// Index into the symptom vocabulary
    pub symptom: u32,
    /// Age decade bucket (raw age / 10)
    pub age: u32,
    /// Index into the gender vocabulary
    pub gender: u32,
    /// Index into the race vocabulary, when collected
    pub race: Option<u32>,
}

/// A report as submitted by the presentation layer, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Drug names as entered; order is irrelevant
    pub drugs: Vec<String>,
    /// Index into the symptom vocabulary
    pub symptom: u32,
    /// Raw age in years
    pub age: u32,
    /// Index into the gender vocabulary
    pub gender: u32,
    /// Index into the race vocabulary, when collected
    #[serde(default)]
    pub race: Option<u32>,
}

impl ReportRequest {
    /// Create a request for the given drugs and symptom
    #[must_use]
    pub fn new<S: Into<String>>(drugs: impl IntoIterator<Item = S>, symptom: u32) -> Self {
        Self {
            drugs: drugs.into_iter().map(Into::into).collect(),
            symptom,
            age: 0,
            gender: 0,
            race: None,
        }
    }

    /// Set the raw age
    #[must_use]
    pub const fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    /// Set the gender code
    #[must_use]
    pub const fn with_gender(mut self, gender: u32) -> Self {
        self.gender = gender;
        self
    }

    /// Set the race code
    #[must_use]
    pub const fn with_race(mut self, race: u32) -> Self {
        self.race = Some(race);
        self
    }
}
