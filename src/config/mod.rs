//! Configuration for the signal engine.
//!
//! Every field has a default so a deployment only needs to override what it
//! changes. Configuration can be loaded from a JSON file with [`SignalConfig::from_json_file`].

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MedifactError, Result};
use crate::models::MAX_POPULATION;

/// Symptoms offered on the report form
pub const DEFAULT_SYMPTOMS: [&str; 10] = [
    "Vomit with blood",
    "Productive cough with blood",
    "Diarrhea with blood or coffee-like stools",
    "Unproductive constipation with blood",
    "Green or yellow vomit",
    "Incontinence",
    "Foul breath",
    "Fruity, alcoholic breath",
    "Insomnia",
    "Other",
];

/// Genders offered on the report form
pub const DEFAULT_GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// Races offered on the report form
pub const DEFAULT_RACES: [&str; 6] = [
    "American Indian or Alaska Native",
    "Asian",
    "Black or African American",
    "Native Hawaiian or Other Pacific Islander",
    "White",
    "Other",
];

/// Fixed vocabularies the report codes index into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabularies {
    /// Symptom names, indexed by symptom code
    pub symptoms: Vec<String>,
    /// Gender names, indexed by gender code
    pub genders: Vec<String>,
    /// Race names, indexed by race code (empty when the deployment does not collect race)
    pub races: Vec<String>,
    /// Drug-name universe used for synthetic corpora
    pub drug_names: Vec<String>,
}

impl Default for Vocabularies {
    fn default() -> Self {
        Self {
            symptoms: DEFAULT_SYMPTOMS.iter().map(ToString::to_string).collect(),
            genders: DEFAULT_GENDERS.iter().map(ToString::to_string).collect(),
            races: DEFAULT_RACES.iter().map(ToString::to_string).collect(),
            drug_names: (b'A'..=b'Z').map(|c| format!("Drug {}", c as char)).collect(),
        }
    }
}

impl Vocabularies {
    /// Label of a symptom code
    #[must_use]
    pub fn symptom_label(&self, code: u32) -> String {
        label_of(&self.symptoms, code)
    }

    /// Label of a gender code
    #[must_use]
    pub fn gender_label(&self, code: u32) -> String {
        label_of(&self.genders, code)
    }

    /// Label of an optional race code
    #[must_use]
    pub fn race_label(&self, code: Option<u32>) -> String {
        code.map_or_else(|| "Unspecified".to_string(), |c| label_of(&self.races, c))
    }
}

fn label_of(vocabulary: &[String], code: u32) -> String {
    vocabulary
        .get(code as usize)
        .cloned()
        .unwrap_or_else(|| format!("#{code}"))
}

/// Configuration for the signal engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Score above which a combination is reported as a signal
    pub threshold: f64,
    /// Share of synthetic reports that carry three drugs instead of two
    pub three_drug_ratio: f64,
    /// Minimum corpus size before a lookup score is computed
    pub min_lookup_rows: u64,
    /// Lower bound of the stub prevalence assigned to unseen drugs
    pub population_min: f64,
    /// Upper bound of the stub prevalence assigned to unseen drugs
    pub population_max: f64,
    /// Seed for prevalence sampling; entropy-seeded when absent
    pub random_seed: Option<u64>,
    /// Maximum number of find-or-insert rounds when resolving a drug
    pub resolve_attempts: usize,
    /// Timeout applied to every store call, in milliseconds
    pub store_timeout_ms: Option<u64>,
    /// Vocabularies for symptoms, genders, races and drug names
    pub vocabularies: Vocabularies,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            threshold: 200.0,
            three_drug_ratio: 0.5,
            min_lookup_rows: 3,
            population_min: 0.001,
            population_max: 0.05,
            random_seed: None,
            resolve_attempts: 3,
            store_timeout_ms: None,
            vocabularies: Vocabularies::default(),
        }
    }
}

impl SignalConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        log::info!("Loaded signal configuration from {}", path.display());
        Ok(config)
    }

    /// Check that the configured values are usable
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(MedifactError::Config(format!(
                "threshold must be a positive number, got {}",
                self.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.three_drug_ratio) {
            return Err(MedifactError::Config(format!(
                "three_drug_ratio must be within [0, 1], got {}",
                self.three_drug_ratio
            )));
        }
        if !(self.population_min > 0.0
            && self.population_min <= self.population_max
            && self.population_max <= MAX_POPULATION)
        {
            return Err(MedifactError::Config(format!(
                "population range must satisfy 0 < min <= max <= {MAX_POPULATION}, got [{}, {}]",
                self.population_min, self.population_max
            )));
        }
        if self.resolve_attempts == 0 {
            return Err(MedifactError::Config(
                "resolve_attempts must be at least 1".to_string(),
            ));
        }
        if self.vocabularies.symptoms.is_empty() || self.vocabularies.genders.is_empty() {
            return Err(MedifactError::Config(
                "symptom and gender vocabularies must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Timeout applied to store calls
    #[must_use]
    pub fn store_timeout(&self) -> Option<Duration> {
        self.store_timeout_ms.map(Duration::from_millis)
    }
}

impl fmt::Display for SignalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Signal Configuration:")?;
        writeln!(f, "  Threshold: {}", self.threshold)?;
        writeln!(f, "  Three Drug Ratio: {}", self.three_drug_ratio)?;
        writeln!(f, "  Minimum Lookup Rows: {}", self.min_lookup_rows)?;
        writeln!(
            f,
            "  Population Range: [{}, {}]",
            self.population_min, self.population_max
        )?;
        if let Some(seed) = self.random_seed {
            writeln!(f, "  Random Seed: {seed}")?;
        }
        writeln!(f, "  Resolve Attempts: {}", self.resolve_attempts)?;
        if let Some(timeout) = self.store_timeout_ms {
            writeln!(f, "  Store Timeout: {timeout}ms")?;
        }
        writeln!(
            f,
            "  Vocabularies: {} symptoms, {} genders, {} races, {} drug names",
            self.vocabularies.symptoms.len(),
            self.vocabularies.genders.len(),
            self.vocabularies.races.len(),
            self.vocabularies.drug_names.len()
        )
    }
}
