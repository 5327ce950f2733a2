//! Drug registry entries

use serde::{Deserialize, Serialize};

use crate::error::{MedifactError, Result};

/// Largest baseline prevalence a registered drug may carry
pub const MAX_POPULATION: f64 = 0.05;

/// A drug known to the registry together with its baseline prevalence
///
/// Both fields are fixed once the drug has been registered; the struct only
/// exposes accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drug {
    name: String,
    population: f64,
}

impl Drug {
    /// Create a registry entry
    #[must_use]
    pub fn new(name: impl Into<String>, population: f64) -> Self {
        Self {
            name: name.into(),
            population,
        }
    }

    /// Unique drug name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Estimated share of the population taking this drug
    #[must_use]
    pub const fn population(&self) -> f64 {
        self.population
    }

    /// Check the prevalence lies in `(0, MAX_POPULATION]`
    ///
    /// NaN and infinities fail the check, so a validated drug never makes a
    /// score non-finite.
    pub fn validate(&self) -> Result<()> {
        if self.population > 0.0 && self.population <= MAX_POPULATION {
            Ok(())
        } else {
            Err(MedifactError::InvalidPopulation {
                name: self.name.clone(),
                population: self.population,
            })
        }
    }
}

/// Sort drugs into canonical (name ascending) order
pub fn sort_canonical(drugs: &mut [Drug]) {
    drugs.sort_by(|a, b| a.name.cmp(&b.name));
}
