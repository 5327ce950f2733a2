//! Error handling for the signal engine.

use std::io;

/// Specialized error type for medifact operations
#[derive(Debug, thiserror::Error)]
pub enum MedifactError {
    /// Malformed ingestion or lookup input
    #[error("Invalid combination: {0}")]
    InvalidCombination(String),

    /// One or more drug names are not present in the registry
    #[error("Unknown drug(s): {}", .0.join(", "))]
    UnknownDrug(Vec<String>),

    /// A drug carries a prevalence outside `(0, MAX_POPULATION]`
    #[error("Invalid population {population} for drug '{name}'")]
    InvalidPopulation { name: String, population: f64 },

    /// Two resolutions of the same new drug name raced on the store's uniqueness constraint
    #[error("Duplicate drug name conflict: {0}")]
    DuplicateNameConflict(String),

    /// The report store failed or did not answer in time
    #[error("Report store unavailable: {0}")]
    StoreUnavailable(String),

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reading a configuration file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding a configuration file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MedifactError {
    /// Create an invalid combination error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidCombination(message.into())
    }

    /// Create a store unavailable error
    pub fn store(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Whether the error is a transient registry race that may be retried
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateNameConflict(_))
    }
}

/// Result type for medifact operations
pub type Result<T> = std::result::Result<T, MedifactError>;
