//! Domain models for drug combination reports
//!
//! This module contains the drug registry entries, the canonical combination
//! identity and the immutable reports that the corpus is made of.

pub mod combination;
pub mod drug;
pub mod report;

// Re-export commonly used items
pub use combination::{Combination, MAX_DRUGS, MIN_DRUGS};
pub use drug::{Drug, MAX_POPULATION, sort_canonical};
pub use report::{CombinationReport, ReportRequest, age_bucket};
