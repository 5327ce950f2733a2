//! Signal detection over the report corpus
//!
//! This module provides the disproportionality score, the single-combination
//! lookup with its stratified breakdowns, and the corpus-wide survey.

pub mod breakdown;
pub mod lookup;
pub mod score;
pub mod survey;

// Re-export commonly used items
pub use breakdown::{Breakdowns, Bucket};
pub use lookup::{INSUFFICIENT_DATA, LookupResult, lookup};
pub use score::score;
pub use survey::{SURVEY_MIN_COUNT, SurveyEntry, survey};
