//! Algorithms over the report corpus
//!
//! - `ingest`: validation and canonical storage of submitted reports
//! - `signal`: scoring, stratified lookup and threshold survey

pub mod ingest;
pub mod signal;

pub use ingest::ingest;
pub use signal::{LookupResult, SurveyEntry, lookup, score, survey};
