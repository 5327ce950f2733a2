//! A Rust library for detecting adverse-event signals in drug combinations.
//!
//! Reports of 2 or 3 drugs taken together, the symptom observed and the
//! reporter's demographics are accumulated in a report store. Each
//! combination's co-occurrence rate is compared with what the drugs' baseline
//! prevalence would predict if they were taken independently, and
//! combinations scoring above a configured threshold are flagged.

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod models;
pub mod registry;
pub mod store;
pub mod synthetic;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{SignalConfig, Vocabularies};
pub use engine::{SignalEngine, SignalEngineBuilder};
pub use error::{MedifactError, Result};

// Domain models
pub use filter::{DemographicCondition, ReportFilter};
pub use models::{Combination, CombinationReport, Drug, ReportRequest};

// Signal detection
pub use algorithm::signal::{Breakdowns, Bucket, LookupResult, SurveyEntry};

// Storage
pub use store::{GroupCount, GroupField, GroupKey, InMemoryReportStore, ReportStore, TimeoutStore};
