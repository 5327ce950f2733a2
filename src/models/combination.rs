//! Canonical drug combinations
//!
//! A combination is identified by its drug names in ascending order, so
//! `[B, A]` and `[A, B]` are the same combination for grouping and lookup.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{MedifactError, Result};

/// Smallest number of drugs in a combination
pub const MIN_DRUGS: usize = 2;
/// Largest number of drugs in a combination
pub const MAX_DRUGS: usize = 3;

/// Separator used in human-readable combination labels
pub const LABEL_SEPARATOR: &str = " + ";

/// A canonical set of 2 or 3 distinct drug names
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Combination(SmallVec<[String; MAX_DRUGS]>);

impl Combination {
    /// Build a combination from drug names
    ///
    /// Names are trimmed, must be non-blank and distinct, and there must be
    /// 2 or 3 of them. The result is sorted by name.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: SmallVec<[String; MAX_DRUGS]> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .collect();

        if names.len() < MIN_DRUGS {
            return Err(MedifactError::invalid(format!(
                "at least {MIN_DRUGS} drugs are required, got {}",
                names.len()
            )));
        }
        if names.len() > MAX_DRUGS {
            return Err(MedifactError::invalid(format!(
                "at most {MAX_DRUGS} drugs are supported, got {}",
                names.len()
            )));
        }
        if names.iter().any(String::is_empty) {
            return Err(MedifactError::invalid("drug names must not be blank"));
        }

        names.sort();
        if let Some((dup, _)) = names.iter().tuple_windows().find(|(a, b)| a == b) {
            return Err(MedifactError::invalid(format!("duplicate drug name '{dup}'")));
        }

        Ok(Self(names))
    }

    /// Drug names in canonical order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Number of drugs in the combination
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the combination holds no drugs (never true once constructed)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Human-readable label, e.g. `Drug A + Drug B`
    #[must_use]
    pub fn label(&self) -> String {
        self.0.iter().join(LABEL_SEPARATOR)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl TryFrom<Vec<String>> for Combination {
    type Error = MedifactError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<Combination> for Vec<String> {
    fn from(combination: Combination) -> Self {
        combination.0.into_vec()
    }
}
