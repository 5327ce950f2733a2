//! Disproportionality score for 2- and 3-drug combinations
//!
//! The pair score compares the observed co-occurrence count with the count
//! expected if the two drugs were taken independently at their baseline
//! prevalence, normalized by corpus size:
//!
//! ```text
//! score(a, b) = count / (p_a * p_b) / rows
//! ```
//!
//! The triple score sums the three pair scores and subtracts an
//! inclusion-exclusion correction for the expected overlap:
//!
//! ```text
//! score(a, b, c) = score(a, b) + score(b, c) + score(c, a)
//!                - count / (p_a p_b + p_b p_c + p_c p_a - p_a p_b p_c) / rows
//! ```
//!
//! Triple scores can be negative. That is a valid result and is kept as-is
//! for ranking.

use crate::error::{MedifactError, Result};
use crate::models::Drug;

/// Compute the signal score of `drugs` observed `count` times in a corpus of `rows` reports
///
/// Returns `0.0` for an empty corpus. Only combinations of 2 or 3 drugs are
/// supported; any other arity is rejected with `InvalidCombination`. A drug
/// whose prevalence is outside `(0, MAX_POPULATION]` is rejected with
/// `InvalidPopulation` before anything is divided.
pub fn score(drugs: &[Drug], count: u64, rows: u64) -> Result<f64> {
    drugs.iter().try_for_each(Drug::validate)?;
    match drugs {
        [_, _] | [_, _, _] if rows == 0 => Ok(0.0),
        [a, b] => Ok(pair_score(a, b, count, rows)),
        [a, b, c] => {
            let (pa, pb, pc) = (a.population(), b.population(), c.population());
            let pairs = pair_score(a, b, count, rows)
                + pair_score(b, c, count, rows)
                + pair_score(c, a, count, rows);
            let overlap = pa * pb + pb * pc + pc * pa - pa * pb * pc;
            Ok(pairs - count as f64 / overlap / rows as f64)
        }
        _ => Err(MedifactError::invalid(format!(
            "signal score is defined for 2 or 3 drugs, got {}",
            drugs.len()
        ))),
    }
}

fn pair_score(a: &Drug, b: &Drug, count: u64, rows: u64) -> f64 {
    count as f64 / (a.population() * b.population()) / rows as f64
}
