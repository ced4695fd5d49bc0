//! Hodges-Lehmann Shift Estimator
//!
//! Median of the pairwise differences between two samples, accumulated into
//! fixed-precision bins so the full difference set never has to be
//! materialized. Above a configurable pair budget the differences are drawn
//! with a seeded generator, keeping repeated runs reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use thiserror::Error;

/// Shift estimator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HodgesConfig {
    /// Decimal digits the pairwise differences are rounded to
    pub precision: u32,
    /// Pair budget above which differences are subsampled
    pub max_pairs: u64,
    /// Seed for the subsampling generator
    pub seed: u64,
}

impl Default for HodgesConfig {
    fn default() -> Self {
        Self {
            precision: 2,
            max_pairs: 4_000_000,
            seed: 0,
        }
    }
}

/// Errors from the shift estimator
#[derive(Debug, Clone, Error)]
pub enum HodgesError {
    #[error("first samples are empty")]
    EmptyFirst,
    #[error("second samples are empty")]
    EmptySecond,
}

/// Estimate the location shift between two samples as the median of the
/// pairwise differences `second[j] - first[i]`.
///
/// Differences are rounded to `config.precision` decimal digits and counted
/// in sorted bins; the median is then found in one cumulative pass. When
/// `n1 * n2` exceeds `config.max_pairs`, that many pairs are drawn with a
/// generator seeded from `config.seed` instead of enumerating all of them.
pub fn hodges_lehmann_shift(
    first: &[f64],
    second: &[f64],
    config: &HodgesConfig,
) -> Result<f64, HodgesError> {
    if first.is_empty() {
        return Err(HodgesError::EmptyFirst);
    }
    if second.is_empty() {
        return Err(HodgesError::EmptySecond);
    }

    let scale = 10f64.powi(config.precision as i32);
    let budget = config.max_pairs.max(1);
    let total_pairs = (first.len() as u64).saturating_mul(second.len() as u64);

    let mut bins: BTreeMap<i64, u64> = BTreeMap::new();
    let count = if total_pairs <= budget {
        for &a in first {
            for &b in second {
                let key = ((b - a) * scale).round() as i64;
                *bins.entry(key).or_insert(0) += 1;
            }
        }
        total_pairs
    } else {
        let mut rng = StdRng::seed_from_u64(config.seed);
        for _ in 0..budget {
            let a = first[rng.gen_range(0..first.len())];
            let b = second[rng.gen_range(0..second.len())];
            let key = ((b - a) * scale).round() as i64;
            *bins.entry(key).or_insert(0) += 1;
        }
        budget
    };

    Ok(binned_median(&bins, count) / scale)
}

/// Median over sorted bins, located by cumulative count. `count` must equal
/// the sum of the bin counts and be non-zero.
fn binned_median(bins: &BTreeMap<i64, u64>, count: u64) -> f64 {
    let lower_pos = (count + 1) / 2;
    let upper_pos = if count % 2 == 0 {
        lower_pos + 1
    } else {
        lower_pos
    };

    let mut cumulative = 0u64;
    let mut lower = 0i64;
    let mut have_lower = false;
    for (&key, &bin_count) in bins {
        cumulative += bin_count;
        if !have_lower && cumulative >= lower_pos {
            lower = key;
            have_lower = true;
        }
        if cumulative >= upper_pos {
            return (lower as f64 + key as f64) / 2.0;
        }
    }
    0.0
}
