//! Effect Size Estimation
//!
//! Standardizes the difference between two sample groups into one effect
//! size. The denominator is always the larger of the two group standard
//! deviations; the numerator comes from the selected method (fixed absolute
//! delta, fraction of the larger mean, or Hodges-Lehmann shift).

use crate::hodges::{HodgesConfig, HodgesError, hodges_lehmann_shift};
use crate::summary::{Summary, compute_summary};
use crate::{FIXED_EFFECT_NUMERATOR, RELATIVE_EFFECT_FRACTION};
use thiserror::Error;

/// How the standardized effect size is derived
#[derive(Debug, Clone, PartialEq)]
pub enum EffectSizeMethod {
    /// Fixed throughput delta divided by the larger group stddev
    FixedAbsolute {
        /// Absolute difference considered worth detecting, in the unit of
        /// the samples
        numerator: f64,
    },
    /// Fraction of the larger group mean divided by the larger group stddev
    RelativeToMean {
        /// Fraction of the larger mean considered worth detecting
        fraction: f64,
    },
    /// Absolute Hodges-Lehmann shift divided by the larger group stddev
    HodgesLehmann(HodgesConfig),
}

impl Default for EffectSizeMethod {
    fn default() -> Self {
        Self::RelativeToMean {
            fraction: RELATIVE_EFFECT_FRACTION,
        }
    }
}

impl std::fmt::Display for EffectSizeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FixedAbsolute { .. } => "fixed-absolute",
            Self::RelativeToMean { .. } => "relative-to-mean",
            Self::HodgesLehmann(_) => "hodges-lehmann",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for EffectSizeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" | "fixed-absolute" => Ok(Self::FixedAbsolute {
                numerator: FIXED_EFFECT_NUMERATOR,
            }),
            "relative" | "relative-to-mean" => Ok(Self::RelativeToMean {
                fraction: RELATIVE_EFFECT_FRACTION,
            }),
            "hl" | "hodges-lehmann" => Ok(Self::HodgesLehmann(HodgesConfig::default())),
            other => Err(format!("Unknown effect size method: {}", other)),
        }
    }
}

/// Effect size together with the group summaries it was derived from
#[derive(Debug, Clone)]
pub struct EffectAnalysis {
    /// Standardized effect size, always non-negative
    pub effect_size: f64,
    /// Summary of the first group
    pub first: Summary,
    /// Summary of the second group
    pub second: Summary,
    /// Estimated location shift (second minus first); only set by the
    /// Hodges-Lehmann method
    pub shift: Option<f64>,
}

/// Errors from effect size estimation
#[derive(Debug, Clone, Error)]
pub enum EffectError {
    #[error("first samples are empty")]
    EmptyFirst,
    #[error("second samples are empty")]
    EmptySecond,
    #[error("first group needs at least 2 samples, got {0}")]
    InsufficientFirst(usize),
    #[error("second group needs at least 2 samples, got {0}")]
    InsufficientSecond(usize),
    #[error("both groups have zero variance; the effect size is undefined")]
    NoVariance,
    #[error(transparent)]
    Shift(#[from] HodgesError),
}

/// Compute the standardized effect size between two sample groups.
///
/// Dividing by the larger of the two standard deviations keeps the estimate
/// conservative when the groups disagree about spread. Fails when both
/// groups are degenerate, since no denominator exists then.
pub fn effect_size(
    first: &[f64],
    second: &[f64],
    method: &EffectSizeMethod,
) -> Result<EffectAnalysis, EffectError> {
    if first.is_empty() {
        return Err(EffectError::EmptyFirst);
    }
    if second.is_empty() {
        return Err(EffectError::EmptySecond);
    }
    if first.len() < 2 {
        return Err(EffectError::InsufficientFirst(first.len()));
    }
    if second.len() < 2 {
        return Err(EffectError::InsufficientSecond(second.len()));
    }

    let first_summary = compute_summary(first);
    let second_summary = compute_summary(second);

    let max_std = first_summary.std_dev.max(second_summary.std_dev);
    if max_std <= 0.0 {
        return Err(EffectError::NoVariance);
    }

    let (effect, shift) = match method {
        EffectSizeMethod::FixedAbsolute { numerator } => (numerator / max_std, None),
        EffectSizeMethod::RelativeToMean { fraction } => {
            let max_mean = first_summary.mean.max(second_summary.mean);
            (fraction * max_mean / max_std, None)
        }
        EffectSizeMethod::HodgesLehmann(config) => {
            let shift = hodges_lehmann_shift(first, second, config)?;
            (shift.abs() / max_std, Some(shift))
        }
    };

    Ok(EffectAnalysis {
        effect_size: effect,
        first: first_summary,
        second: second_summary,
        shift,
    })
}
