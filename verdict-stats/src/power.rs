//! Sample-Size Planning
//!
//! Power model for the comparison pipeline. The two-sided two-sample t-test
//! serves as the tractable stand-in for the rank test: solve the per-group
//! sample count that reaches the target power at the planning significance
//! level, then inflate the solution to cover the rank test's efficiency loss
//! and round up.

use crate::normal::{noncentral_t_cdf, noncentral_t_sf, t_quantile};
use crate::{NONPARAMETRIC_CORRECTION, POWER_ALPHA, POWER_TARGET};
use thiserror::Error;

/// Ceiling on the bracketing search; effects small enough to need more than
/// this many samples per group are reported as unresolvable.
const MAX_PER_GROUP: f64 = 1e12;

/// Power solver configuration
#[derive(Debug, Clone)]
pub struct PowerConfig {
    /// Significance level of the planned test
    pub alpha: f64,
    /// Target detection probability
    pub power: f64,
    /// Multiplier applied to the parametric solution before rounding up
    pub correction: f64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            alpha: POWER_ALPHA,
            power: POWER_TARGET,
            correction: NONPARAMETRIC_CORRECTION,
        }
    }
}

/// Errors from sample-size planning
#[derive(Debug, Clone, Error)]
pub enum PowerError {
    #[error("effect size must be positive and finite, got {0}")]
    InvalidEffect(f64),
    #[error("significance level must be between 0 and 1, got {0}")]
    InvalidAlpha(f64),
    #[error("target power must be between 0 and 1, got {0}")]
    InvalidPower(f64),
    #[error("no per-group sample count below {0:e} reaches the target power")]
    Unresolvable(f64),
}

/// Power of the two-sided two-sample t-test at a standardized effect size
/// and a (possibly fractional) per-group sample count.
///
/// Uses `2n - 2` degrees of freedom and noncentrality `d * sqrt(n / 2)`;
/// both tails of the noncentral distribution beyond the critical value
/// contribute.
pub fn two_sample_power(effect_size: f64, per_group: f64, alpha: f64) -> f64 {
    let df = 2.0 * per_group - 2.0;
    let nc = effect_size * (per_group / 2.0).sqrt();
    let crit = t_quantile(1.0 - alpha / 2.0, df);
    noncentral_t_sf(crit, df, nc) + noncentral_t_cdf(-crit, df, nc)
}

/// Solve the smallest per-group sample count that reaches the configured
/// power, inflate it by `config.correction`, and round up.
///
/// The power function is monotone in the sample count, so the solution is
/// bracketed by doubling and then narrowed by bisection. Rounding up keeps
/// the sufficiency gate conservative.
pub fn required_samples_per_group(
    effect_size: f64,
    config: &PowerConfig,
) -> Result<u64, PowerError> {
    if !effect_size.is_finite() || effect_size <= 0.0 {
        return Err(PowerError::InvalidEffect(effect_size));
    }
    if config.alpha <= 0.0 || config.alpha >= 1.0 {
        return Err(PowerError::InvalidAlpha(config.alpha));
    }
    if config.power <= 0.0 || config.power >= 1.0 {
        return Err(PowerError::InvalidPower(config.power));
    }

    let mut lo = 2.0;
    let mut hi = 4.0;
    while two_sample_power(effect_size, hi, config.alpha) < config.power {
        hi *= 2.0;
        if hi > MAX_PER_GROUP {
            return Err(PowerError::Unresolvable(MAX_PER_GROUP));
        }
    }

    let solved = if two_sample_power(effect_size, lo, config.alpha) >= config.power {
        lo
    } else {
        for _ in 0..200 {
            let mid = 0.5 * (lo + hi);
            if mid <= lo || mid >= hi {
                break;
            }
            if two_sample_power(effect_size, mid, config.alpha) < config.power {
                lo = mid;
            } else {
                hi = mid;
            }
            if hi - lo < 1e-9 * hi {
                break;
            }
        }
        hi
    };

    Ok((solved * config.correction).ceil() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_effect() {
        // Effect 2.0 at alpha 0.01 / power 0.90 solves to about 9.3 per
        // group; times 1.05 and rounded up that is 10.
        let needed = required_samples_per_group(2.0, &PowerConfig::default()).unwrap();
        assert_eq!(needed, 10);
    }

    #[test]
    fn test_moderate_effect_range() {
        // Effect 1.0 solves to the low thirties per group
        let needed = required_samples_per_group(1.0, &PowerConfig::default()).unwrap();
        assert!((31..=36).contains(&needed), "needed = {}", needed);
    }

    #[test]
    fn test_required_monotone_in_effect() {
        let config = PowerConfig::default();
        let strong = required_samples_per_group(2.0, &config).unwrap();
        let medium = required_samples_per_group(1.0, &config).unwrap();
        let weak = required_samples_per_group(0.5, &config).unwrap();
        assert!(strong < medium);
        assert!(medium < weak);
    }

    #[test]
    fn test_power_monotone_in_samples() {
        let small = two_sample_power(0.8, 10.0, 0.01);
        let large = two_sample_power(0.8, 40.0, 0.01);
        assert!(large > small);
        assert!(small >= 0.0 && large <= 1.0);
    }

    #[test]
    fn test_power_monotone_in_effect() {
        let weak = two_sample_power(1.0, 10.0, 0.01);
        let strong = two_sample_power(2.0, 10.0, 0.01);
        assert!(strong > weak);
    }

    #[test]
    fn test_huge_effect_floors_at_minimum_group() {
        // Two per group already reaches the target, so only the correction
        // and ceiling remain.
        let needed = required_samples_per_group(100.0, &PowerConfig::default()).unwrap();
        assert_eq!(needed, 3);
    }

    #[test]
    fn test_vanishing_effect_is_unresolvable() {
        assert!(matches!(
            required_samples_per_group(1e-7, &PowerConfig::default()),
            Err(PowerError::Unresolvable(_))
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        let config = PowerConfig::default();
        assert!(matches!(
            required_samples_per_group(0.0, &config),
            Err(PowerError::InvalidEffect(_))
        ));
        assert!(matches!(
            required_samples_per_group(f64::NAN, &config),
            Err(PowerError::InvalidEffect(_))
        ));

        let bad_alpha = PowerConfig {
            alpha: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            required_samples_per_group(1.0, &bad_alpha),
            Err(PowerError::InvalidAlpha(_))
        ));

        let bad_power = PowerConfig {
            power: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            required_samples_per_group(1.0, &bad_power),
            Err(PowerError::InvalidPower(_))
        ));
    }
}
