//! Verdict Statistical Engine
//!
//! Nonparametric comparison machinery for the transport verdict pipeline:
//!
//! - Mann-Whitney U rank test with tie and continuity corrections
//! - Standardized effect sizes (fixed absolute, relative-to-mean,
//!   Hodges-Lehmann)
//! - Hodges-Lehmann shift estimation over fixed-precision bins
//! - Two-sample t-test power model and per-group sample-size solving
//!
//! Everything here is deterministic: the only randomness is the seeded
//! subsampling inside the shift estimator.

#![warn(missing_docs)]

mod effect;
mod hodges;
mod normal;
mod power;
mod rank;
mod summary;

pub use effect::{EffectAnalysis, EffectError, EffectSizeMethod, effect_size};
pub use hodges::{HodgesConfig, HodgesError, hodges_lehmann_shift};
pub use power::{PowerConfig, PowerError, required_samples_per_group, two_sample_power};
pub use rank::{Alternative, RankError, RankTest, RankTestConfig, mann_whitney};
pub use summary::{Summary, compute_summary};

/// Significance threshold for distribution comparisons
pub const DEFAULT_ALPHA: f64 = 0.001;

/// Significance level used when solving for the required sample count
pub const POWER_ALPHA: f64 = 0.01;

/// Target detection probability for the sample-size solve
pub const POWER_TARGET: f64 = 0.90;

/// Inflation applied to the parametric sample-size solution to cover the
/// rank test's efficiency loss relative to the t-test
pub const NONPARAMETRIC_CORRECTION: f64 = 1.05;

/// Numerator of the fixed absolute effect size, in MiB/s
pub const FIXED_EFFECT_NUMERATOR: f64 = 5.0;

/// Relative effect size as a fraction of the larger group mean
pub const RELATIVE_EFFECT_FRACTION: f64 = 0.01;
