#![warn(missing_docs)]
//! # Verdict
//!
//! Decides whether an object store's XML or JSON transport is faster, or
//! whether the benchmark simply has not collected enough samples to say.
//!
//! The pipeline:
//! - **Observation Table**: typed rows parsed from raw benchmark label maps,
//!   with short reads reclassified as range reads
//! - **Comparison Cells**: successful rows grouped by operation, object size,
//!   and checksum flags, split into XML and JSON throughput samples
//! - **Rank Test**: Mann-Whitney U with tie and continuity corrections, run
//!   two-sided and one-sided at a strict significance threshold
//! - **Effect & Power**: standardized effect size feeding a two-sample power
//!   model that solves for the per-group sample count the comparison needs
//! - **Decision**: a winner per cell, reported both with and without the
//!   sample-sufficiency gate
//!
//! ## Quick Start
//!
//! ```ignore
//! use verdict::prelude::*;
//!
//! let (table, skipped) = ObservationTable::from_points(points);
//! let cells = table.group(&GroupingSpec::default());
//! let outcomes = analyze_cells(&cells, &AnalysisSettings::default());
//! ```

// Re-export table types
pub use verdict_table::{
    ApiName, Cell, CellKey, GroupingSpec, LabelValue, Observation, ObservationTable, Operation,
    PointError, RawPoint, TableError, STATUS_OK,
};

// Re-export stats
pub use verdict_stats::{
    compute_summary, effect_size, hodges_lehmann_shift, mann_whitney,
    required_samples_per_group, two_sample_power, Alternative, EffectAnalysis, EffectError,
    EffectSizeMethod, HodgesConfig, HodgesError, PowerConfig, PowerError, RankError, RankTest,
    RankTestConfig, Summary, DEFAULT_ALPHA, FIXED_EFFECT_NUMERATOR, NONPARAMETRIC_CORRECTION,
    POWER_ALPHA, POWER_TARGET, RELATIVE_EFFECT_FRACTION,
};

// Re-export report types
pub use verdict_report::{
    generate_csv_report, generate_json_report, CellOutcome, CellStatus, DecisionRecord,
    FailureInfo, GatedWinner, OutputFormat, Report, ReportMeta, ReportSummary, Winner,
    SCHEMA_VERSION,
};

// Re-export the analysis engine and configuration
pub use verdict_cli::{
    analyze_cell, analyze_cells, format_human_output, load_points, run_with_cli, AnalysisConfig,
    AnalysisSettings, Cli, Commands, OutputConfig, VerdictConfig,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        analyze_cells, mann_whitney, required_samples_per_group, Alternative, AnalysisSettings,
        CellOutcome, EffectSizeMethod, GatedWinner, GroupingSpec, ObservationTable, RawPoint,
        Report, ReportMeta, Winner,
    };
}

/// Run the verdict CLI harness.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() {
///     if let Err(error) = verdict::run() {
///         eprintln!("Error: {:#}", error);
///         std::process::exit(1);
///     }
/// }
/// ```
pub use verdict_cli::run;
