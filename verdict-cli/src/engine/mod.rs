//! Analysis engine
//!
//! Turns grouped comparison cells into a report.
//!
//! ```text
//! BTreeMap<CellKey, Cell>
//!       │
//!       ▼
//! ┌─────────────┐
//! │   analyze   │  Rank tests, effect size, power gate (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```

mod analyze;
mod formatting;

pub use analyze::{analyze_cell, analyze_cells, AnalysisSettings};
pub use formatting::format_human_output;
