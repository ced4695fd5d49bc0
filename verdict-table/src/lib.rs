//! Verdict Observation Table
//!
//! The data layer of the transport verdict pipeline: parses raw telemetry
//! points into observations, normalizes operation labels, and groups
//! successful rows into comparison cells ready for statistical analysis.
//!
//! The table itself performs no I/O and no statistics; it only owns the
//! row shape and the grouping rules.

#![warn(missing_docs)]

mod observation;
mod table;

pub use observation::{
    ApiName, LabelValue, Observation, Operation, PointError, RawPoint, STATUS_OK,
};
pub use table::{Cell, CellKey, GroupingSpec, ObservationTable, TableError};
