//! Observation Table and Comparison Cells
//!
//! Groups successful observations into comparison cells keyed by
//! (operation, object size, checksum flags), with each cell split into the
//! XML and JSON throughput samples. Grouping criteria are explicit
//! configuration, so independent analysis passes can group differently
//! without sharing state.

use crate::observation::{ApiName, Observation, Operation, PointError, RawPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Grouping key of a comparison cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CellKey {
    /// Operation kind
    pub op: Operation,
    /// Full object size in bytes
    pub object_size: u64,
    /// CRC32C checksumming enabled
    pub crc32c_enabled: bool,
    /// MD5 checksumming enabled
    pub md5_enabled: bool,
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} size={} crc32c={} md5={}",
            self.op, self.object_size, self.crc32c_enabled as u8, self.md5_enabled as u8
        )
    }
}

impl CellKey {
    fn of(observation: &Observation) -> Self {
        Self {
            op: observation.op,
            object_size: observation.object_size,
            crc32c_enabled: observation.crc32c_enabled,
            md5_enabled: observation.md5_enabled,
        }
    }
}

/// Errors from cell-level operations
#[derive(Debug, Clone, Error)]
pub enum TableError {
    #[error("cell has no {0} observations")]
    EmptyGroup(ApiName),
}

/// Throughput samples of one comparison cell, split by transport
#[derive(Debug, Clone, Default)]
pub struct Cell {
    /// Samples (MiB/s) measured over the XML transport
    pub xml: Vec<f64>,
    /// Samples (MiB/s) measured over the JSON transport
    pub json: Vec<f64>,
}

impl Cell {
    /// Split into the (XML, JSON) sample pair.
    ///
    /// Fails when either side has no rows; a one-sided cell cannot be
    /// compared and must be reported rather than silently defaulted.
    pub fn samples(&self) -> Result<(&[f64], &[f64]), TableError> {
        if self.xml.is_empty() {
            return Err(TableError::EmptyGroup(ApiName::Xml));
        }
        if self.json.is_empty() {
            return Err(TableError::EmptyGroup(ApiName::Json));
        }
        Ok((&self.xml, &self.json))
    }

    /// Total row count across both sides
    pub fn len(&self) -> usize {
        self.xml.len() + self.json.len()
    }

    /// True when the cell holds no rows at all
    pub fn is_empty(&self) -> bool {
        self.xml.is_empty() && self.json.is_empty()
    }

    fn push(&mut self, api: ApiName, sample: f64) {
        match api {
            ApiName::Xml => self.xml.push(sample),
            ApiName::Json => self.json.push(sample),
        }
    }
}

/// Which observations participate in grouping
///
/// `None` fields accept every observed value, so the default spec groups the
/// whole table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupingSpec {
    /// Operations to include
    #[serde(default)]
    pub operations: Option<Vec<Operation>>,
    /// Object sizes (bytes) to include
    #[serde(default)]
    pub object_sizes: Option<Vec<u64>>,
    /// (crc32c, md5) flag combinations to include
    #[serde(default)]
    pub checksum_combinations: Option<Vec<(bool, bool)>>,
}

impl GroupingSpec {
    /// Accept every successful observation
    pub fn all() -> Self {
        Self::default()
    }

    fn accepts(&self, observation: &Observation) -> bool {
        if let Some(ops) = &self.operations {
            if !ops.contains(&observation.op) {
                return false;
            }
        }
        if let Some(sizes) = &self.object_sizes {
            if !sizes.contains(&observation.object_size) {
                return false;
            }
        }
        if let Some(combos) = &self.checksum_combinations {
            if !combos.contains(&(observation.crc32c_enabled, observation.md5_enabled)) {
                return false;
            }
        }
        true
    }
}

/// The normalized dataset: one row per measurement
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    observations: Vec<Observation>,
}

impl ObservationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw points, collecting per-point parse failures
    /// instead of aborting the batch.
    pub fn from_points<I>(points: I) -> (Self, Vec<PointError>)
    where
        I: IntoIterator<Item = RawPoint>,
    {
        let mut table = Self::new();
        let mut failures = Vec::new();
        for point in points {
            match Observation::from_point(&point) {
                Ok(observation) => table.push(observation),
                Err(error) => failures.push(error),
            }
        }
        (table, failures)
    }

    /// Append one observation
    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    /// All rows, in insertion order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Row count
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True when the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Partition successful observations into comparison cells.
    ///
    /// Rows whose status is not success are excluded, as are rows the spec
    /// filters out. Cells are the distinct keys observed after filtering;
    /// the returned map iterates them in deterministic key order.
    pub fn group(&self, spec: &GroupingSpec) -> BTreeMap<CellKey, Cell> {
        let mut cells: BTreeMap<CellKey, Cell> = BTreeMap::new();
        for observation in &self.observations {
            if !observation.is_success() || !spec.accepts(observation) {
                continue;
            }
            cells
                .entry(CellKey::of(observation))
                .or_default()
                .push(observation.api, observation.throughput_mib_s());
        }
        cells
    }
}
