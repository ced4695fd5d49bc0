//! Observations and Raw Points
//!
//! One `Observation` per measured storage operation, parsed from the label
//! set the telemetry exporter attaches to each point. Parsing normalizes the
//! operation label: a read that did not fetch the full object is recorded as
//! a range read.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Status label value marking a successful operation
pub const STATUS_OK: &str = "OK";

/// Which API transport served the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiName {
    /// The XML-based interface (baseline)
    Xml,
    /// The JSON-based interface (candidate)
    Json,
}

impl fmt::Display for ApiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml => write!(f, "XML"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

impl std::str::FromStr for ApiName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown api: {}", other)),
        }
    }
}

/// The measured storage operation
///
/// Read and range operations carry the index of the read within the
/// benchmark cycle (the same object is fetched up to three times).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Operation {
    /// Streaming upload of a new object
    Write,
    /// Single-shot upload of a new object
    Insert,
    /// Full-object download
    Read(u8),
    /// Partial-object download
    Range(u8),
}

impl Operation {
    /// READ becomes RANGE with the same index; everything else is unchanged.
    fn reclassified(self) -> Self {
        match self {
            Self::Read(k) => Self::Range(k),
            other => other,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write => write!(f, "WRITE"),
            Self::Insert => write!(f, "INSERT"),
            Self::Read(k) => write!(f, "READ[{}]", k),
            Self::Range(k) => write!(f, "RANGE[{}]", k),
        }
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "WRITE" => return Ok(Self::Write),
            "INSERT" => return Ok(Self::Insert),
            _ => {}
        }
        let (range, rest) = if let Some(rest) = upper.strip_prefix("READ[") {
            (false, rest)
        } else if let Some(rest) = upper.strip_prefix("RANGE[") {
            (true, rest)
        } else {
            return Err(format!("Unknown operation: {}", s));
        };
        let index = rest
            .strip_suffix(']')
            .and_then(|digits| digits.parse::<u8>().ok())
            .filter(|&k| k <= 2)
            .ok_or_else(|| format!("Unknown operation: {}", s))?;
        Ok(if range {
            Self::Range(index)
        } else {
            Self::Read(index)
        })
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.to_string()
    }
}

impl TryFrom<String> for Operation {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One telemetry label value, textual or numeric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelValue {
    /// Textual label
    Text(String),
    /// Numeric label
    Number(f64),
}

impl LabelValue {
    fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Text(s) => s.trim().parse().ok(),
            Self::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as u64),
            Self::Number(_) => None,
        }
    }

    // Checksum flags use the "0"/"1" encoding on the wire.
    fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Text(s) => match s.trim() {
                "0" => Some(false),
                "1" => Some(true),
                _ => None,
            },
            Self::Number(n) if *n == 0.0 => Some(false),
            Self::Number(n) if *n == 1.0 => Some(true),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for LabelValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for LabelValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u64> for LabelValue {
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<f64> for LabelValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One raw measurement point: the label set attached to a telemetry sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPoint(BTreeMap<String, LabelValue>);

impl RawPoint {
    /// Create a point with no labels
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style label insertion
    pub fn with(mut self, name: impl Into<String>, value: impl Into<LabelValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert a label, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<LabelValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a label by name
    pub fn get(&self, name: &str) -> Option<&LabelValue> {
        self.0.get(name)
    }
}

/// Errors from parsing a raw point
#[derive(Debug, Clone, Error)]
pub enum PointError {
    #[error("missing label '{0}'")]
    MissingLabel(&'static str),
    #[error("label '{name}' has unusable value '{value}'")]
    InvalidLabel {
        name: &'static str,
        value: String,
    },
}

fn text_label<'a>(point: &'a RawPoint, name: &'static str) -> Result<&'a str, PointError> {
    let value = point.get(name).ok_or(PointError::MissingLabel(name))?;
    value.as_text().ok_or_else(|| PointError::InvalidLabel {
        name,
        value: value.to_string(),
    })
}

fn u64_label(point: &RawPoint, name: &'static str) -> Result<u64, PointError> {
    let value = point.get(name).ok_or(PointError::MissingLabel(name))?;
    value.as_u64().ok_or_else(|| PointError::InvalidLabel {
        name,
        value: value.to_string(),
    })
}

fn positive_label(point: &RawPoint, name: &'static str) -> Result<u64, PointError> {
    match u64_label(point, name)? {
        0 => Err(PointError::InvalidLabel {
            name,
            value: "0".to_string(),
        }),
        value => Ok(value),
    }
}

fn flag_label(point: &RawPoint, name: &'static str) -> Result<bool, PointError> {
    let value = point.get(name).ok_or(PointError::MissingLabel(name))?;
    value.as_flag().ok_or_else(|| PointError::InvalidLabel {
        name,
        value: value.to_string(),
    })
}

/// One measured operation instance
///
/// Immutable once parsed; the READ-to-RANGE normalization happens during
/// parsing, so a stored `op` already reflects how much of the object was
/// actually transferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Transport that served the operation
    pub api: ApiName,
    /// Operation kind, after reclassification
    pub op: Operation,
    /// Full object size in bytes
    pub object_size: u64,
    /// Bytes actually transferred; less than `object_size` for range reads
    pub transfer_size: u64,
    /// Wall-clock duration of the operation in microseconds
    pub elapsed_us: u64,
    /// Whether CRC32C checksumming was enabled
    pub crc32c_enabled: bool,
    /// Whether MD5 checksumming was enabled
    pub md5_enabled: bool,
    /// Status label of the operation; only [`STATUS_OK`] rows are compared
    pub status: String,
}

impl Observation {
    /// Parse one raw point into an observation.
    ///
    /// Requires the labels `api`, `op`, `object_size`, `transfer_size`,
    /// `elapsed_time_us`, `crc32c_enabled`, `md5_enabled`, and
    /// `status_code`. Sizes and durations must be non-negative integers;
    /// `object_size` and `elapsed_time_us` must be positive.
    pub fn from_point(point: &RawPoint) -> Result<Self, PointError> {
        let api = text_label(point, "api")?;
        let api: ApiName = api.parse().map_err(|_| PointError::InvalidLabel {
            name: "api",
            value: api.to_string(),
        })?;

        let op = text_label(point, "op")?;
        let op: Operation = op.parse().map_err(|_| PointError::InvalidLabel {
            name: "op",
            value: op.to_string(),
        })?;

        let observation = Self {
            api,
            op,
            object_size: positive_label(point, "object_size")?,
            transfer_size: u64_label(point, "transfer_size")?,
            elapsed_us: positive_label(point, "elapsed_time_us")?,
            crc32c_enabled: flag_label(point, "crc32c_enabled")?,
            md5_enabled: flag_label(point, "md5_enabled")?,
            status: text_label(point, "status_code")?.to_string(),
        };
        Ok(observation.reclassify())
    }

    /// A read that transferred less than the object is a range read.
    fn reclassify(mut self) -> Self {
        if self.transfer_size < self.object_size {
            self.op = self.op.reclassified();
        }
        self
    }

    /// True when the operation completed successfully
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Throughput in MiB/s
    pub fn throughput_mib_s(&self) -> f64 {
        self.transfer_size as f64 / self.elapsed_us as f64 * 1e6 / (1024.0 * 1024.0)
    }

    /// Throughput in KiB/s
    pub fn throughput_kib_s(&self) -> f64 {
        self.transfer_size as f64 / self.elapsed_us as f64 * 1e6 / 1024.0
    }
}
