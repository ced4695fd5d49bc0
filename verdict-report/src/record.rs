//! Decision Records and Report Assembly

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use verdict_table::CellKey;

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Winner label of one comparison cell, before the sufficiency gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    /// No significant difference between the transports
    Identical,
    /// The XML transport was significantly faster
    Xml,
    /// The JSON transport was significantly faster
    Json,
}

impl Winner {
    /// Resolve the power-blind winner from the two test outcomes.
    ///
    /// `json_less` is the one-sided decision that JSON throughput is
    /// stochastically below XML throughput; it only matters once the
    /// two-sided test has found a difference at all.
    pub fn resolve(significant: bool, json_less: bool) -> Self {
        if !significant {
            Self::Identical
        } else if json_less {
            Self::Xml
        } else {
            Self::Json
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identical => write!(f, "Identical"),
            Self::Xml => write!(f, "Xml"),
            Self::Json => write!(f, "Json"),
        }
    }
}

impl std::str::FromStr for Winner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identical" => Ok(Self::Identical),
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown winner label: {}", other)),
        }
    }
}

/// Winner label after the sufficiency gate
///
/// Premature winner declarations are the failure mode this pipeline exists
/// to prevent, so every record carries both the gated and ungated label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GatedWinner {
    /// Enough samples were collected; the ungated winner stands
    Settled(Winner),
    /// Too few samples to trust a winner either way
    NeedMoreSamples,
}

impl GatedWinner {
    /// Apply the sufficiency gate to a resolved winner.
    pub fn resolve(winner: Winner, enough_samples: bool) -> Self {
        if enough_samples {
            Self::Settled(winner)
        } else {
            Self::NeedMoreSamples
        }
    }
}

impl fmt::Display for GatedWinner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settled(winner) => winner.fmt(f),
            Self::NeedMoreSamples => write!(f, "Need more samples"),
        }
    }
}

impl std::str::FromStr for GatedWinner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().to_lowercase() == "need more samples" {
            return Ok(Self::NeedMoreSamples);
        }
        s.parse().map(Self::Settled)
    }
}

impl From<GatedWinner> for String {
    fn from(winner: GatedWinner) -> Self {
        winner.to_string()
    }
}

impl TryFrom<String> for GatedWinner {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One comparison cell's decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Total rows in the cell
    pub sample_count: usize,
    /// Rows measured over the XML transport
    pub xml_count: usize,
    /// Rows measured over the JSON transport
    pub json_count: usize,
    /// Per-group sample count the power model asks for
    pub needed_samples: u64,
    /// Whether both sides meet the per-group requirement
    pub enough_samples: bool,
    /// Standardized effect size the requirement was solved for
    pub effect_size: f64,
    /// XML mean throughput (MiB/s)
    pub xml_mean: f64,
    /// XML throughput standard deviation
    pub xml_std_dev: f64,
    /// JSON mean throughput (MiB/s)
    pub json_mean: f64,
    /// JSON throughput standard deviation
    pub json_std_dev: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Two-sided decision at the configured alpha
    pub significant: bool,
    /// One-sided (JSON below XML) p-value
    pub p_value_less: f64,
    /// One-sided decision
    pub json_less: bool,
    /// Rank-biserial correlation derived from the U statistic
    pub rank_biserial: f64,
    /// Winner ignoring the sufficiency gate
    pub winner: Winner,
    /// Winner after the sufficiency gate
    pub gated_winner: GatedWinner,
}

/// Why a cell produced no decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Stable failure category (e.g. `empty_group`)
    pub kind: String,
    /// Human-readable description
    pub message: String,
}

impl FailureInfo {
    /// Create a failure entry
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Cell processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    /// A decision record was produced
    Decided,
    /// The cell failed and carries failure information instead
    Failed,
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decided => write!(f, "decided"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Per-cell entry in the report: a decision or a recorded failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellOutcome {
    /// Cell identity
    pub key: CellKey,
    /// Whether the cell decided or failed
    pub status: CellStatus,
    /// The decision, when one was produced
    pub decision: Option<DecisionRecord>,
    /// The failure, when the cell could not be decided
    pub failure: Option<FailureInfo>,
}

impl CellOutcome {
    /// Record a decided cell
    pub fn decided(key: CellKey, decision: DecisionRecord) -> Self {
        Self {
            key,
            status: CellStatus::Decided,
            decision: Some(decision),
            failure: None,
        }
    }

    /// Record a failed cell
    pub fn failed(key: CellKey, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key,
            status: CellStatus::Failed,
            decision: None,
            failure: Some(FailureInfo::new(kind, message)),
        }
    }

    /// True when the cell produced a decision
    pub fn is_decided(&self) -> bool {
        self.status == CellStatus::Decided
    }
}

/// Complete analysis report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub cells: Vec<CellOutcome>,
    pub summary: ReportSummary,
}

impl Report {
    /// Assemble a report and tally its summary
    pub fn new(meta: ReportMeta, cells: Vec<CellOutcome>) -> Self {
        let summary = ReportSummary::tally(&cells);
        Self {
            meta,
            cells,
            summary,
        }
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub alpha: f64,
    pub effect_method: String,
    pub input: Option<String>,
}

impl ReportMeta {
    /// Metadata stamped at generation time
    pub fn now(alpha: f64, effect_method: impl Into<String>, input: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            alpha,
            effect_method: effect_method.into(),
            input,
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_cells: usize,
    pub decided: usize,
    pub failed: usize,
    pub xml_wins: usize,
    pub json_wins: usize,
    pub identical: usize,
    pub need_more_samples: usize,
}

impl ReportSummary {
    /// Tally outcome counts; winner counts follow the gated label.
    pub fn tally(cells: &[CellOutcome]) -> Self {
        let mut summary = Self {
            total_cells: cells.len(),
            ..Default::default()
        };
        for cell in cells {
            match &cell.decision {
                Some(decision) => {
                    summary.decided += 1;
                    match decision.gated_winner {
                        GatedWinner::NeedMoreSamples => summary.need_more_samples += 1,
                        GatedWinner::Settled(Winner::Xml) => summary.xml_wins += 1,
                        GatedWinner::Settled(Winner::Json) => summary.json_wins += 1,
                        GatedWinner::Settled(Winner::Identical) => summary.identical += 1,
                    }
                }
                None => summary.failed += 1,
            }
        }
        summary
    }
}
