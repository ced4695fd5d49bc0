#![warn(missing_docs)]
//! Verdict Report - Decision Records and Output
//!
//! Owns the shape of the analysis output:
//! - Decision records and winner labels, with and without the
//!   sample-sufficiency gate
//! - Report assembly with metadata and summary tallies
//! - JSON (machine-readable) and CSV (spreadsheet-compatible) rendering
//!
//! Human-readable terminal output lives in the CLI crate, next to the code
//! that decides where it goes.

mod csv;
mod json;
mod record;

pub use csv::generate_csv_report;
pub use json::generate_json_report;
pub use record::{
    CellOutcome, CellStatus, DecisionRecord, FailureInfo, GatedWinner, Report, ReportMeta,
    ReportSummary, SCHEMA_VERSION, Winner,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("human".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
