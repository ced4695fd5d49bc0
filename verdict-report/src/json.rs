//! JSON Output

use crate::record::Report;

/// Generate a prettified JSON report.
///
/// Serializes the full report, summary and failed cells included, into
/// machine-readable JSON.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
