//! Output formatting
//!
//! Human-readable output formatting for verdict reports.
//!
//! Generates terminal-friendly output with:
//! - Cells grouped by operation with status icons (✓/✗)
//! - Per-transport throughput summaries
//! - Test statistics, effect size, and the sample sufficiency gate
//! - Winner labels both with and without the gate applied

use verdict_report::{CellOutcome, CellStatus, Report};
use verdict_table::Operation;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Transport Verdict\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    // Group cells by operation
    let mut groups: std::collections::BTreeMap<Operation, Vec<&CellOutcome>> =
        std::collections::BTreeMap::new();
    for cell in &report.cells {
        groups.entry(cell.key.op).or_default().push(cell);
    }

    for (op, cells) in groups {
        output.push_str(&format!("Operation: {}\n", op));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for cell in cells {
            let status_icon = match cell.status {
                CellStatus::Decided => "✓",
                CellStatus::Failed => "✗",
            };

            output.push_str(&format!(
                "  {} size={} crc32c={} md5={}\n",
                status_icon,
                cell.key.object_size,
                cell.key.crc32c_enabled as u8,
                cell.key.md5_enabled as u8
            ));

            if let Some(decision) = &cell.decision {
                output.push_str(&format!(
                    "      xml:  mean {:.2} MiB/s  stddev {:.2}  n={}\n",
                    decision.xml_mean, decision.xml_std_dev, decision.xml_count
                ));
                output.push_str(&format!(
                    "      json: mean {:.2} MiB/s  stddev {:.2}  n={}\n",
                    decision.json_mean, decision.json_std_dev, decision.json_count
                ));
                output.push_str(&format!(
                    "      p: {:.4e}  p_less: {:.4e}  rank-biserial: {:+.3}\n",
                    decision.p_value, decision.p_value_less, decision.rank_biserial
                ));
                output.push_str(&format!(
                    "      effect: {:.3}  needed/side: {}  have: {}/{}\n",
                    decision.effect_size,
                    decision.needed_samples,
                    decision.xml_count,
                    decision.json_count
                ));
                output.push_str(&format!(
                    "      winner: {}  (gated: {})\n",
                    decision.winner, decision.gated_winner
                ));
            }

            if let Some(failure) = &cell.failure {
                output.push_str(&format!("      error: {}\n", failure.message));
            }

            output.push('\n');
        }
    }

    // Summary
    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Cells: {}  Decided: {}  Failed: {}\n",
        report.summary.total_cells, report.summary.decided, report.summary.failed
    ));
    output.push_str(&format!(
        "  XML wins: {}  JSON wins: {}  Identical: {}  Need more samples: {}\n",
        report.summary.xml_wins,
        report.summary.json_wins,
        report.summary.identical,
        report.summary.need_more_samples
    ));
    output.push_str(&format!(
        "  alpha: {}  effect method: {}\n",
        report.meta.alpha, report.meta.effect_method
    ));

    output
}
