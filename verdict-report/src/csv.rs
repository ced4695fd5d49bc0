//! CSV Output
//!
//! One row per comparison cell. Failed cells keep their key and status and
//! carry the failure message in the last column, with the metric columns
//! left empty.

use crate::record::{CellOutcome, Report};

const HEADER: &str = "op,object_size,crc32c_enabled,md5_enabled,status,sample_count,\
xml_count,json_count,needed_samples,enough_samples,effect_size,xml_mean,xml_std_dev,\
json_mean,json_std_dev,p_value,significant,p_value_less,json_less,rank_biserial,\
winner,gated_winner,failure";

/// Number of per-decision columns between `status` and `failure`
const DECISION_COLUMNS: usize = 17;

/// Generate a CSV report, one row per cell.
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = String::new();
    output.push_str(HEADER);
    output.push('\n');
    for cell in &report.cells {
        output.push_str(&format_cell(cell));
        output.push('\n');
    }
    output
}

fn format_cell(cell: &CellOutcome) -> String {
    let mut fields = vec![
        escape_field(&cell.key.op.to_string()),
        cell.key.object_size.to_string(),
        (cell.key.crc32c_enabled as u8).to_string(),
        (cell.key.md5_enabled as u8).to_string(),
        cell.status.to_string(),
    ];

    match &cell.decision {
        Some(decision) => {
            fields.push(decision.sample_count.to_string());
            fields.push(decision.xml_count.to_string());
            fields.push(decision.json_count.to_string());
            fields.push(decision.needed_samples.to_string());
            fields.push(decision.enough_samples.to_string());
            fields.push(format!("{:.6}", decision.effect_size));
            fields.push(format!("{:.6}", decision.xml_mean));
            fields.push(format!("{:.6}", decision.xml_std_dev));
            fields.push(format!("{:.6}", decision.json_mean));
            fields.push(format!("{:.6}", decision.json_std_dev));
            fields.push(format!("{:.4e}", decision.p_value));
            fields.push(decision.significant.to_string());
            fields.push(format!("{:.4e}", decision.p_value_less));
            fields.push(decision.json_less.to_string());
            fields.push(format!("{:.6}", decision.rank_biserial));
            fields.push(escape_field(&decision.winner.to_string()));
            fields.push(escape_field(&decision.gated_winner.to_string()));
            fields.push(String::new());
        }
        None => {
            fields.extend(vec![String::new(); DECISION_COLUMNS]);
            let message = cell
                .failure
                .as_ref()
                .map(|failure| failure.message.as_str())
                .unwrap_or("");
            fields.push(escape_field(message));
        }
    }

    fields.join(",")
}

/// Escape a CSV field (handles commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
