//! Dataset loading
//!
//! Reads exported measurement points from disk. Two layouts are supported:
//! a JSON array of label maps, and the CSV dump written by the benchmark
//! harness where column headers become label names. Fields stay textual
//! here; interpretation happens when points are parsed into observations.

use anyhow::anyhow;
use std::path::Path;
use verdict_table::RawPoint;

/// Load raw measurement points from a `.json` or `.csv` dataset.
pub fn load_points(path: &Path) -> anyhow::Result<Vec<RawPoint>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read dataset {}: {}", path.display(), e))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&content),
        Some("csv") => parse_csv(&content),
        _ => Err(anyhow!(
            "Unsupported dataset extension for {} (expected .json or .csv)",
            path.display()
        )),
    }
}

fn parse_json(content: &str) -> anyhow::Result<Vec<RawPoint>> {
    serde_json::from_str(content).map_err(|e| anyhow!("Invalid JSON dataset: {}", e))
}

fn parse_csv(content: &str) -> anyhow::Result<Vec<RawPoint>> {
    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| anyhow!("CSV dataset has no header row"))?;
    let columns = split_row(header);

    let mut points = Vec::new();
    for (index, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_row(line);
        if fields.len() != columns.len() {
            tracing::warn!(
                "Skipping CSV row {}: {} fields, header has {}",
                index + 2,
                fields.len(),
                columns.len()
            );
            continue;
        }
        let mut point = RawPoint::new();
        for (name, value) in columns.iter().zip(fields) {
            point.set(name.clone(), value);
        }
        points.push(point);
    }
    Ok(points)
}

/// Split one CSV row; quoted fields may contain commas and doubled quotes.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
