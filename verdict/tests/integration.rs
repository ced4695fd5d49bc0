//! Integration tests for the transport verdict pipeline
//!
//! These tests drive the full path from raw measurement points to finished
//! reports, the same way the CLI does it.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use verdict::{
    analyze_cells, format_human_output, generate_csv_report, generate_json_report,
    AnalysisSettings, EffectSizeMethod, GatedWinner, GroupingSpec, ObservationTable, RawPoint,
    Report, ReportMeta, Winner,
};

fn point(api: &str, op: &str, object_size: u64, transfer_size: u64, elapsed_us: u64) -> RawPoint {
    RawPoint::new()
        .with("api", api)
        .with("op", op)
        .with("object_size", object_size)
        .with("transfer_size", transfer_size)
        .with("elapsed_time_us", elapsed_us)
        .with("crc32c_enabled", "0")
        .with("md5_enabled", "0")
        .with("status_code", "OK")
}

/// 1 MiB full-object INSERT at each requested throughput (MiB/s)
fn throughput_points(api: &str, samples: &[f64]) -> Vec<RawPoint> {
    samples
        .iter()
        .map(|&mib_s| {
            let elapsed = (1e6 / mib_s.max(0.05)).round() as u64;
            point(api, "INSERT", 1_048_576, 1_048_576, elapsed.max(1))
        })
        .collect()
}

fn fixed_settings() -> AnalysisSettings {
    AnalysisSettings {
        effect: EffectSizeMethod::FixedAbsolute { numerator: 5.0 },
        ..AnalysisSettings::default()
    }
}

/// Test the full path from raw points to a power-checked decision
#[test]
fn test_power_gate_end_to_end() {
    let mut rng = StdRng::seed_from_u64(0);
    let normal = Normal::new(5.0, 2.5).unwrap();
    let xml: Vec<f64> = (0..1000).map(|_| normal.sample(&mut rng)).collect();
    let json: Vec<f64> = (0..1000).map(|_| normal.sample(&mut rng)).collect();

    let mut points = throughput_points("XML", &xml);
    points.extend(throughput_points("JSON", &json));

    let (table, skipped) = ObservationTable::from_points(points);
    assert!(skipped.is_empty());
    assert_eq!(table.len(), 2000);

    let cells = table.group(&GroupingSpec::default());
    assert_eq!(cells.len(), 1);

    let outcomes = analyze_cells(&cells, &fixed_settings());
    assert_eq!(outcomes.len(), 1);
    let decision = outcomes[0].decision.as_ref().unwrap();

    assert_eq!(decision.sample_count, 2000);
    assert_eq!(decision.xml_count, 1000);
    assert_eq!(decision.json_count, 1000);
    // A 5 MiB/s absolute effect over ~2.5 MiB/s spread needs on the order of
    // ten samples per side, far below the thousand collected.
    assert!(decision.needed_samples >= 5 && decision.needed_samples <= 25);
    assert!(decision.enough_samples);
    assert!(matches!(decision.gated_winner, GatedWinner::Settled(_)));
}

/// Test that a clear throughput gap names XML the winner
#[test]
fn test_separated_transports_name_xml_winner() {
    let xml: Vec<f64> = (0..200).map(|i| 100.0 + i as f64 * 0.01).collect();
    let json: Vec<f64> = (0..200).map(|i| 5.0 + i as f64 * 0.01).collect();

    let mut points = throughput_points("XML", &xml);
    points.extend(throughput_points("JSON", &json));

    let (table, _) = ObservationTable::from_points(points);
    let cells = table.group(&GroupingSpec::default());
    let outcomes = analyze_cells(&cells, &fixed_settings());
    let decision = outcomes[0].decision.as_ref().unwrap();

    assert!(decision.significant);
    assert!(decision.json_less);
    assert_eq!(decision.winner, Winner::Xml);
    assert_eq!(decision.gated_winner, GatedWinner::Settled(Winner::Xml));
    assert!(decision.rank_biserial > 0.99);
}

/// Test that the faster JSON transport is credited symmetrically
#[test]
fn test_separated_transports_name_json_winner() {
    let xml: Vec<f64> = (0..200).map(|i| 5.0 + i as f64 * 0.01).collect();
    let json: Vec<f64> = (0..200).map(|i| 100.0 + i as f64 * 0.01).collect();

    let mut points = throughput_points("XML", &xml);
    points.extend(throughput_points("JSON", &json));

    let (table, _) = ObservationTable::from_points(points);
    let cells = table.group(&GroupingSpec::default());
    let outcomes = analyze_cells(&cells, &fixed_settings());
    let decision = outcomes[0].decision.as_ref().unwrap();

    assert!(decision.significant);
    assert!(!decision.json_less);
    assert_eq!(decision.winner, Winner::Json);
    assert_eq!(decision.gated_winner, GatedWinner::Settled(Winner::Json));
    assert!(decision.rank_biserial < -0.99);
}

/// Test that a one-sided cell fails loudly instead of defaulting
#[test]
fn test_one_sided_cell_reports_failure() {
    let points = throughput_points("XML", &[10.0, 11.0, 12.0, 13.0, 14.0]);

    let (table, _) = ObservationTable::from_points(points);
    let cells = table.group(&GroupingSpec::default());
    let outcomes = analyze_cells(&cells, &fixed_settings());

    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].is_decided());
    let failure = outcomes[0].failure.as_ref().unwrap();
    assert_eq!(failure.kind, "empty_group");

    let report = Report::new(ReportMeta::now(0.001, "fixed-absolute", None), outcomes);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.decided, 0);
}

/// Test that short reads group as range reads while full reads stay put
#[test]
fn test_partial_reads_group_as_range() {
    let mut points = Vec::new();
    for i in 0..20u64 {
        points.push(point("XML", "READ[1]", 1024, 512, 500 + i));
        points.push(point("JSON", "READ[1]", 1024, 512, 530 + i));
        points.push(point("XML", "READ[1]", 1024, 1024, 700 + i));
        points.push(point("JSON", "READ[1]", 1024, 1024, 730 + i));
    }

    let (table, skipped) = ObservationTable::from_points(points);
    assert!(skipped.is_empty());

    let cells = table.group(&GroupingSpec::default());
    assert_eq!(cells.len(), 2);
    let ops: Vec<String> = cells.keys().map(|k| k.op.to_string()).collect();
    assert!(ops.contains(&"RANGE[1]".to_string()));
    assert!(ops.contains(&"READ[1]".to_string()));
}

/// Test that malformed points are skipped without sinking the batch
#[test]
fn test_malformed_points_are_skipped() {
    let mut points = throughput_points("XML", &[10.0, 11.0, 12.0]);
    points.extend(throughput_points("JSON", &[10.5, 11.5, 12.5]));
    points.push(RawPoint::new().with("api", "XML"));

    let (table, skipped) = ObservationTable::from_points(points);
    assert_eq!(table.len(), 6);
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].to_string().contains("missing label"));
}

/// Test that every output format renders the same report
#[test]
fn test_report_formats() {
    let mut points = throughput_points("XML", &[40.0, 41.0, 42.0, 43.0, 44.0]);
    points.extend(throughput_points("JSON", &[40.5, 41.5, 42.5, 43.5, 44.5]));
    // A second, one-sided cell that will fail
    points.push(point("XML", "WRITE", 1024, 1024, 900));

    let (table, _) = ObservationTable::from_points(points);
    let cells = table.group(&GroupingSpec::default());
    let outcomes = analyze_cells(&cells, &fixed_settings());
    let report = Report::new(
        ReportMeta::now(0.001, "fixed-absolute", Some("points.json".to_string())),
        outcomes,
    );
    assert_eq!(report.summary.total_cells, 2);
    assert_eq!(report.summary.failed, 1);

    let json = generate_json_report(&report).unwrap();
    let parsed: Report = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.cells.len(), 2);
    assert_eq!(parsed.summary.failed, 1);
    assert_eq!(parsed.meta.input.as_deref(), Some("points.json"));

    let csv = generate_csv_report(&report);
    assert_eq!(csv.lines().count(), 3);

    let human = format_human_output(&report);
    assert!(human.contains("Transport Verdict"));
    assert!(human.contains("Summary"));
    assert!(human.contains("error:"));
}
