#![warn(missing_docs)]
//! Verdict CLI Library
//!
//! Command-line pipeline that turns raw storage benchmark exports into
//! transport verdicts. Loads a dataset of measurement points, groups them
//! into comparison cells, and reports which transport (XML or JSON) wins
//! each cell, if either does.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     if let Err(error) = verdict_cli::run() {
//!         eprintln!("Error: {:#}", error);
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod config;
mod engine;
mod input;

pub use config::*;
pub use engine::{analyze_cell, analyze_cells, format_human_output, AnalysisSettings};
pub use input::load_points;

use clap::{Parser, Subcommand};
use rayon::ThreadPoolBuilder;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use verdict_report::{
    generate_csv_report, generate_json_report, OutputFormat, Report, ReportMeta,
};
use verdict_stats::{EffectSizeMethod, PowerConfig};
use verdict_table::{Cell, CellKey, ObservationTable, Operation};

/// Verdict CLI arguments
#[derive(Parser, Debug)]
#[command(name = "verdict")]
#[command(author, version, about = "Verdict - XML vs JSON storage transport comparison")]
pub struct Cli {
    /// Optional subcommand (Run, Cells); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Dataset of raw measurement points (.json or .csv)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (discovered by walking up from the current directory when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only analyze cells whose operation name contains this substring
    #[arg(long)]
    pub filter: Option<String>,

    /// Effect size method: fixed, relative, hl
    #[arg(long)]
    pub effect: Option<String>,

    /// Significance threshold for the rank tests
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Number of threads for per-cell analysis
    /// 0 = use all available cores (default)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the analysis (default)
    Run,
    /// List comparison cells without analyzing them
    Cells,
}

/// Run the verdict CLI with arguments from the environment.
/// This is the main entry point for the `verdict` binary.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the verdict CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("verdict_cli=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("verdict_cli=info")
            .init();
    }

    // Discover verdict.toml configuration (CLI flags override)
    let config = match &cli.config {
        Some(path) => VerdictConfig::load(path)?,
        None => VerdictConfig::discover().unwrap_or_default(),
    };

    match cli.command {
        Some(Commands::Cells) => list_cells(&cli, &config),
        Some(Commands::Run) | None => run_analysis(&cli, &config),
    }
}

fn run_analysis(cli: &Cli, config: &VerdictConfig) -> anyhow::Result<()> {
    let format = resolve_format(cli, config)?;
    let settings = build_settings(cli, config)?;

    // Configure Rayon thread pool for per-cell analysis
    let threads = cli.threads.unwrap_or(config.analysis.threads);
    if threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    let (input, cells) = load_cells(cli, config)?;
    tracing::info!("Analyzing {} comparison cells", cells.len());

    let outcomes = analyze_cells(&cells, &settings);
    let meta = ReportMeta::now(
        settings.alpha,
        settings.effect.to_string(),
        Some(input.display().to_string()),
    );
    let report = Report::new(meta, outcomes);

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Csv => generate_csv_report(&report),
        OutputFormat::Human => format_human_output(&report),
    };

    write_output(cli, config, &output)?;

    // Failed cells land in the report, but the run itself should not look clean
    if report.summary.failed > 0 {
        eprintln!("\n{} cell(s) produced no decision", report.summary.failed);
        std::process::exit(1);
    }

    Ok(())
}

fn list_cells(cli: &Cli, config: &VerdictConfig) -> anyhow::Result<()> {
    let (_, cells) = load_cells(cli, config)?;

    println!("Verdict Plan:");

    let mut groups: BTreeMap<Operation, Vec<(&CellKey, &Cell)>> = BTreeMap::new();
    for (key, cell) in &cells {
        groups.entry(key.op).or_default().push((key, cell));
    }

    let mut total = 0;
    for (op, entries) in &groups {
        println!("├── op: {}", op);
        for (key, cell) in entries {
            println!(
                "│   ├── size={} crc32c={} md5={} (xml: {}, json: {})",
                key.object_size,
                key.crc32c_enabled as u8,
                key.md5_enabled as u8,
                cell.xml.len(),
                cell.json.len()
            );
            total += 1;
        }
    }

    println!("{} cells found.", total);
    Ok(())
}

/// Load the dataset and group it into comparison cells.
fn load_cells(
    cli: &Cli,
    config: &VerdictConfig,
) -> anyhow::Result<(PathBuf, BTreeMap<CellKey, Cell>)> {
    let input = require_input(cli)?.to_path_buf();
    let points = input::load_points(&input)?;
    tracing::info!("Loaded {} raw points from {}", points.len(), input.display());

    let (table, skipped) = ObservationTable::from_points(points);
    for error in &skipped {
        tracing::warn!("Skipping point: {}", error);
    }
    if table.is_empty() {
        return Err(anyhow::anyhow!(
            "Dataset contains no usable observations ({} point(s) skipped)",
            skipped.len()
        ));
    }
    tracing::debug!(
        "Parsed {} observations, skipped {}",
        table.len(),
        skipped.len()
    );

    let mut cells = table.group(&config.grouping);
    if let Some(filter) = &cli.filter {
        cells.retain(|key, _| key.op.to_string().contains(filter.as_str()));
    }
    if cells.is_empty() {
        return Err(anyhow::anyhow!(
            "No comparison cells after grouping and filtering"
        ));
    }
    Ok((input, cells))
}

/// Build analysis settings by layering: verdict.toml defaults → CLI overrides.
fn build_settings(cli: &Cli, config: &VerdictConfig) -> anyhow::Result<AnalysisSettings> {
    let alpha = cli.alpha.unwrap_or(config.analysis.alpha);
    let effect_name = cli.effect.as_deref().unwrap_or(&config.analysis.effect);
    let effect: EffectSizeMethod = effect_name
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    Ok(AnalysisSettings {
        alpha,
        effect,
        power: PowerConfig {
            alpha: config.analysis.power_alpha,
            power: config.analysis.power_target,
            correction: config.analysis.correction,
        },
    })
}

fn resolve_format(cli: &Cli, config: &VerdictConfig) -> anyhow::Result<OutputFormat> {
    let name = cli.format.as_deref().unwrap_or(&config.output.format);
    name.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn require_input(cli: &Cli) -> anyhow::Result<&Path> {
    cli.input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--input <points.json|points.csv> is required"))
}

fn write_output(cli: &Cli, config: &VerdictConfig, output: &str) -> anyhow::Result<()> {
    let path = cli
        .output
        .clone()
        .or_else(|| config.output.path.as_ref().map(PathBuf::from));
    if let Some(path) = path {
        let mut file = std::fs::File::create(&path)?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_cli() -> Cli {
        Cli {
            command: None,
            input: None,
            format: None,
            output: None,
            config: None,
            filter: None,
            effect: None,
            alpha: None,
            threads: None,
            verbose: false,
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut cli = dummy_cli();
        cli.alpha = Some(0.05);
        cli.effect = Some("fixed".to_string());
        let config = VerdictConfig::default();

        let settings = build_settings(&cli, &config).unwrap();
        assert_eq!(settings.alpha, 0.05);
        assert!(matches!(
            settings.effect,
            EffectSizeMethod::FixedAbsolute { .. }
        ));
    }

    #[test]
    fn test_config_supplies_defaults() {
        let cli = dummy_cli();
        let mut config = VerdictConfig::default();
        config.analysis.alpha = 0.0005;
        config.analysis.effect = "hl".to_string();

        let settings = build_settings(&cli, &config).unwrap();
        assert_eq!(settings.alpha, 0.0005);
        assert!(matches!(settings.effect, EffectSizeMethod::HodgesLehmann(_)));
        assert_eq!(settings.power.alpha, 0.01);
        assert_eq!(settings.power.correction, 1.05);
    }

    #[test]
    fn test_unknown_effect_method_is_rejected() {
        let mut cli = dummy_cli();
        cli.effect = Some("cohen".to_string());
        let err = build_settings(&cli, &VerdictConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown effect size method"));
    }

    #[test]
    fn test_resolve_format() {
        let mut cli = dummy_cli();
        let config = VerdictConfig::default();
        assert!(matches!(
            resolve_format(&cli, &config).unwrap(),
            OutputFormat::Human
        ));

        cli.format = Some("csv".to_string());
        assert!(matches!(
            resolve_format(&cli, &config).unwrap(),
            OutputFormat::Csv
        ));

        cli.format = Some("yaml".to_string());
        assert!(resolve_format(&cli, &config).is_err());
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let err = require_input(&dummy_cli()).unwrap_err();
        assert!(err.to_string().contains("--input"));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "verdict", "--input", "points.json", "--format", "json", "-j", "4", "--alpha", "0.01",
        ])
        .unwrap();
        assert_eq!(cli.input.as_deref(), Some(Path::new("points.json")));
        assert_eq!(cli.format.as_deref(), Some("json"));
        assert_eq!(cli.threads, Some(4));
        assert_eq!(cli.alpha, Some(0.01));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cells_subcommand_parses() {
        let cli = Cli::try_parse_from(["verdict", "--input", "points.csv", "cells"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Cells)));
        assert_eq!(cli.input.as_deref(), Some(Path::new("points.csv")));
    }
}
