//! Configuration loading from verdict.toml
//!
//! Analysis settings can be specified in a `verdict.toml` file in the project
//! root. The configuration is automatically discovered by walking up from the
//! current directory, and individual values can be overridden on the command
//! line.

use serde::{Deserialize, Serialize};
use std::path::Path;
use verdict_table::GroupingSpec;

/// Verdict configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerdictConfig {
    /// Statistical analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Cell grouping restrictions
    #[serde(default)]
    pub grouping: GroupingSpec,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Statistical analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Significance threshold for the two-sided rank test
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Effect size method: "fixed", "relative", or "hl"
    #[serde(default = "default_effect")]
    pub effect: String,
    /// Significance level used by the power model
    #[serde(default = "default_power_alpha")]
    pub power_alpha: f64,
    /// Target power for the sample size solver
    #[serde(default = "default_power_target")]
    pub power_target: f64,
    /// Inflation factor applied to the parametric sample size
    #[serde(default = "default_correction")]
    pub correction: f64,
    /// Worker threads for per-cell analysis (0 = all cores)
    #[serde(default)]
    pub threads: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            effect: default_effect(),
            power_alpha: default_power_alpha(),
            power_target: default_power_target(),
            correction: default_correction(),
            threads: 0,
        }
    }
}

fn default_alpha() -> f64 {
    verdict_stats::DEFAULT_ALPHA
}
fn default_effect() -> String {
    "relative".to_string()
}
fn default_power_alpha() -> f64 {
    verdict_stats::POWER_ALPHA
}
fn default_power_target() -> f64 {
    verdict_stats::POWER_TARGET
}
fn default_correction() -> f64 {
    verdict_stats::NONPARAMETRIC_CORRECTION
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Report file path (stdout when absent)
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl VerdictConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("verdict.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Verdict Configuration

[analysis]
# Significance threshold for the two-sided rank test
alpha = 0.001
# Effect size method: "fixed", "relative", or "hl"
effect = "relative"
# Significance level used by the power model
power_alpha = 0.01
# Target power for the sample size solver
power_target = 0.9
# Inflation factor applied to the parametric sample size
correction = 1.05
# Worker threads for per-cell analysis (0 = all cores)
threads = 0

[grouping]
# Restrict analysis to these operations (uncomment to enable)
# operations = ["INSERT", "READ[0]"]
# Restrict analysis to these object sizes in bytes (uncomment to enable)
# object_sizes = [1048576]
# Restrict analysis to these [crc32c, md5] flag pairs (uncomment to enable)
# checksum_combinations = [[false, false]]

[output]
# Default output format: human, json, csv
format = "human"
# Report file path (uncomment to write to a file instead of stdout)
# path = "verdict-report.json"
"#
        .to_string()
    }
}
