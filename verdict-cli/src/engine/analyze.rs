//! Per-cell statistical analysis
//!
//! Runs the full decision pipeline for each comparison cell: two-sided and
//! one-sided rank tests, effect size estimation, power-based sample
//! requirement, and winner resolution. Cells are independent, so the batch
//! entry point fans out across a Rayon pool.

use rayon::prelude::*;
use std::collections::BTreeMap;
use verdict_report::{CellOutcome, DecisionRecord, GatedWinner, Winner};
use verdict_stats::{
    effect_size, mann_whitney, required_samples_per_group, Alternative, EffectError,
    EffectSizeMethod, PowerConfig, PowerError, RankError, RankTestConfig,
};
use verdict_table::{Cell, CellKey};

/// Knobs for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Significance threshold for both rank tests
    pub alpha: f64,
    /// Effect size method used to feed the power model
    pub effect: EffectSizeMethod,
    /// Power model parameters
    pub power: PowerConfig,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            alpha: verdict_stats::DEFAULT_ALPHA,
            effect: EffectSizeMethod::default(),
            power: PowerConfig::default(),
        }
    }
}

/// Analyze every cell and return outcomes in deterministic key order.
///
/// Failures never abort the batch; a cell that cannot produce a decision is
/// reported as failed next to its decided neighbors.
pub fn analyze_cells(
    cells: &BTreeMap<CellKey, Cell>,
    settings: &AnalysisSettings,
) -> Vec<CellOutcome> {
    let mut outcomes: Vec<CellOutcome> = cells
        .par_iter()
        .map(|(key, cell)| analyze_cell(key, cell, settings))
        .collect();
    // Parallel collection order is unspecified for map iterators.
    outcomes.sort_by(|a, b| a.key.cmp(&b.key));
    outcomes
}

/// Run the decision pipeline for a single cell.
pub fn analyze_cell(key: &CellKey, cell: &Cell, settings: &AnalysisSettings) -> CellOutcome {
    let (xml, json) = match cell.samples() {
        Ok(samples) => samples,
        Err(e) => return CellOutcome::failed(*key, "empty_group", e.to_string()),
    };

    let rank_config = RankTestConfig {
        alpha: settings.alpha,
    };
    let two_sided = match mann_whitney(xml, json, Alternative::TwoSided, &rank_config) {
        Ok(test) => test,
        Err(e) => return CellOutcome::failed(*key, rank_failure_kind(&e), e.to_string()),
    };
    // One-sided direction: is the JSON transport stochastically slower?
    let less = match mann_whitney(json, xml, Alternative::Less, &rank_config) {
        Ok(test) => test,
        Err(e) => return CellOutcome::failed(*key, rank_failure_kind(&e), e.to_string()),
    };

    let analysis = match effect_size(xml, json, &settings.effect) {
        Ok(analysis) => analysis,
        Err(e) => return CellOutcome::failed(*key, effect_failure_kind(&e), e.to_string()),
    };

    let needed = match required_samples_per_group(analysis.effect_size, &settings.power) {
        Ok(needed) => needed,
        Err(e) => return CellOutcome::failed(*key, power_failure_kind(&e), e.to_string()),
    };
    let enough = (xml.len().min(json.len()) as u64) >= needed;

    let winner = Winner::resolve(two_sided.is_significant, less.is_significant);
    let gated_winner = GatedWinner::resolve(winner, enough);

    CellOutcome::decided(
        *key,
        DecisionRecord {
            sample_count: cell.len(),
            xml_count: xml.len(),
            json_count: json.len(),
            needed_samples: needed,
            enough_samples: enough,
            effect_size: analysis.effect_size,
            xml_mean: analysis.first.mean,
            xml_std_dev: analysis.first.std_dev,
            json_mean: analysis.second.mean,
            json_std_dev: analysis.second.std_dev,
            p_value: two_sided.p_value,
            significant: two_sided.is_significant,
            p_value_less: less.p_value,
            json_less: less.is_significant,
            rank_biserial: two_sided.rank_biserial,
            winner,
            gated_winner,
        },
    )
}

fn rank_failure_kind(error: &RankError) -> &'static str {
    match error {
        RankError::EmptyFirst | RankError::EmptySecond => "empty_group",
        RankError::NoVariance => "degenerate_distribution",
        RankError::InvalidAlpha(_) => "invalid_config",
    }
}

fn effect_failure_kind(error: &EffectError) -> &'static str {
    match error {
        EffectError::EmptyFirst | EffectError::EmptySecond => "empty_group",
        EffectError::InsufficientFirst(_) | EffectError::InsufficientSecond(_) => {
            "insufficient_samples"
        }
        EffectError::NoVariance => "degenerate_distribution",
        EffectError::Shift(_) => "empty_group",
    }
}

fn power_failure_kind(error: &PowerError) -> &'static str {
    match error {
        PowerError::InvalidEffect(_) => "degenerate_effect",
        PowerError::Unresolvable(_) => "unresolvable_effect",
        PowerError::InvalidAlpha(_) | PowerError::InvalidPower(_) => "invalid_config",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::{Distribution, Normal};
    use verdict_table::{ApiName, Observation, ObservationTable, Operation};

    fn observation(api: ApiName, mib_s: f64) -> Observation {
        // 1 MiB full-object transfer at the requested throughput
        let elapsed = (1_048_576.0 / (1_048_576.0 * mib_s / 1e6)).round() as u64;
        Observation {
            api,
            op: Operation::Insert,
            object_size: 1_048_576,
            transfer_size: 1_048_576,
            elapsed_us: elapsed.max(1),
            crc32c_enabled: false,
            md5_enabled: false,
            status: "OK".to_string(),
        }
    }

    fn cell_from(xml: &[f64], json: &[f64]) -> (CellKey, Cell) {
        let mut table = ObservationTable::new();
        for &v in xml {
            table.push(observation(ApiName::Xml, v));
        }
        for &v in json {
            table.push(observation(ApiName::Json, v));
        }
        let cells = table.group(&Default::default());
        assert_eq!(cells.len(), 1);
        cells.into_iter().next().unwrap()
    }

    fn fixed_settings() -> AnalysisSettings {
        AnalysisSettings {
            effect: EffectSizeMethod::FixedAbsolute { numerator: 5.0 },
            ..AnalysisSettings::default()
        }
    }

    #[test]
    fn test_identical_distributions_decide_identical() {
        let mut rng = StdRng::seed_from_u64(7);
        let normal = Normal::new(50.0, 2.5).unwrap();
        let xml: Vec<f64> = (0..100).map(|_| normal.sample(&mut rng)).collect();
        let json: Vec<f64> = (0..100).map(|_| normal.sample(&mut rng)).collect();

        let (key, cell) = cell_from(&xml, &json);
        let outcome = analyze_cell(&key, &cell, &fixed_settings());
        let decision = outcome.decision.unwrap();
        assert!(!decision.significant);
        assert_eq!(decision.winner, Winner::Identical);
        assert!(decision.enough_samples);
        assert_eq!(decision.gated_winner, GatedWinner::Settled(Winner::Identical));
    }

    #[test]
    fn test_xml_wins_when_json_slower() {
        let mut rng = StdRng::seed_from_u64(11);
        let xml: Vec<f64> = (0..50).map(|_| 100.0 + rng.gen::<f64>()).collect();
        let json: Vec<f64> = (0..50).map(|_| 5.0 + rng.gen::<f64>()).collect();

        let (key, cell) = cell_from(&xml, &json);
        let outcome = analyze_cell(&key, &cell, &fixed_settings());
        let decision = outcome.decision.unwrap();
        assert!(decision.significant);
        assert!(decision.json_less);
        assert_eq!(decision.winner, Winner::Xml);
        assert!(decision.rank_biserial > 0.9);
        assert!(decision.xml_mean > decision.json_mean);
    }

    #[test]
    fn test_json_wins_when_faster() {
        let mut rng = StdRng::seed_from_u64(13);
        let xml: Vec<f64> = (0..50).map(|_| 5.0 + rng.gen::<f64>()).collect();
        let json: Vec<f64> = (0..50).map(|_| 100.0 + rng.gen::<f64>()).collect();

        let (key, cell) = cell_from(&xml, &json);
        let outcome = analyze_cell(&key, &cell, &fixed_settings());
        let decision = outcome.decision.unwrap();
        assert!(decision.significant);
        assert!(!decision.json_less);
        assert_eq!(decision.winner, Winner::Json);
        assert!(decision.rank_biserial < -0.9);
    }

    #[test]
    fn test_one_sided_empty_group_fails() {
        let mut table = ObservationTable::new();
        for _ in 0..10 {
            table.push(observation(ApiName::Xml, 40.0));
        }
        let cells = table.group(&Default::default());
        let (key, cell) = cells.into_iter().next().unwrap();

        let outcome = analyze_cell(&key, &cell, &fixed_settings());
        assert!(!outcome.is_decided());
        let failure = outcome.failure.unwrap();
        assert_eq!(failure.kind, "empty_group");
        assert!(failure.message.contains("JSON"));
    }

    #[test]
    fn test_degenerate_cell_fails() {
        let (key, cell) = cell_from(&[10.0; 5], &[10.0; 5]);
        let outcome = analyze_cell(&key, &cell, &fixed_settings());
        let failure = outcome.failure.unwrap();
        assert_eq!(failure.kind, "degenerate_distribution");
    }

    #[test]
    fn test_tiny_effect_gates_decision() {
        // Relative method on matched throughput yields a sub-percent effect,
        // so the required per-group count dwarfs what the cell holds.
        let mut rng = StdRng::seed_from_u64(17);
        let normal = Normal::<f64>::new(5.0, 2.5).unwrap();
        let xml: Vec<f64> = (0..100).map(|_| normal.sample(&mut rng).max(0.05)).collect();
        let json: Vec<f64> = (0..100).map(|_| normal.sample(&mut rng).max(0.05)).collect();

        let (key, cell) = cell_from(&xml, &json);
        let settings = AnalysisSettings::default();
        let outcome = analyze_cell(&key, &cell, &settings);
        let decision = outcome.decision.unwrap();
        assert!(!decision.enough_samples);
        assert!(decision.needed_samples > 100);
        assert_eq!(decision.gated_winner, GatedWinner::NeedMoreSamples);
    }

    #[test]
    fn test_sufficiency_monotone_in_sample_count() {
        // Same spread at both sizes; only the per-group count changes.
        let pattern = [2.0, 4.0, 6.0];
        let small: Vec<f64> = pattern.to_vec();
        let large: Vec<f64> = pattern.iter().cycle().take(30).copied().collect();

        let (key, cell) = cell_from(&small, &small);
        let gated_small = analyze_cell(&key, &cell, &fixed_settings())
            .decision
            .unwrap();
        let (key, cell) = cell_from(&large, &large);
        let gated_large = analyze_cell(&key, &cell, &fixed_settings())
            .decision
            .unwrap();

        assert!(!gated_small.enough_samples);
        assert!(gated_large.enough_samples);
        assert_eq!(gated_small.gated_winner, GatedWinner::NeedMoreSamples);
        assert_eq!(
            gated_large.gated_winner,
            GatedWinner::Settled(Winner::Identical)
        );
    }

    #[test]
    fn test_batch_order_is_deterministic() {
        let mut table = ObservationTable::new();
        for size in [1_024u64, 1_048_576] {
            for i in 0..20 {
                let mut obs = observation(ApiName::Xml, 40.0 + i as f64);
                obs.object_size = size;
                obs.transfer_size = size;
                table.push(obs);
                let mut obs = observation(ApiName::Json, 41.0 + i as f64);
                obs.object_size = size;
                obs.transfer_size = size;
                table.push(obs);
            }
        }
        let cells = table.group(&Default::default());
        let outcomes = analyze_cells(&cells, &fixed_settings());
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].key < outcomes[1].key);
        assert!(outcomes.iter().all(|o| o.is_decided()));
    }
}
