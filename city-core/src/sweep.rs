//! Policy-lever sweeps: one independent city per (education, tax) cell.
//!
//! This is the run loop a comparative study drives the engine with. It does
//! no file I/O; callers decide how to persist the rows.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::CityEngine;
use crate::error::Result;
use crate::state::{RunReport, YearOutcome, YearRecord, round_to};

/// Multipliers applied to each baseline lever.
pub const POLICY_FACTORS: [f64; 5] = [0.5, 0.75, 1.0, 1.25, 1.5];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub education_rate: f64,
    pub tax_rate: f64,
}

/// Cartesian grid of lever values, iterated education-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyGrid {
    pub education_rates: Vec<f64>,
    pub tax_rates: Vec<f64>,
}

impl PolicyGrid {
    /// The 5x5 grid of baselines scaled by [`POLICY_FACTORS`], each value
    /// rounded to 3 decimals.
    pub fn around(education_baseline: f64, tax_baseline: f64) -> Self {
        let scale = |base: f64| {
            POLICY_FACTORS
                .iter()
                .map(|f| round_to(base * f, 3))
                .collect()
        };
        Self {
            education_rates: scale(education_baseline),
            tax_rates: scale(tax_baseline),
        }
    }

    pub fn policies(&self) -> impl Iterator<Item = Policy> + '_ {
        self.education_rates.iter().flat_map(move |&education_rate| {
            self.tax_rates.iter().map(move |&tax_rate| Policy {
                education_rate,
                tax_rate,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.education_rates.len() * self.tax_rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one cell of a sweep produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRun {
    pub policy: Policy,
    /// Every record returned, up to and including the terminal one.
    pub trajectory: Vec<YearRecord>,
    /// Last year that ended with people still in the city.
    pub last: Option<YearRecord>,
    /// Year the city emptied out, if it did within the horizon.
    pub extinct_at: Option<u64>,
    pub report: RunReport,
}

impl PolicyRun {
    pub fn row(&self) -> SweepRow {
        SweepRow {
            education_rate: self.policy.education_rate,
            tax_rate: self.policy.tax_rate,
            last: self.last.clone(),
        }
    }
}

/// Summary row for one sweep cell. `last` is `None` when the city never
/// completed a populated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub education_rate: f64,
    pub tax_rate: f64,
    #[serde(flatten)]
    pub last: Option<YearRecord>,
}

/// Run one city under a fixed policy for up to `horizon` years, stopping
/// early when the population hits zero.
pub fn run_policy(
    config: &EngineConfig,
    policy: Policy,
    horizon: u64,
    seed: Option<u64>,
) -> Result<PolicyRun> {
    let config = config.clone().with_name(format!(
        "Sample_{}_{}",
        policy.education_rate, policy.tax_rate
    ));
    let mut engine = CityEngine::from_seed(config, seed)?;

    let mut trajectory = Vec::new();
    let mut last = None;
    let mut extinct_at = None;

    for _ in 0..horizon {
        match engine.advance_year(policy.education_rate, policy.tax_rate) {
            YearOutcome::Extinct(record) => {
                extinct_at = Some(record.year);
                trajectory.push(record);
                break;
            }
            YearOutcome::Advanced(record) => {
                // Migration can empty the roster after a productive year.
                let emptied = record.population == 0;
                if emptied {
                    extinct_at = Some(record.year);
                } else {
                    last = Some(record.clone());
                }
                trajectory.push(record);
                if emptied {
                    break;
                }
            }
        }
    }

    Ok(PolicyRun {
        policy,
        trajectory,
        last,
        extinct_at,
        report: engine.report(),
    })
}

/// Per-cell seed so every cell draws an independent stream.
fn cell_seed(seed: Option<u64>, cell: usize) -> Option<u64> {
    seed.map(|s| s ^ (cell as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Run every cell of `grid` in order on the calling thread.
pub fn run_sweep(
    config: &EngineConfig,
    grid: &PolicyGrid,
    horizon: u64,
    seed: Option<u64>,
) -> Result<Vec<PolicyRun>> {
    config.validate()?;
    grid.policies()
        .enumerate()
        .map(|(i, policy)| run_policy(config, policy, horizon, cell_seed(seed, i)))
        .collect()
}

/// Same as [`run_sweep`], with cells spread over the rayon pool.
/// Cells share no state, so results match the serial sweep for a given seed.
pub fn run_sweep_parallel(
    config: &EngineConfig,
    grid: &PolicyGrid,
    horizon: u64,
    seed: Option<u64>,
) -> Result<Vec<PolicyRun>> {
    config.validate()?;
    grid.policies()
        .enumerate()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(i, policy)| run_policy(config, policy, horizon, cell_seed(seed, i)))
        .collect()
}
