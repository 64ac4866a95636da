//! Macroscopic population dynamics: morale-driven migration plus logistic
//! growth against a carrying capacity.

use crate::config::{MigrationInstitutions, StructuralParams};

/// Morale level at which migration pressure is neutral.
pub const BENCHMARK_MORALE: f64 = 25.0;

/// Floor on morale inside the log so the ratio is always positive.
pub const MORALE_EPSILON: f64 = 1e-9;

/// Exponent on `(1 - gini)` when discounting welfare for unfairness.
pub const FAIRNESS_EXPONENT: f64 = 0.6;

/// `ln(0.7)`: migration alone never drains more than 30% in one year.
pub fn max_outflow() -> f64 {
    0.7f64.ln()
}

/// Fairness-adjusted per-capita welfare, `mean * (1 - gini)^0.6`.
pub fn morale(mean_wealth: f64, gini: f64) -> f64 {
    mean_wealth * (1.0 - gini).max(0.0).powf(FAIRNESS_EXPONENT)
}

/// Dynamic migration sensitivity `eta`.
///
/// `eta_base * (1 + a_I * infra) * exp(-a_P * barrier) * (1 + a_F * info)`
pub fn sensitivity(inst: &MigrationInstitutions) -> f64 {
    let infra_effect = 1.0 + inst.alpha_infrastructure * inst.infrastructure;
    let policy_effect = (-inst.alpha_policy * inst.policy_barrier).exp();
    let info_effect = 1.0 + inst.alpha_info * inst.info_flow;
    inst.eta_base * infra_effect * policy_effect * info_effect
}

/// Net migration rate (log scale), floored at [`max_outflow`].
pub fn migration_pressure(morale: f64, eta: f64) -> f64 {
    let raw = eta * (morale.max(MORALE_EPSILON) / BENCHMARK_MORALE).ln();
    raw.max(max_outflow())
}

/// Intrinsic growth `r * (1 - n / K)`, negative above capacity.
pub fn logistic_growth(population: usize, structure: &StructuralParams) -> f64 {
    structure.growth_rate * (1.0 - population as f64 / structure.carrying_capacity)
}

/// Components of one year's population projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub eta: f64,
    pub pressure: f64,
    pub logistic: f64,
    /// Target population for next year.
    pub target: usize,
}

/// Project next year's population, `trunc(n * exp(logistic + pressure))`.
pub fn project(
    population: usize,
    morale: f64,
    structure: &StructuralParams,
    institutions: &MigrationInstitutions,
) -> Projection {
    let eta = sensitivity(institutions);
    let pressure = migration_pressure(morale, eta);
    let logistic = logistic_growth(population, structure);
    let target = (population as f64 * (logistic + pressure).exp()) as usize;
    Projection {
        eta,
        pressure,
        logistic,
        target,
    }
}
