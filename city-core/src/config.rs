use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::error::{EngineError, Result};

/// Fixed structural constants of a city. Set once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct StructuralParams {
    /// Super-linear urban scaling exponent on output (`Y = A * n^beta`).
    pub beta: f64,
    /// Carrying capacity `K` of the environment.
    pub carrying_capacity: f64,
    /// Intrinsic population growth rate `r`.
    pub growth_rate: f64,
    /// Friction coefficient on economic yield. Not used by the year step.
    pub corruption: f64,
}

impl Default for StructuralParams {
    fn default() -> Self {
        Self {
            beta: 1.15,
            carrying_capacity: 10_000.0,
            growth_rate: 0.008,
            corruption: 0.05,
        }
    }
}

/// Institutional indices and elasticities that shape migration sensitivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct MigrationInstitutions {
    /// Baseline migration sensitivity before institutional modifiers.
    pub eta_base: f64,
    /// Transport / infrastructure index in [0, 1].
    pub infrastructure: f64,
    /// Institutional friction on movement (visas, residency permits).
    pub policy_barrier: f64,
    /// Information transparency in [0, 1].
    pub info_flow: f64,
    pub alpha_infrastructure: f64,
    pub alpha_policy: f64,
    pub alpha_info: f64,
}

impl Default for MigrationInstitutions {
    fn default() -> Self {
        Self {
            eta_base: 0.02,
            infrastructure: 0.6,
            policy_barrier: 0.4,
            info_flow: 0.7,
            alpha_infrastructure: 1.0,
            alpha_policy: 1.5,
            alpha_info: 0.8,
        }
    }
}

/// Everything needed to construct a [`CityEngine`](crate::CityEngine).
///
/// Missing JSON fields fall back to the defaults, so a config document only
/// needs to name what it changes:
///
/// ```
/// let cfg = city_core::EngineConfig::from_json(r#"{ "population": 250 }"#).unwrap();
/// assert_eq!(cfg.population, 250);
/// assert_eq!(cfg.productivity, 4.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct EngineConfig {
    pub name: String,
    /// Starting productivity (TFP).
    pub productivity: f64,
    /// Starting number of individuals.
    pub population: usize,
    /// Wealth each individual starts with.
    pub wealth: f64,
    /// Per-capita annual subsistence cost.
    pub cost: f64,
    pub structure: StructuralParams,
    pub migration: MigrationInstitutions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "city".to_string(),
            productivity: 4.5,
            population: 1000,
            wealth: 50.0,
            cost: 10.0,
            structure: StructuralParams::default(),
            migration: MigrationInstitutions::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_population(mut self, population: usize, wealth: f64) -> Self {
        self.population = population;
        self.wealth = wealth;
        self
    }

    /// Reject configurations that would leave the engine in an undefined
    /// numeric state (non-positive productivity, free subsistence, ...).
    pub fn validate(&self) -> Result<()> {
        if !self.wealth.is_finite() || self.wealth < 0.0 {
            return Err(EngineError::invalid(
                "wealth",
                self.wealth,
                "must be finite and non-negative",
            ));
        }
        positive("productivity", self.productivity)?;
        positive("cost", self.cost)?;

        let s = &self.structure;
        if !s.beta.is_finite() || s.beta <= 1.0 {
            return Err(EngineError::invalid(
                "structure.beta",
                s.beta,
                "must be greater than 1 (super-linear scaling)",
            ));
        }
        positive("structure.carrying_capacity", s.carrying_capacity)?;
        finite("structure.growth_rate", s.growth_rate)?;
        finite("structure.corruption", s.corruption)?;

        let m = &self.migration;
        if !m.eta_base.is_finite() || m.eta_base < 0.0 {
            return Err(EngineError::invalid(
                "migration.eta_base",
                m.eta_base,
                "must be finite and non-negative",
            ));
        }
        finite("migration.infrastructure", m.infrastructure)?;
        finite("migration.policy_barrier", m.policy_barrier)?;
        finite("migration.info_flow", m.info_flow)?;
        finite("migration.alpha_infrastructure", m.alpha_infrastructure)?;
        finite("migration.alpha_policy", m.alpha_policy)?;
        finite("migration.alpha_info", m.alpha_info)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(name, value, "must be finite and positive"))
    }
}

fn finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::invalid(name, value, "must be finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(
            r#"{ "cost": 12.5, "migration": { "policy_barrier": 0.9 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.cost, 12.5);
        assert_eq!(cfg.migration.policy_barrier, 0.9);
        assert_eq!(cfg.migration.eta_base, 0.02);
        assert_eq!(cfg.structure.beta, 1.15);
        assert_eq!(cfg.population, 1000);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = EngineConfig::from_json("{ population: ").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)), "got {err:?}");
    }

    #[test]
    fn rejects_non_positive_productivity_and_cost() {
        let cfg = EngineConfig {
            productivity: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(EngineError::InvalidParameter {
                name: "productivity",
                ..
            })
        ));

        let cfg = EngineConfig {
            cost: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(EngineError::InvalidParameter { name: "cost", .. })
        ));
    }

    #[test]
    fn rejects_negative_or_nan_wealth() {
        for wealth in [-0.5, f64::NAN] {
            let cfg = EngineConfig::default().with_population(10, wealth);
            assert!(cfg.validate().is_err(), "wealth {wealth} accepted");
        }
        let cfg = EngineConfig::default().with_population(10, 0.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_sub_linear_scaling() {
        let mut cfg = EngineConfig::default();
        cfg.structure.beta = 1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn json_rejects_invalid_values() {
        let err = EngineConfig::from_json(r#"{ "productivity": -2.0 }"#).unwrap_err();
        assert!(err.to_string().contains("productivity"), "{err}");
    }
}
