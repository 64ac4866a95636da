// City state and the per-year state transition

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{EngineConfig, MigrationInstitutions, StructuralParams};
use crate::error::{EngineError, Result};
use crate::growth::next_productivity;
use crate::inequality::{gini, mean_wealth};
use crate::migration::{self, morale};
use crate::production::produce_and_distribute;
use crate::reconcile::reconcile;
use crate::state::{History, RunReport, YearOutcome, YearRecord, round_to};
use crate::survival::apply_subsistence;

/// A single simulated city, advanced one fiscal year at a time.
///
/// Owns its roster of individual wealth values and its random source, so
/// independent engines can run on separate threads without coordination.
#[derive(Debug, Clone)]
pub struct CityEngine<R = StdRng> {
    name: String,
    wealth: Vec<f64>,
    productivity: f64,
    year: u64,
    cost: f64,
    structure: StructuralParams,
    institutions: MigrationInstitutions,
    history: History,
    rng: R,
}

impl CityEngine<StdRng> {
    /// Engine seeded from the operating system.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Engine with a deterministic random source.
    pub fn seeded(config: EngineConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_seed(config: EngineConfig, seed: Option<u64>) -> Result<Self> {
        match seed {
            Some(seed) => Self::seeded(config, seed),
            None => Self::new(config),
        }
    }
}

impl<R: Rng> CityEngine<R> {
    /// Build an engine with `config.population` individuals holding
    /// `config.wealth` each.
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self> {
        let roster = vec![config.wealth; config.population];
        Self::from_roster(config, roster, rng)
    }

    /// Build an engine from an explicit roster. `config.population` and
    /// `config.wealth` are ignored.
    pub fn from_roster(config: EngineConfig, wealth: Vec<f64>, rng: R) -> Result<Self> {
        config.validate()?;
        if let Some(&bad) = wealth.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(EngineError::invalid(
                "wealth",
                bad,
                "every roster entry must be finite and non-negative",
            ));
        }

        Ok(Self {
            name: config.name,
            wealth,
            productivity: config.productivity,
            year: 0,
            cost: config.cost,
            structure: config.structure,
            institutions: config.migration,
            history: History::default(),
            rng,
        })
    }

    // === Accessors ===

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn year(&self) -> u64 {
        self.year
    }

    pub fn population(&self) -> usize {
        self.wealth.len()
    }

    pub fn is_extinct(&self) -> bool {
        self.wealth.is_empty()
    }

    pub fn productivity(&self) -> f64 {
        self.productivity
    }

    pub fn wealth(&self) -> &[f64] {
        &self.wealth
    }

    pub fn structure(&self) -> &StructuralParams {
        &self.structure
    }

    pub fn institutions(&self) -> &MigrationInstitutions {
        &self.institutions
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// End-of-run snapshot. Does not touch engine state.
    pub fn report(&self) -> RunReport {
        RunReport {
            name: self.name.clone(),
            final_productivity: self.productivity,
            inequality_series: self.history.inequality.clone(),
            population_series: self.history.population.clone(),
        }
    }

    // === Year Step ===

    /// Advance the city by one fiscal year.
    ///
    /// Phases:
    /// 1. Survival - everyone pays subsistence, the broke leave the roster
    /// 2. Production & distribution - survivors produce and share net output
    /// 3. Inequality and morale
    /// 4. Productivity growth from education
    /// 5. Migration projection and roster reconciliation
    ///
    /// `education_rate` and `tax_rate` are expected in [0, 1].
    pub fn advance_year(&mut self, education_rate: f64, tax_rate: f64) -> YearOutcome {
        self.year += 1;

        #[cfg(feature = "instrument")]
        {
            let in_range = |x: f64| (0.0..=1.0).contains(&x);
            if !in_range(education_rate) || !in_range(tax_rate) {
                tracing::warn!(
                    year = self.year,
                    education_rate,
                    tax_rate,
                    "policy lever outside [0, 1]"
                );
            }
        }

        if self.wealth.is_empty() {
            return self.extinct();
        }

        // === 1. SURVIVAL ===
        let survival = apply_subsistence(&mut self.wealth, self.cost);

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "survival",
            year = self.year,
            before = survival.before as u64,
            after = survival.after as u64,
        );

        if survival.is_extinct() {
            return self.extinct();
        }

        // === 2. PRODUCTION & DISTRIBUTION ===
        let distribution = produce_and_distribute(
            &mut self.wealth,
            self.productivity,
            self.structure.beta,
            tax_rate,
            &mut self.rng,
        );

        // === 3. SOCIO-METRICS ===
        let inequality = gini(&self.wealth);
        let morale = morale(mean_wealth(&self.wealth), inequality);
        self.history.push(inequality, self.wealth.len());

        // === 4. GROWTH ===
        self.productivity = next_productivity(education_rate, self.productivity);

        // === 5. MIGRATION ===
        let projection = migration::project(
            self.wealth.len(),
            morale,
            &self.structure,
            &self.institutions,
        );

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "migration",
            year = self.year,
            eta = projection.eta,
            pressure = projection.pressure,
            logistic = projection.logistic,
            target_population = projection.target as u64,
        );

        #[cfg_attr(not(feature = "instrument"), allow(unused_variables))]
        let shift = reconcile(&mut self.wealth, projection.target, &mut self.rng);

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "reconcile",
            year = self.year,
            before = shift.before as u64,
            after = shift.after as u64,
            added = shift.added as u64,
            removed = shift.removed as u64,
        );

        let record = YearRecord {
            year: self.year,
            population: self.wealth.len(),
            inequality: Some(round_to(inequality, 3)),
            morale: round_to(morale, 2),
            output: distribution.gross_output,
        };

        #[cfg(feature = "instrument")]
        tracing::info!(
            target: "year",
            year = self.year,
            population = record.population as u64,
            inequality = inequality,
            morale = morale,
            output = record.output,
            productivity = self.productivity,
            education_rate = education_rate,
            tax_rate = tax_rate,
        );

        YearOutcome::Advanced(record)
    }

    fn extinct(&self) -> YearOutcome {
        #[cfg(feature = "instrument")]
        tracing::info!(target: "extinction", year = self.year);

        YearOutcome::Extinct(YearRecord::extinction(self.year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(population: usize, wealth: f64, seed: u64) -> CityEngine {
        let config = EngineConfig::default().with_population(population, wealth);
        CityEngine::seeded(config, seed).unwrap()
    }

    #[test]
    fn construction_validates() {
        let bad = EngineConfig {
            productivity: -1.0,
            ..Default::default()
        };
        assert!(CityEngine::seeded(bad, 0).is_err());

        let rng = StdRng::seed_from_u64(0);
        let err = CityEngine::from_roster(EngineConfig::default(), vec![1.0, -3.0], rng);
        assert!(err.is_err());
    }

    #[test]
    fn fresh_engine_state() {
        let e = engine(1000, 50.0, 1);
        assert_eq!(e.year(), 0);
        assert_eq!(e.population(), 1000);
        assert_eq!(e.productivity(), 4.5);
        assert!(e.history().is_empty());
        assert!(e.wealth().iter().all(|&w| w == 50.0));
    }

    #[test]
    fn empty_city_reports_extinction_and_still_ticks() {
        let mut e = engine(0, 50.0, 2);
        let outcome = e.advance_year(0.05, 0.15);
        assert!(outcome.is_extinct());
        assert_eq!(outcome.record(), &YearRecord::extinction(1));
        assert_eq!(e.year(), 1);

        e.advance_year(0.05, 0.15);
        assert_eq!(e.year(), 2);
        assert_eq!(e.productivity(), 4.5);
    }

    #[test]
    fn lone_pauper_dies_before_production() {
        let mut e = engine(1, 4.0, 3);
        let outcome = e.advance_year(0.05, 0.15);
        assert_eq!(outcome, YearOutcome::Extinct(YearRecord::extinction(1)));
        assert_eq!(e.population(), 0);
        // No growth in an extinction year.
        assert_eq!(e.productivity(), 4.5);
        assert!(e.history().is_empty());
    }

    #[test]
    fn reference_year() {
        let mut e = engine(1000, 50.0, 4);
        let record = match e.advance_year(0.05, 0.15) {
            YearOutcome::Advanced(r) => r,
            YearOutcome::Extinct(r) => panic!("unexpected extinction: {r:?}"),
        };

        assert_eq!(record.year, 1);
        // Everyone survives the first year, so 1000 workers produced.
        let expected_output = 4.5 * 1000f64.powf(1.15);
        assert!((record.output - expected_output).abs() < 1e-6);

        let g = record.inequality.unwrap();
        assert!((0.0..=1.0).contains(&g));
        assert!(record.morale > 0.0);
        assert_eq!(record.population, e.population());

        let expected_a = 4.5 * (1.0 + 0.05 * 0.15 / 4.5f64.sqrt());
        assert!((e.productivity() - expected_a).abs() < 1e-12);

        assert_eq!(e.history().population, vec![1000]);
    }

    #[test]
    fn report_is_a_snapshot() {
        let mut e = engine(200, 40.0, 5);
        for _ in 0..5 {
            e.advance_year(0.1, 0.2);
        }
        let before = e.report();
        let again = e.report();
        assert_eq!(before, again);
        assert_eq!(before.inequality_series.len(), 5);
        assert_eq!(before.population_series.len(), 5);
        assert_eq!(before.final_productivity, e.productivity());
        assert_eq!(e.year(), 5);
    }

    #[test]
    fn same_seed_same_trajectory() {
        let mut a = engine(300, 30.0, 42);
        let mut b = engine(300, 30.0, 42);
        for _ in 0..20 {
            assert_eq!(a.advance_year(0.05, 0.15), b.advance_year(0.05, 0.15));
        }
        assert_eq!(a.wealth(), b.wealth());
    }
}
