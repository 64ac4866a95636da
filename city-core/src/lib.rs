use wasm_bindgen::prelude::*;

pub mod config;
pub mod engine;
pub mod error;
pub mod growth;
pub mod inequality;
pub mod migration;
pub mod production;
pub mod reconcile;
pub mod shock;
pub mod state;
pub mod survival;
pub mod sweep;

#[cfg(feature = "instrument")]
pub use instrument;

pub use config::{EngineConfig, MigrationInstitutions, StructuralParams};
pub use engine::CityEngine;
pub use error::EngineError;
pub use inequality::gini;
pub use state::{History, RunReport, YearOutcome, YearRecord};
pub use sweep::{
    POLICY_FACTORS, Policy, PolicyGrid, PolicyRun, SweepRow, run_policy, run_sweep,
    run_sweep_parallel,
};

// ============================================================================
// WASM API - City Simulation
// ============================================================================

#[wasm_bindgen]
pub struct CitySimulation {
    engine: CityEngine,
}

#[wasm_bindgen]
impl CitySimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(config: EngineConfig, seed: Option<u64>) -> Result<CitySimulation, JsError> {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        let engine = CityEngine::from_seed(config, seed)?;
        Ok(Self { engine })
    }

    /// Default city: 1000 people with 50.0 wealth each, productivity 4.5
    #[wasm_bindgen]
    pub fn with_defaults(seed: Option<u64>) -> Result<CitySimulation, JsError> {
        Self::new(EngineConfig::default(), seed)
    }

    /// Advance the city by one fiscal year
    #[wasm_bindgen]
    pub fn advance_year(&mut self, education_rate: f64, tax_rate: f64) -> YearRecord {
        self.engine
            .advance_year(education_rate, tax_rate)
            .into_record()
    }

    #[wasm_bindgen]
    pub fn get_year(&self) -> u64 {
        self.engine.year()
    }

    #[wasm_bindgen]
    pub fn get_population(&self) -> usize {
        self.engine.population()
    }

    #[wasm_bindgen]
    pub fn get_productivity(&self) -> f64 {
        self.engine.productivity()
    }

    #[wasm_bindgen]
    pub fn is_extinct(&self) -> bool {
        self.engine.is_extinct()
    }

    /// End-of-run report (productivity and per-year series)
    #[wasm_bindgen]
    pub fn get_report(&self) -> RunReport {
        self.engine.report()
    }
}
