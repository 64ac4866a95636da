use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

// ============================================================================
// Year Records
// ============================================================================

/// Metrics for one completed fiscal year.
///
/// `inequality` is `None` only for extinction years, where the measure is no
/// longer meaningful (distinct from `Some(0.0)`, perfect equality).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct YearRecord {
    pub year: u64,
    pub population: usize,
    /// Gini coefficient rounded to 3 decimals.
    pub inequality: Option<f64>,
    /// Fairness-adjusted welfare rounded to 2 decimals.
    pub morale: f64,
    /// Gross output of the year.
    pub output: f64,
}

impl YearRecord {
    pub fn extinction(year: u64) -> Self {
        Self {
            year,
            population: 0,
            inequality: None,
            morale: 0.0,
            output: 0.0,
        }
    }
}

/// What one call to `advance_year` produced.
#[derive(Debug, Clone, PartialEq)]
pub enum YearOutcome {
    /// The city made it through the year.
    Advanced(YearRecord),
    /// The roster is empty. The driver should stop advancing this run.
    Extinct(YearRecord),
}

impl YearOutcome {
    pub fn record(&self) -> &YearRecord {
        match self {
            YearOutcome::Advanced(r) | YearOutcome::Extinct(r) => r,
        }
    }

    pub fn into_record(self) -> YearRecord {
        match self {
            YearOutcome::Advanced(r) | YearOutcome::Extinct(r) => r,
        }
    }

    pub fn is_extinct(&self) -> bool {
        matches!(self, YearOutcome::Extinct(_))
    }
}

// ============================================================================
// Run History
// ============================================================================

/// Append-only per-year series kept by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// Unrounded Gini of each non-extinct year.
    pub inequality: Vec<f64>,
    /// Post-distribution population of each non-extinct year.
    pub population: Vec<usize>,
}

impl History {
    pub(crate) fn push(&mut self, inequality: f64, population: usize) {
        self.inequality.push(inequality);
        self.population.push(population);
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }
}

/// End-of-run snapshot for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct RunReport {
    pub name: String,
    pub final_productivity: f64,
    pub inequality_series: Vec<f64>,
    pub population_series: Vec<usize>,
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extinction_record_shape() {
        let r = YearRecord::extinction(7);
        assert_eq!(r.year, 7);
        assert_eq!(r.population, 0);
        assert_eq!(r.inequality, None);
        assert_eq!(r.morale, 0.0);
        assert_eq!(r.output, 0.0);
    }

    #[test]
    fn extinction_serializes_null_inequality() {
        let json = serde_json::to_value(YearRecord::extinction(3)).unwrap();
        assert!(json["inequality"].is_null());
        assert_eq!(json["population"], 0);
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.123_456, 3), 0.123);
        assert_eq!(round_to(49.996, 2), 50.0);
        assert_eq!(round_to(12.344, 2), 12.34);
    }
}
