//! Subsistence deduction and the survivorship filter.
//!
//! Everyone pays the per-capita cost at the start of the year. Whoever is
//! left with non-positive wealth leaves the roster before production runs,
//! so only survivors form the effective labor force.

/// Outcome of applying subsistence costs to a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurvivalOutcome {
    pub before: usize,
    pub after: usize,
}

impl SurvivalOutcome {
    pub fn deaths(&self) -> usize {
        self.before - self.after
    }

    pub fn is_extinct(&self) -> bool {
        self.after == 0
    }
}

/// Deduct `cost` from every individual and keep only strictly positive
/// remaining wealth. Relative order of survivors is preserved.
pub fn apply_subsistence(wealth: &mut Vec<f64>, cost: f64) -> SurvivalOutcome {
    let before = wealth.len();
    wealth.retain_mut(|w| {
        *w -= cost;
        *w > 0.0
    });
    SurvivalOutcome {
        before,
        after: wealth.len(),
    }
}
