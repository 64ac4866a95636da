use rand::Rng;

use crate::shock::wealth_shock;

/// Gross urban output `A * n^beta`.
pub fn gross_output(population: usize, productivity: f64, beta: f64) -> f64 {
    productivity * (population as f64).powf(beta)
}

/// Result of one production & distribution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    /// Gross output before tax, reported to the caller.
    pub gross_output: f64,
    /// Output left to the population after tax.
    pub net_output: f64,
    /// Average per-capita share before shocks.
    pub share: f64,
}

/// Produce output with the current roster as labor force and hand the
/// after-tax share back to each individual, scaled by an independent
/// log-normal shock.
///
/// An empty roster produces nothing and is left untouched.
pub fn produce_and_distribute<R: Rng>(
    wealth: &mut [f64],
    productivity: f64,
    beta: f64,
    tax_rate: f64,
    rng: &mut R,
) -> Distribution {
    if wealth.is_empty() {
        return Distribution {
            gross_output: 0.0,
            net_output: 0.0,
            share: 0.0,
        };
    }

    let gross = gross_output(wealth.len(), productivity, beta);
    let net = gross * (1.0 - tax_rate);
    let share = net / wealth.len() as f64;

    for w in wealth.iter_mut() {
        *w += share * wealth_shock(rng);
    }

    Distribution {
        gross_output: gross,
        net_output: net,
        share,
    }
}
