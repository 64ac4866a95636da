//! Maps a macroscopic population target onto the individual wealth roster.
//!
//! Only whole entries are added or removed; surviving wealth values are never
//! rescaled.

use std::cmp::Ordering;

use rand::Rng;

use crate::inequality::mean_wealth;
use crate::shock::wealth_shock;

/// Minimum wealth an arriving individual starts with.
pub const IMMIGRANT_FLOOR: f64 = 5.0;

/// Keeps the vulnerability score finite for zero-wealth individuals.
pub const VULNERABILITY_OFFSET: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub before: usize,
    pub after: usize,
    pub added: usize,
    pub removed: usize,
}

/// Grow or shrink `wealth` to exactly `target` entries.
///
/// - Growth: newcomers arrive with `max(5, mean * LogNormal(0, 0.3))`.
/// - Shrinkage: each individual scores `U(0,1) / (w + 0.1)`; the highest
///   scores leave. Poorer individuals are more likely to go, but the cut is
///   stochastic rather than strictly poorest-first.
/// - An empty roster stays empty regardless of target.
pub fn reconcile<R: Rng>(wealth: &mut Vec<f64>, target: usize, rng: &mut R) -> Reconciliation {
    let before = wealth.len();
    if before == 0 || target == before {
        return Reconciliation {
            before,
            after: before,
            added: 0,
            removed: 0,
        };
    }

    if target > before {
        admit(wealth, target - before, rng);
    } else {
        attrit(wealth, before - target, rng);
    }

    let after = wealth.len();
    Reconciliation {
        before,
        after,
        added: after.saturating_sub(before),
        removed: before.saturating_sub(after),
    }
}

fn admit<R: Rng>(wealth: &mut Vec<f64>, count: usize, rng: &mut R) {
    let avg = mean_wealth(wealth);
    wealth.reserve(count);
    for _ in 0..count {
        let arrival = avg * wealth_shock(rng);
        wealth.push(arrival.max(IMMIGRANT_FLOOR));
    }
}

fn attrit<R: Rng>(wealth: &mut Vec<f64>, count: usize, rng: &mut R) {
    if count >= wealth.len() {
        wealth.clear();
        return;
    }

    let mut scored: Vec<(f64, f64)> = wealth
        .iter()
        .map(|&w| (w, rng.random::<f64>() / (w + VULNERABILITY_OFFSET)))
        .collect();
    // Most vulnerable first; stable so ties keep roster order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    *wealth = scored.into_iter().skip(count).map(|(w, _)| w).collect();
}
