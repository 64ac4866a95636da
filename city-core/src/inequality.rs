/// Discrete Gini coefficient of a wealth roster.
///
/// `G = 2 * sum(i * w_i) / (n * sum(w)) - (n + 1) / n` over the roster sorted
/// ascending with 1-indexed positions. 0 is perfect equality. An empty roster
/// or one whose total is zero is treated as perfectly equal.
///
/// The result is clamped to [0, 1], and a roster of equal values is exactly 0.
///
/// Recomputed from scratch each call; the roster changes every year.
pub fn gini(wealth: &[f64]) -> f64 {
    if wealth.is_empty() {
        return 0.0;
    }

    let mut sorted = wealth.to_vec();
    sorted.sort_by(f64::total_cmp);

    if sorted.first() == sorted.last() {
        return 0.0;
    }

    let n = sorted.len() as f64;
    let total: f64 = sorted.iter().sum();
    if total == 0.0 {
        return 0.0;
    }

    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, w)| (i + 1) as f64 * w)
        .sum();

    // Cancellation can leave the raw value a few ulps outside [0, 1].
    (2.0 * weighted / (n * total) - (n + 1.0) / n).clamp(0.0, 1.0)
}

/// Mean of a roster, 0 when empty.
pub fn mean_wealth(wealth: &[f64]) -> f64 {
    if wealth.is_empty() {
        return 0.0;
    }
    wealth.iter().sum::<f64>() / wealth.len() as f64
}
