//! Endogenous productivity growth driven by education investment.

/// Returns on education per unit of investment, before diminishing returns.
pub const EDUCATION_RETURN: f64 = 0.15;

/// Growth factor `g = e * k / sqrt(A)`.
///
/// Higher existing productivity earns a smaller marginal gain from the same
/// investment, which keeps TFP from compounding away at high levels.
/// Non-negative whenever `education_rate` is.
pub fn growth_factor(education_rate: f64, productivity: f64) -> f64 {
    education_rate * EDUCATION_RETURN / productivity.sqrt()
}

/// Next year's productivity, `A * (1 + g)`.
pub fn next_productivity(education_rate: f64, productivity: f64) -> f64 {
    productivity * (1.0 + growth_factor(education_rate, productivity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_investment_no_growth() {
        assert_eq!(next_productivity(0.0, 4.5), 4.5);
    }

    #[test]
    fn reference_step() {
        let a = next_productivity(0.05, 4.5);
        let expected = 4.5 * (1.0 + 0.05 * 0.15 / 4.5f64.sqrt());
        assert!((a - expected).abs() < 1e-12);
    }

    #[test]
    fn returns_diminish_with_productivity() {
        let low = growth_factor(0.1, 1.0);
        let high = growth_factor(0.1, 16.0);
        assert!((low / high - 4.0).abs() < 1e-12);
    }

    #[test]
    fn productivity_is_monotone_under_investment() {
        let mut a = 4.5;
        for _ in 0..500 {
            let next = next_productivity(0.3, a);
            assert!(next >= a);
            a = next;
        }
        assert!(a.is_finite());
    }
}
