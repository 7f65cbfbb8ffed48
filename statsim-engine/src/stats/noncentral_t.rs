//! Noncentral t-distribution CDF for post-hoc power calculations.
//!
//! Lenth's algorithm (AS 243): a two-term series of regularized
//! incomplete beta functions weighted by Poisson and half-Poisson
//! probabilities. Accurate to ~1e-10 over the parameter ranges the
//! t-test simulation uses.

use statrs::function::beta::beta_reg;
use statrs::function::gamma::ln_gamma;

use super::std_normal_cdf;

const MAX_TERMS: usize = 1_000;
const TOLERANCE: f64 = 1e-12;

/// CDF of the noncentral t distribution with `df` degrees of freedom
/// and noncentrality `delta`, evaluated at `t`.
///
/// `delta = 0` reduces to the central Student-t CDF. Returns NaN for a
/// non-positive `df`.
pub fn noncentral_t_cdf(t: f64, df: f64, delta: f64) -> f64 {
    if df <= 0.0 || t.is_nan() || delta.is_nan() {
        return f64::NAN;
    }
    if t == f64::INFINITY {
        return 1.0;
    }
    if t == f64::NEG_INFINITY {
        return 0.0;
    }
    // Negative t via the symmetry F(t; df, δ) = 1 − F(−t; df, −δ).
    if t < 0.0 {
        return 1.0 - noncentral_t_cdf(-t, df, -delta);
    }

    let t_sq = t * t;
    let x = t_sq / (t_sq + df);
    if x <= 0.0 {
        // t == 0: only the constant term survives.
        return std_normal_cdf(-delta);
    }

    let lambda = delta * delta / 2.0;
    let a0 = 0.5;
    let b = df / 2.0;

    // j = 0 weights: p_0 = e^{-λ}, q_0 = e^{-λ} δ / (√2 Γ(3/2)).
    let mut p_j = (-lambda).exp();
    let mut q_j = (-lambda).exp() * delta / (std::f64::consts::SQRT_2 * (ln_gamma(1.5)).exp());

    let mut series = 0.0;
    for j in 0..MAX_TERMS {
        let j_f = j as f64;
        let term = p_j * beta_reg(a0 + j_f, b, x) + q_j * beta_reg(1.0 + j_f, b, x);
        series += term;

        // The Poisson weights rise until j ≈ λ, then decay; only stop
        // once past the mode.
        if j_f > lambda && term.abs() < TOLERANCE {
            break;
        }

        p_j *= lambda / (j_f + 1.0);
        q_j *= lambda / (j_f + 1.5);
    }

    (std_normal_cdf(-delta) + 0.5 * series).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::{ContinuousCDF, StudentsT};

    #[test]
    fn test_zero_noncentrality_matches_central_t() {
        let dist = StudentsT::new(0.0, 1.0, 4.0).unwrap();
        for t in [-3.0, -1.0, 0.0, 0.5, 2.776, 5.0] {
            let central = dist.cdf(t);
            let noncentral = noncentral_t_cdf(t, 4.0, 0.0);
            assert!(
                (central - noncentral).abs() < 1e-9,
                "t = {t}: central {central} vs noncentral {noncentral}"
            );
        }
    }

    #[test]
    fn test_monotone_in_t() {
        let mut prev = 0.0;
        for i in 0..40 {
            let t = -6.0 + 0.3 * i as f64;
            let f = noncentral_t_cdf(t, 9.0, 1.5);
            assert!(f >= prev - 1e-12, "CDF not monotone at t = {t}");
            prev = f;
        }
    }

    #[test]
    fn test_shifts_with_noncentrality() {
        // Positive δ moves mass right: F(t; δ) < F(t; 0) for moderate t.
        let at_zero = noncentral_t_cdf(1.0, 10.0, 0.0);
        let shifted = noncentral_t_cdf(1.0, 10.0, 2.0);
        assert!(shifted < at_zero);
        // And the median of the shifted distribution is near δ.
        let near_median = noncentral_t_cdf(2.0, 100.0, 2.0);
        assert!((near_median - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(noncentral_t_cdf(f64::INFINITY, 5.0, 1.0), 1.0);
        assert_eq!(noncentral_t_cdf(f64::NEG_INFINITY, 5.0, 1.0), 0.0);
        assert!(noncentral_t_cdf(1.0, 0.0, 0.0).is_nan());
    }
}
