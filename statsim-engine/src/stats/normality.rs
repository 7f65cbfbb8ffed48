//! Normality tests for the CLT sampler.
//!
//! Shapiro-Wilk follows Royston's AS R94 approximation (valid for
//! 3 ≤ n ≤ 5000); beyond that range the caller switches to the
//! one-sample Kolmogorov-Smirnov test against the theoretical normal,
//! with the asymptotic p-value series.

use super::{std_normal_cdf, std_normal_ppf};

/// Outcome of a normality test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalityOutcome {
    /// The test statistic (W for Shapiro-Wilk, D for KS).
    pub statistic: f64,
    pub p_value: f64,
}

/// Shapiro-Wilk W test.
///
/// Returns `None` when the test is undecidable: fewer than 3 values,
/// more than 5000, or zero spread (W is undefined for a constant
/// sample).
pub fn shapiro_wilk(values: &[f64]) -> Option<NormalityOutcome> {
    let n = values.len();
    if !(3..=5000).contains(&n) {
        return None;
    }

    let mut x = values.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if x[n - 1] - x[0] <= 0.0 || !(x[n - 1] - x[0]).is_finite() {
        return None;
    }

    let n_f = n as f64;

    // Expected standard-normal order statistics (Blom approximation).
    let m: Vec<f64> = (1..=n)
        .map(|i| std_normal_ppf((i as f64 - 0.375) / (n_f + 0.25)))
        .collect();
    let m_sum_sq: f64 = m.iter().map(|v| v * v).sum();

    // Coefficient vector a, antisymmetric like m, with polynomial
    // corrections to the one (n <= 5) or two (n > 5) extreme weights.
    let u = 1.0 / n_f.sqrt();
    let mut a = vec![0.0f64; n];

    if n == 3 {
        a[2] = std::f64::consts::FRAC_1_SQRT_2;
        a[0] = -a[2];
    } else {
        let c_n = m[n - 1] / m_sum_sq.sqrt();
        let a_n = c_n + 0.221157 * u - 0.147981 * u.powi(2) - 2.071190 * u.powi(3)
            + 4.434685 * u.powi(4)
            - 2.706056 * u.powi(5);

        let (phi, interior_lo) = if n > 5 {
            let c_n1 = m[n - 2] / m_sum_sq.sqrt();
            let a_n1 = c_n1 + 0.042981 * u - 0.293762 * u.powi(2) - 1.752461 * u.powi(3)
                + 5.682633 * u.powi(4)
                - 3.582633 * u.powi(5);
            a[n - 2] = a_n1;
            a[1] = -a_n1;
            let phi = (m_sum_sq - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
                / (1.0 - 2.0 * a_n.powi(2) - 2.0 * a_n1.powi(2));
            (phi, 2)
        } else {
            let phi = (m_sum_sq - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * a_n.powi(2));
            (phi, 1)
        };

        a[n - 1] = a_n;
        a[0] = -a_n;
        if phi <= 0.0 || !phi.is_finite() {
            return None;
        }
        let phi_sqrt = phi.sqrt();
        for i in interior_lo..(n - interior_lo) {
            a[i] = m[i] / phi_sqrt;
        }
    }

    // W = (sum a_i x_(i))^2 / SSE
    let x_mean = x.iter().sum::<f64>() / n_f;
    let numerator: f64 = a.iter().zip(&x).map(|(ai, xi)| ai * xi).sum::<f64>().powi(2);
    let sse: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();
    if sse <= 0.0 || !sse.is_finite() {
        return None;
    }
    let w = (numerator / sse).clamp(0.0, 1.0);

    let p_value = shapiro_p_value(w, n).clamp(0.0, 1.0);
    Some(NormalityOutcome {
        statistic: w,
        p_value,
    })
}

/// Royston's normalizing transformation of W to a standard-normal z.
fn shapiro_p_value(w: f64, n: usize) -> f64 {
    let n_f = n as f64;
    if n == 3 {
        // Exact for n = 3.
        let p = (6.0 / std::f64::consts::PI)
            * (w.sqrt().min(1.0).asin() - 0.75f64.sqrt().asin());
        return p.clamp(0.0, 1.0);
    }

    let one_minus_w = (1.0 - w).max(1e-99);
    let z = if n <= 11 {
        let g = -2.273 + 0.459 * n_f;
        let arg = g - one_minus_w.ln();
        if arg <= 0.0 {
            return 0.0;
        }
        let mu = 0.5440 - 0.39978 * n_f + 0.025054 * n_f.powi(2) - 0.0006714 * n_f.powi(3);
        let sigma =
            (1.3822 - 0.77857 * n_f + 0.062767 * n_f.powi(2) - 0.0020322 * n_f.powi(3)).exp();
        (-arg.ln() - mu) / sigma
    } else {
        let y = n_f.ln();
        let mu = -1.5861 - 0.31082 * y - 0.083751 * y.powi(2) + 0.0038915 * y.powi(3);
        let sigma = (-0.4803 - 0.082676 * y + 0.0030302 * y.powi(2)).exp();
        (one_minus_w.ln() - mu) / sigma
    };
    1.0 - std_normal_cdf(z)
}

/// One-sample Kolmogorov-Smirnov test against `Normal(mean, std_dev)`.
///
/// Returns `None` for an empty sample or a degenerate scale.
pub fn ks_normal(values: &[f64], mean: f64, std_dev: f64) -> Option<NormalityOutcome> {
    let n = values.len();
    if n == 0 || std_dev <= 0.0 || !std_dev.is_finite() {
        return None;
    }

    let mut x = values.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n_f = n as f64;
    let mut d: f64 = 0.0;
    for (i, xi) in x.iter().enumerate() {
        let f = std_normal_cdf((xi - mean) / std_dev);
        let d_plus = (i + 1) as f64 / n_f - f;
        let d_minus = f - i as f64 / n_f;
        d = d.max(d_plus).max(d_minus);
    }

    // Asymptotic p-value with the Stephens small-sample correction.
    let sqrt_n = n_f.sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d;
    Some(NormalityOutcome {
        statistic: d,
        p_value: kolmogorov_sf(lambda),
    })
}

/// Survival function of the Kolmogorov distribution,
/// `Q(λ) = 2 Σ (−1)^{k−1} exp(−2 k² λ²)`.
fn kolmogorov_sf(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let mut sum = 0.0;
    let mut sign = 1.0;
    for k in 1..=100 {
        let term = (-2.0 * (k as f64).powi(2) * lambda.powi(2)).exp();
        sum += sign * term;
        sign = -sign;
        if term < 1e-12 {
            break;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}
