//! Numeric helpers shared by the simulations.
//!
//! Thin statistical routines over `statrs` distributions, with guarded
//! fallbacks so degenerate inputs surface as well-defined values rather
//! than panics.

pub mod descriptive;
pub mod noncentral_t;
pub mod normality;

pub use descriptive::{histogram_density, linspace, mean, median, percentile, sample_std};
pub use noncentral_t::noncentral_t_cdf;
pub use normality::{ks_normal, shapiro_wilk, NormalityOutcome};

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Standard normal CDF.
pub fn std_normal_cdf(x: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.cdf(x),
        Err(_) => f64::NAN,
    }
}

/// Standard normal quantile function.
pub fn std_normal_ppf(p: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Standard normal density.
pub fn std_normal_pdf(x: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.pdf(x),
        Err(_) => f64::NAN,
    }
}

/// Normal density with arbitrary location and scale. Returns 0 when the
/// scale is degenerate.
pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 || !std_dev.is_finite() || !x.is_finite() {
        return 0.0;
    }
    match Normal::new(mean, std_dev) {
        Ok(dist) => dist.pdf(x),
        Err(_) => 0.0,
    }
}
