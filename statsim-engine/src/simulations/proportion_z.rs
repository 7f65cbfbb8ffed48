//! One-proportion z-test.
//!
//! Tests whether a sample proportion differs from a hypothesized
//! population proportion: z = (p̂ − p₀) / √(p₀(1−p₀)/n).

use serde_json::{json, Map, Value};
use tracing::debug;

use statsim_core::constants::{DENSITY_CURVE_POINTS, SE_EPSILON};
use statsim_core::{ResultEnvelope, SimulationError, SimulationParams};

use super::{confidence_level_label, round1, round4, round6, Alternative, Simulation};
use crate::stats::{linspace, std_normal_cdf, std_normal_pdf, std_normal_ppf};

/// One-proportion z-test simulation. Purely analytic; the seed is only
/// echoed for the envelope contract.
pub struct ProportionZTestSimulation {
    seed: Option<u64>,
}

impl ProportionZTestSimulation {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }
}

impl Simulation for ProportionZTestSimulation {
    fn run(&mut self, params: &SimulationParams) -> Result<ResultEnvelope, SimulationError> {
        let successes = params.i64_or("successes", 50)?;
        let n = params.u64_or("n", 100)?;
        let p0 = params.f64_or("p0", 0.5)?;
        let alternative = Alternative::parse(params.str_or("alternative", "two-sided")?)?;
        let alpha = params.f64_or("alpha", 0.05)?;

        if n == 0 {
            return Err(SimulationError::InvalidParameter {
                param: "n".to_string(),
                message: "sample size must be positive".to_string(),
            });
        }
        if successes < 0 || successes as u64 > n {
            return Err(SimulationError::OutOfRange {
                param: "successes".to_string(),
                min: 0.0,
                max: n as f64,
                got: successes as f64,
            });
        }
        if p0 <= 0.0 || p0 >= 1.0 || !p0.is_finite() {
            return Err(SimulationError::InvalidParameter {
                param: "p0".to_string(),
                message: "hypothesized proportion must be strictly between 0 and 1".to_string(),
            });
        }

        let successes = successes as u64;
        let n_f = n as f64;
        let p_hat = successes as f64 / n_f;

        // Large-sample validity: np₀ ≥ 10 and n(1−p₀) ≥ 10. Reported,
        // never blocking.
        let expected_successes = n_f * p0;
        let expected_failures = n_f * (1.0 - p0);
        let conditions_met = expected_successes >= 10.0 && expected_failures >= 10.0;

        // Epsilon floor keeps the statistic defined at extreme p₀.
        let se = (p0 * (1.0 - p0) / n_f).max(SE_EPSILON).sqrt();
        let z_stat = (p_hat - p0) / se;

        let (p_value, z_critical, rejection_region) = match alternative {
            Alternative::TwoSided => {
                let p = 2.0 * (1.0 - std_normal_cdf(z_stat.abs()));
                let crit = std_normal_ppf(1.0 - alpha / 2.0);
                (p, crit, format!("|z| > {crit:.3}"))
            }
            Alternative::Greater => {
                let p = 1.0 - std_normal_cdf(z_stat);
                let crit = std_normal_ppf(1.0 - alpha);
                (p, crit, format!("z > {crit:.3}"))
            }
            Alternative::Less => {
                let p = std_normal_cdf(z_stat);
                let crit = std_normal_ppf(alpha);
                (p, crit, format!("z < {crit:.3}"))
            }
        };

        let reject_null = p_value < alpha;

        // Wilson score interval: better small-sample coverage than the
        // Wald interval.
        let z_alpha = std_normal_ppf(1.0 - alpha / 2.0);
        let denominator = 1.0 + z_alpha.powi(2) / n_f;
        let center = (p_hat + z_alpha.powi(2) / (2.0 * n_f)) / denominator;
        let margin = z_alpha
            * (p_hat * (1.0 - p_hat) / n_f + z_alpha.powi(2) / (4.0 * n_f.powi(2))).sqrt()
            / denominator;
        let ci_lower = (center - margin).max(0.0);
        let ci_upper = (center + margin).min(1.0);

        // Cohen's h = 2·(arcsin √p̂ − arcsin √p₀).
        let cohens_h = 2.0 * (p_hat.sqrt().asin() - p0.sqrt().asin());

        // Post-hoc power from the shifted standard normal.
        let power = match alternative {
            Alternative::TwoSided => {
                std_normal_cdf(z_stat.abs() - z_critical)
                    + std_normal_cdf(-z_stat.abs() - z_critical)
            }
            Alternative::Greater => 1.0 - std_normal_cdf(z_critical - z_stat),
            Alternative::Less => std_normal_cdf(z_critical - z_stat),
        };

        debug!(successes, n, z_stat, p_value, reject_null, "one-proportion z-test computed");

        let x_range = linspace(-4.0, 4.0, DENSITY_CURVE_POINTS);
        let null_density: Vec<f64> = x_range.iter().map(|&x| std_normal_pdf(x)).collect();

        let mut meta = Map::new();
        meta.insert("test".into(), json!("one_proportion_z_test"));
        meta.insert("alternative".into(), json!(alternative.as_str()));
        meta.insert("alpha".into(), json!(alpha));
        meta.insert("seed".into(), json!(self.seed));

        let mut series = Map::new();
        series.insert(
            "null_distribution".into(),
            json!({"x": x_range, "y": null_density}),
        );
        series.insert("test_statistic_position".into(), json!(z_stat));
        series.insert(
            "critical_values".into(),
            json!({
                "lower": matches!(alternative, Alternative::TwoSided).then_some(-z_critical),
                "upper": (!matches!(alternative, Alternative::Less)).then_some(z_critical),
            }),
        );

        let mut metrics = Map::new();
        metrics.insert("sample_proportion".into(), json!(round4(p_hat)));
        metrics.insert("hypothesized_proportion".into(), json!(p0));
        metrics.insert("sample_size".into(), json!(n));
        metrics.insert("successes".into(), json!(successes));
        metrics.insert("z_statistic".into(), json!(round4(z_stat)));
        metrics.insert("p_value".into(), json!(round6(p_value)));
        metrics.insert("standard_error".into(), json!(round6(se)));
        metrics.insert(
            "decision".into(),
            json!(if reject_null {
                "Reject null hypothesis"
            } else {
                "Fail to reject null hypothesis"
            }),
        );
        metrics.insert("reject_null".into(), json!(reject_null));
        metrics.insert("rejection_region".into(), json!(rejection_region));
        metrics.insert(
            "confidence_interval".into(),
            json!({
                "level": confidence_level_label(alpha),
                "lower": round4(ci_lower),
                "upper": round4(ci_upper),
            }),
        );
        metrics.insert(
            "effect_size".into(),
            json!({
                "cohens_h": round4(cohens_h),
                "interpretation": interpret_cohens_h(cohens_h.abs()),
            }),
        );
        metrics.insert("power".into(), json!(round4(power)));
        metrics.insert(
            "conditions".into(),
            json!({
                "met": conditions_met,
                "np0": round1(expected_successes),
                "n_1_minus_p0": round1(expected_failures),
                "requirement": "Both should be ≥ 10",
            }),
        );

        Ok(ResultEnvelope::new(meta, Some(series), metrics))
    }
}

/// Qualitative Cohen's h buckets.
fn interpret_cohens_h(h: f64) -> &'static str {
    if h < 0.2 {
        "Small effect"
    } else if h < 0.5 {
        "Medium effect"
    } else if h < 0.8 {
        "Large effect"
    } else {
        "Very large effect"
    }
}
