//! One-sample t-test.
//!
//! Tests whether a sample mean differs from a hypothesized population
//! mean when the population variance is unknown:
//! t = (x̄ − μ₀) / (s / √n), df = n − 1.

use serde_json::{json, Map, Value};
use statrs::distribution::{Continuous, ContinuousCDF, StudentsT};
use tracing::{debug, warn};

use statsim_core::constants::DENSITY_CURVE_POINTS;
use statsim_core::{ResultEnvelope, SimulationError, SimulationParams};

use super::{confidence_level_label, round4, round6, Alternative, Simulation};
use crate::stats::{linspace, mean, median, noncentral_t_cdf, percentile, sample_std};

/// Sample summary driving the test: computed from raw data or supplied
/// pre-aggregated.
struct SampleSummary {
    n: u64,
    mean: f64,
    std: f64,
    median: Option<f64>,
    q1: Option<f64>,
    q3: Option<f64>,
}

/// One-sample t-test simulation. Draws nothing from an RNG: the data
/// either arrives raw or pre-aggregated, so the seed is only echoed
/// for the envelope contract.
pub struct OneSampleTTestSimulation {
    seed: Option<u64>,
}

impl OneSampleTTestSimulation {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn summarize(params: &SimulationParams) -> Result<SampleSummary, SimulationError> {
        if let Some(data) = params.f64_array("data")? {
            let n = data.len() as u64;
            let sample_mean = mean(&data);
            let sample_std = sample_std(&data);

            let mut sorted = data;
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let q1 = percentile(&sorted, 25.0);
            let q3 = percentile(&sorted, 75.0);

            return Ok(SampleSummary {
                n,
                mean: sample_mean,
                std: sample_std,
                median: Some(median(&sorted)),
                q1: Some(q1),
                q3: Some(q3),
            });
        }

        // Pre-aggregated path: all three summary statistics required.
        let missing = ["sample_mean", "sample_std", "n"]
            .iter()
            .any(|key| !params.contains(key));
        if missing {
            return Err(SimulationError::MissingParameter {
                param: "data".to_string(),
                message: "must provide either 'data' or all of: sample_mean, sample_std, n"
                    .to_string(),
            });
        }

        Ok(SampleSummary {
            n: params.u64_or("n", 0)?,
            mean: params.f64_or("sample_mean", 0.0)?,
            std: params.f64_or("sample_std", 0.0)?,
            median: None,
            q1: None,
            q3: None,
        })
    }
}

impl Simulation for OneSampleTTestSimulation {
    fn run(&mut self, params: &SimulationParams) -> Result<ResultEnvelope, SimulationError> {
        let alpha = params.f64_or("alpha", 0.05)?;
        let mu0 = params.f64_or("mu0", 0.0)?;
        let alternative = Alternative::parse(params.str_or("alternative", "two-sided")?)?;

        let sample = Self::summarize(params)?;
        if sample.n <= 1 {
            return Err(SimulationError::InvalidParameter {
                param: "n".to_string(),
                message: "sample size must be greater than 1".to_string(),
            });
        }
        if sample.std < 0.0 {
            return Err(SimulationError::InvalidParameter {
                param: "sample_std".to_string(),
                message: "standard deviation cannot be negative".to_string(),
            });
        }

        let n = sample.n as f64;
        let df = sample.n - 1;
        let df_f = df as f64;
        let se = sample.std / n.sqrt();

        // Zero standard error (all values identical) keeps the result
        // well-defined rather than erroring.
        let t_stat = if se > 0.0 {
            (sample.mean - mu0) / se
        } else if sample.mean > mu0 {
            warn!("degenerate sample: zero standard error, t pinned to +inf");
            f64::INFINITY
        } else if sample.mean < mu0 {
            warn!("degenerate sample: zero standard error, t pinned to -inf");
            f64::NEG_INFINITY
        } else {
            0.0
        };

        let t_dist = StudentsT::new(0.0, 1.0, df_f).map_err(|_| {
            SimulationError::InvalidParameter {
                param: "n".to_string(),
                message: "degrees of freedom must be positive".to_string(),
            }
        })?;

        let (p_value, t_critical, rejection_region) = match alternative {
            Alternative::TwoSided => {
                let p = if t_stat.is_finite() {
                    2.0 * (1.0 - t_dist.cdf(t_stat.abs()))
                } else {
                    0.0
                };
                let crit = t_dist.inverse_cdf(1.0 - alpha / 2.0);
                (p, crit, format!("|t| > {crit:.3}"))
            }
            Alternative::Greater => {
                let p = if t_stat.is_finite() {
                    1.0 - t_dist.cdf(t_stat)
                } else if t_stat > 0.0 {
                    0.0
                } else {
                    1.0
                };
                let crit = t_dist.inverse_cdf(1.0 - alpha);
                (p, crit, format!("t > {crit:.3}"))
            }
            Alternative::Less => {
                let p = if t_stat.is_finite() {
                    t_dist.cdf(t_stat)
                } else if t_stat < 0.0 {
                    0.0
                } else {
                    1.0
                };
                let crit = t_dist.inverse_cdf(alpha);
                (p, crit, format!("t < {crit:.3}"))
            }
        };

        let reject_null = p_value < alpha;

        // Two-sided confidence interval around the mean, regardless of
        // the test's alternative.
        let t_critical_ci = t_dist.inverse_cdf(1.0 - alpha / 2.0);
        let margin_of_error = t_critical_ci * se;
        let ci_lower = sample.mean - margin_of_error;
        let ci_upper = sample.mean + margin_of_error;

        let cohens_d = if sample.std > 0.0 {
            (sample.mean - mu0) / sample.std
        } else {
            0.0
        };

        // Post-hoc power from the noncentral t at the observed effect.
        let ncp = if se > 0.0 {
            (sample.mean - mu0).abs() / se
        } else {
            0.0
        };
        let power = match alternative {
            Alternative::TwoSided => {
                1.0 - noncentral_t_cdf(t_critical, df_f, ncp)
                    + noncentral_t_cdf(-t_critical, df_f, ncp)
            }
            Alternative::Greater => 1.0 - noncentral_t_cdf(t_critical, df_f, ncp),
            Alternative::Less => noncentral_t_cdf(t_critical, df_f, -ncp),
        };

        debug!(
            n = sample.n,
            t_stat,
            p_value,
            reject_null,
            "one-sample t-test computed"
        );

        // Null and shifted-alternative densities for plotting.
        let x_range = linspace(-4.0, 4.0, DENSITY_CURVE_POINTS);
        let null_density: Vec<f64> = x_range.iter().map(|&x| t_dist.pdf(x)).collect();
        let alt_density: Vec<f64> = x_range
            .iter()
            .map(|&x| {
                let shifted = x - t_stat;
                if shifted.is_finite() {
                    t_dist.pdf(shifted)
                } else {
                    0.0
                }
            })
            .collect();

        let mut meta = Map::new();
        meta.insert("test".into(), json!("one_sample_t_test"));
        meta.insert("alternative".into(), json!(alternative.as_str()));
        meta.insert("alpha".into(), json!(alpha));
        meta.insert("degrees_of_freedom".into(), json!(df));
        meta.insert("seed".into(), json!(self.seed));

        let mut series = Map::new();
        series.insert(
            "null_distribution".into(),
            json!({"x": x_range, "y": null_density}),
        );
        series.insert(
            "alternative_distribution".into(),
            json!({"x": x_range, "y": alt_density}),
        );
        series.insert("test_statistic_position".into(), json!(t_stat));
        series.insert(
            "critical_values".into(),
            json!({
                "lower": matches!(alternative, Alternative::TwoSided).then_some(-t_critical),
                "upper": (!matches!(alternative, Alternative::Less)).then_some(t_critical),
            }),
        );

        let mut metrics = Map::new();
        metrics.insert("sample_mean".into(), json!(round4(sample.mean)));
        metrics.insert("sample_std".into(), json!(round4(sample.std)));
        metrics.insert("sample_size".into(), json!(sample.n));
        metrics.insert("hypothesized_mean".into(), json!(mu0));
        metrics.insert("standard_error".into(), json!(round6(se)));
        metrics.insert("t_statistic".into(), json!(round4(t_stat)));
        metrics.insert("degrees_of_freedom".into(), json!(df));
        metrics.insert("p_value".into(), json!(round6(p_value)));
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
                "margin_of_error": round4(margin_of_error),
            }),
        );
        metrics.insert(
            "effect_size".into(),
            json!({
                "cohens_d": round4(cohens_d),
                "interpretation": interpret_cohens_d(cohens_d.abs()),
            }),
        );
        metrics.insert("power".into(), json!(round4(power)));
        metrics.insert(
            "descriptive_stats".into(),
            json!({
                "median": sample.median.map(round4),
                "q1": sample.q1.map(round4),
                "q3": sample.q3.map(round4),
                "iqr": sample
                    .q1
                    .zip(sample.q3)
                    .map(|(q1, q3)| round4(q3 - q1)),
            }),
        );

        Ok(ResultEnvelope::new(meta, Some(series), metrics))
    }
}

/// Qualitative Cohen's d buckets.
fn interpret_cohens_d(d: f64) -> &'static str {
    if d < 0.2 {
        "Small effect"
    } else if d < 0.5 {
        "Small to medium effect"
    } else if d < 0.8 {
        "Medium to large effect"
    } else {
        "Large effect"
    }
}
