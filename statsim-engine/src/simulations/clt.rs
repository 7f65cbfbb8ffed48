//! Central Limit Theorem sampler.
//!
//! Draws replicate samples from a chosen source distribution, reduces
//! each to its mean, and compares the sampling distribution of the mean
//! against the normal the theorem predicts.

use serde_json::{json, Map, Value};
use tracing::debug;

use statsim_core::constants::{
    CLT_MAX_SAMPLE_SIZE, HISTOGRAM_BINS, NORMALITY_ALPHA, NORMALITY_SHAPIRO_MAX_N,
    NORMAL_CURVE_POINTS, SAMPLE_MEANS_KEPT,
};
use statsim_core::params::ensure_range_u64;
use statsim_core::{ResultEnvelope, SimLimits, SimulationError, SimulationParams};

use super::{round2, round6, Simulation};
use crate::rng::SimRng;
use crate::stats::{
    histogram_density, ks_normal, linspace, mean, normal_pdf, percentile, sample_std,
    shapiro_wilk, NormalityOutcome,
};

/// Source distribution family for the replicate draws.
enum SourceDistribution {
    Uniform { a: f64, b: f64 },
    Exponential { scale: f64 },
    Binomial { n: u64, p: f64 },
}

impl SourceDistribution {
    /// Closed-form mean of the family.
    fn true_mean(&self) -> f64 {
        match self {
            Self::Uniform { a, b } => (a + b) / 2.0,
            Self::Exponential { scale } => *scale,
            Self::Binomial { n, p } => *n as f64 * p,
        }
    }

    /// Closed-form variance of the family.
    fn true_variance(&self) -> f64 {
        match self {
            Self::Uniform { a, b } => (b - a).powi(2) / 12.0,
            Self::Exponential { scale } => scale * scale,
            Self::Binomial { n, p } => *n as f64 * p * (1.0 - p),
        }
    }

    fn draw(&self, rng: &mut SimRng) -> f64 {
        match self {
            Self::Uniform { a, b } => rng.uniform_range(*a, *b),
            Self::Exponential { scale } => rng.exponential(*scale),
            Self::Binomial { n, p } => rng.binomial(*n, *p) as f64,
        }
    }
}

/// Central Limit Theorem demonstration.
pub struct CltSimulation {
    rng: SimRng,
    seed: Option<u64>,
    limits: SimLimits,
}

impl CltSimulation {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_limits(seed, SimLimits::default())
    }

    pub fn with_limits(seed: Option<u64>, limits: SimLimits) -> Self {
        Self {
            rng: SimRng::new(seed),
            seed,
            limits,
        }
    }

    fn parse_distribution(
        params: &SimulationParams,
    ) -> Result<SourceDistribution, SimulationError> {
        let name = params.str_or("distribution", "uniform")?;
        let dist_params = params.object("dist_params")?;

        let get = |key: &str, default: f64| -> Result<f64, SimulationError> {
            match dist_params.and_then(|m| m.get(key)) {
                None | Some(Value::Null) => Ok(default),
                Some(v) => v.as_f64().ok_or_else(|| SimulationError::InvalidParameter {
                    param: format!("dist_params.{key}"),
                    message: "expected a number".to_string(),
                }),
            }
        };

        match name {
            "uniform" => {
                let a = get("a", 0.0)?;
                let b = get("b", 1.0)?;
                if !(b > a) {
                    return Err(SimulationError::InvalidParameter {
                        param: "dist_params.b".to_string(),
                        message: "upper bound must exceed lower bound a".to_string(),
                    });
                }
                Ok(SourceDistribution::Uniform { a, b })
            }
            "exponential" => {
                let scale = get("scale", 1.0)?;
                if !(scale > 0.0) || !scale.is_finite() {
                    return Err(SimulationError::InvalidParameter {
                        param: "dist_params.scale".to_string(),
                        message: "scale must be positive".to_string(),
                    });
                }
                Ok(SourceDistribution::Exponential { scale })
            }
            "binomial" => {
                let n = get("n", 10.0)?;
                let p = get("p", 0.5)?;
                if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
                    return Err(SimulationError::InvalidParameter {
                        param: "dist_params.n".to_string(),
                        message: "n must be a non-negative integer".to_string(),
                    });
                }
                if !(0.0..=1.0).contains(&p) {
                    return Err(SimulationError::InvalidParameter {
                        param: "dist_params.p".to_string(),
                        message: "p must be between 0 and 1".to_string(),
                    });
                }
                Ok(SourceDistribution::Binomial { n: n as u64, p })
            }
            other => Err(SimulationError::UnsupportedDistribution {
                name: other.to_string(),
            }),
        }
    }
}

impl Simulation for CltSimulation {
    fn run(&mut self, params: &SimulationParams) -> Result<ResultEnvelope, SimulationError> {
        let distribution = Self::parse_distribution(params)?;
        let sample_size = params.u64_or("sample_size", 30)?;
        let num_samples = params.u64_or("num_samples", 1_000)?;

        ensure_range_u64("sample_size", sample_size, 1, CLT_MAX_SAMPLE_SIZE)?;
        ensure_range_u64("num_samples", num_samples, 1, self.limits.max_replicates)?;

        let true_mean = distribution.true_mean();
        let true_var = distribution.true_variance();
        let theoretical_se = (true_var / sample_size as f64).sqrt();

        // One replicate = sample_size draws reduced to a mean.
        let mut sample_means = Vec::with_capacity(num_samples as usize);
        for _ in 0..num_samples {
            let mut sum = 0.0;
            for _ in 0..sample_size {
                sum += distribution.draw(&mut self.rng);
            }
            sample_means.push(sum / sample_size as f64);
        }

        let observed_mean = mean(&sample_means);
        let observed_se = sample_std(&sample_means);

        let normality = if sample_means.len() <= NORMALITY_SHAPIRO_MAX_N {
            shapiro_wilk(&sample_means)
        } else {
            ks_normal(&sample_means, true_mean, theoretical_se)
        };
        debug!(
            num_samples,
            sample_size,
            decided = normality.is_some(),
            "clt normality test done"
        );

        let (densities, bin_edges) = histogram_density(&sample_means, HISTOGRAM_BINS);

        let low = sample_means.iter().cloned().fold(f64::INFINITY, f64::min);
        let high = sample_means
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        let curve_x = linspace(low, high, NORMAL_CURVE_POINTS);
        let curve_y: Vec<f64> = curve_x
            .iter()
            .map(|&x| normal_pdf(x, true_mean, theoretical_se))
            .collect();

        let mut sorted_means = sample_means.clone();
        sorted_means.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let se_error_pct = (observed_se - theoretical_se).abs() / theoretical_se * 100.0;

        let mut meta = Map::new();
        meta.insert("simulation".into(), json!("clt"));
        meta.insert("distribution".into(), json!(params.str_or("distribution", "uniform")?));
        meta.insert("sample_size".into(), json!(sample_size));
        meta.insert("num_samples".into(), json!(num_samples));
        meta.insert(
            "dist_params".into(),
            params
                .object("dist_params")?
                .map(|m| Value::Object(m.clone()))
                .unwrap_or_else(|| json!({})),
        );
        meta.insert("seed".into(), json!(self.seed));

        let mut series = Map::new();
        series.insert(
            "sample_means".into(),
            json!(&sample_means[..sample_means.len().min(SAMPLE_MEANS_KEPT)]),
        );
        series.insert(
            "histogram".into(),
            json!({"counts": densities, "bins": bin_edges}),
        );
        series.insert(
            "normal_curve".into(),
            json!({"x": curve_x, "y": curve_y}),
        );

        let mut metrics = Map::new();
        metrics.insert("theoretical_mean".into(), json!(round6(true_mean)));
        metrics.insert("observed_mean".into(), json!(round6(observed_mean)));
        metrics.insert("theoretical_se".into(), json!(round6(theoretical_se)));
        metrics.insert("observed_se".into(), json!(round6(observed_se)));
        metrics.insert("se_error_pct".into(), json!(round2(se_error_pct)));
        metrics.insert("normality_test".into(), normality_metrics(normality));
        metrics.insert(
            "percentiles".into(),
            json!({
                "25th": round6(percentile(&sorted_means, 25.0)),
                "50th": round6(percentile(&sorted_means, 50.0)),
                "75th": round6(percentile(&sorted_means, 75.0)),
            }),
        );

        Ok(ResultEnvelope::new(meta, Some(series), metrics))
    }
}

/// Normality verdict block; undecidable tests report a null p-value
/// instead of failing the run.
fn normality_metrics(outcome: Option<NormalityOutcome>) -> Value {
    match outcome {
        Some(outcome) => {
            let is_normal = outcome.p_value > NORMALITY_ALPHA;
            let interpretation = if is_normal {
                "Normally distributed"
            } else {
                "Not normally distributed"
            };
            json!({
                "p_value": round6(outcome.p_value),
                "is_normal": is_normal,
                "interpretation": interpretation,
            })
        }
        None => json!({
            "p_value": null,
            "is_normal": null,
            "interpretation": "Insufficient data for normality test",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run_with(params: Value, seed: Option<u64>) -> ResultEnvelope {
        let params = SimulationParams::from_value(params).unwrap();
        CltSimulation::new(seed).run(&params).unwrap()
    }

    #[test]
    fn test_uniform_theoretical_values() {
        let envelope = run_with(
            json!({
                "distribution": "uniform",
                "dist_params": {"a": 0, "b": 10},
                "sample_size": 30,
                "num_samples": 500,
            }),
            Some(42),
        );
        assert_eq!(envelope.metrics["theoretical_mean"].as_f64().unwrap(), 5.0);
        // sqrt((10^2 / 12) / 30) rounded to 6 decimals
        assert_eq!(
            envelope.metrics["theoretical_se"].as_f64().unwrap(),
            0.527046
        );
        let series = envelope.series.unwrap();
        assert_eq!(series["sample_means"].as_array().unwrap().len(), 500);
    }

    #[test]
    fn test_sample_means_series_is_capped() {
        let envelope = run_with(
            json!({"distribution": "uniform", "num_samples": 2000}),
            Some(1),
        );
        let series = envelope.series.unwrap();
        assert_eq!(series["sample_means"].as_array().unwrap().len(), 1000);
    }

    #[test]
    fn test_exponential_moments() {
        let envelope = run_with(
            json!({
                "distribution": "exponential",
                "dist_params": {"scale": 2.0},
                "sample_size": 50,
                "num_samples": 400,
            }),
            Some(3),
        );
        assert_eq!(envelope.metrics["theoretical_mean"].as_f64().unwrap(), 2.0);
        let observed = envelope.metrics["observed_mean"].as_f64().unwrap();
        assert!((observed - 2.0).abs() < 0.2);
    }

    #[test]
    fn test_binomial_moments() {
        let envelope = run_with(
            json!({
                "distribution": "binomial",
                "dist_params": {"n": 10, "p": 0.5},
                "sample_size": 40,
                "num_samples": 300,
            }),
            Some(8),
        );
        assert_eq!(envelope.metrics["theoretical_mean"].as_f64().unwrap(), 5.0);
        // var = 10 * 0.5 * 0.5 = 2.5; se = sqrt(2.5 / 40)
        assert_eq!(
            envelope.metrics["theoretical_se"].as_f64().unwrap(),
            round6((2.5f64 / 40.0).sqrt())
        );
    }

    #[test]
    fn test_unknown_distribution_fails() {
        let params =
            SimulationParams::from_value(json!({"distribution": "cauchy"})).unwrap();
        let err = CltSimulation::new(None).run(&params).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::UnsupportedDistribution { .. }
        ));
    }

    #[test]
    fn test_invalid_uniform_bounds_fail() {
        let params = SimulationParams::from_value(
            json!({"distribution": "uniform", "dist_params": {"a": 5, "b": 5}}),
        )
        .unwrap();
        let err = CltSimulation::new(None).run(&params).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter { .. }));
    }

    #[test]
    fn test_num_samples_ceiling_enforced() {
        let params =
            SimulationParams::from_value(json!({"num_samples": 50_000})).unwrap();
        let err = CltSimulation::new(None).run(&params).unwrap_err();
        assert!(matches!(err, SimulationError::OutOfRange { .. }));
    }

    #[test]
    fn test_histogram_shape() {
        let envelope = run_with(json!({"num_samples": 800}), Some(12));
        let series = envelope.series.unwrap();
        let histogram = &series["histogram"];
        assert_eq!(histogram["counts"].as_array().unwrap().len(), 30);
        assert_eq!(histogram["bins"].as_array().unwrap().len(), 31);
        let curve = &series["normal_curve"];
        assert_eq!(curve["x"].as_array().unwrap().len(), 100);
        assert_eq!(curve["y"].as_array().unwrap().len(), 100);
    }

    #[test]
    fn test_tiny_replicate_count_reports_undecidable_normality() {
        let envelope = run_with(json!({"num_samples": 2}), Some(4));
        let test = &envelope.metrics["normality_test"];
        assert!(test["p_value"].is_null());
        assert!(test["is_normal"].is_null());
    }

    #[test]
    fn test_seeded_determinism() {
        let request = json!({"distribution": "exponential", "num_samples": 200});
        let a = run_with(request.clone(), Some(77));
        let b = run_with(request, Some(77));
        assert_eq!(a.metrics, b.metrics);
    }

    #[test]
    fn test_normality_verdict_present_for_normal_looking_data() {
        let envelope = run_with(
            json!({"distribution": "uniform", "sample_size": 100, "num_samples": 500}),
            Some(42),
        );
        let test = &envelope.metrics["normality_test"];
        let p = test["p_value"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&p));
        assert!(test["is_normal"].is_boolean());
    }
}
