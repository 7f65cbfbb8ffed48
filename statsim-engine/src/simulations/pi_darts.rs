//! Pi estimation by Monte Carlo darts.
//!
//! Random points in the unit square; the fraction landing inside the
//! inscribed quarter circle approximates π/4, so π ≈ 4 · inside/total.

use serde_json::{json, Map, Value};
use tracing::debug;

use statsim_core::constants::{
    CHECKPOINT_INTERVAL, PI_DEFAULT_BATCH_SIZE, RUNNING_ESTIMATES_KEPT, SAMPLE_POINTS_KEPT,
    SAMPLE_POINTS_MAX_BATCH,
};
use statsim_core::params::ensure_range_u64;
use statsim_core::{ResultEnvelope, SimLimits, SimulationError, SimulationParams};

use super::{round4, round6, Simulation};
use crate::rng::SimRng;

/// Monte Carlo π estimator.
///
/// Processes trials in batches so arbitrarily large runs keep a bounded
/// working set, records running estimates at the checkpoint cadence,
/// and keeps a small sample of points for scatter plotting.
pub struct PiDartsSimulation {
    rng: SimRng,
    seed: Option<u64>,
    limits: SimLimits,
}

impl PiDartsSimulation {
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
}

impl Simulation for PiDartsSimulation {
    fn run(&mut self, params: &SimulationParams) -> Result<ResultEnvelope, SimulationError> {
        let trials = params.u64_or("trials", 10_000)?;
        ensure_range_u64("trials", trials, 1, self.limits.max_trials)?;

        let batch_size = params.u64_or("batch_size", trials.min(PI_DEFAULT_BATCH_SIZE))?;
        ensure_range_u64("batch_size", batch_size, 1, self.limits.max_trials)?;

        let mut inside_count: u64 = 0;
        let mut running_estimates: Vec<Value> = Vec::new();
        let mut sample_points: Vec<Value> = Vec::new();

        let mut batch_start: u64 = 0;
        while batch_start < trials {
            let batch_end = (batch_start + batch_size).min(trials);
            let batch_trials = batch_end - batch_start;

            // Two independent uniform arrays over [0, 1).
            let xs: Vec<f64> = (0..batch_trials).map(|_| self.rng.uniform()).collect();
            let ys: Vec<f64> = (0..batch_trials).map(|_| self.rng.uniform()).collect();

            let mut batch_inside: u64 = 0;
            for (x, y) in xs.iter().zip(&ys) {
                if x * x + y * y <= 1.0 {
                    batch_inside += 1;
                }
            }
            inside_count += batch_inside;

            // Sample points for visualization come from the first batch
            // only, and only when that batch is small enough to be
            // worth plotting point-by-point.
            if batch_start == 0 && batch_trials <= SAMPLE_POINTS_MAX_BATCH {
                for (x, y) in xs.iter().zip(&ys).take(SAMPLE_POINTS_KEPT) {
                    sample_points.push(json!({
                        "x": x,
                        "y": y,
                        "inside": x * x + y * y <= 1.0,
                    }));
                }
            }

            // Checkpoint trigger kept exactly as shipped: fires on
            // batch ends aligned to the cadence (or the final batch),
            // so unaligned batch sizes can skip interior checkpoints.
            if batch_end % CHECKPOINT_INTERVAL == 0 || batch_end == trials {
                let estimate = 4.0 * inside_count as f64 / batch_end as f64;
                running_estimates.push(json!({
                    "n": batch_end,
                    "estimate": estimate,
                    "error": (estimate - std::f64::consts::PI).abs(),
                }));
            }

            batch_start = batch_end;
        }

        let final_pi = 4.0 * inside_count as f64 / trials as f64;
        let error = (final_pi - std::f64::consts::PI).abs();
        let relative_error = error / std::f64::consts::PI * 100.0;

        // Normal approximation to the inside proportion.
        let p = inside_count as f64 / trials as f64;
        let se = (p * (1.0 - p) / trials as f64).sqrt();
        let ci_lower = 4.0 * (p - 1.96 * se);
        let ci_upper = 4.0 * (p + 1.96 * se);

        debug!(trials, inside_count, estimate = final_pi, "pi estimation finished");

        let keep_from = running_estimates.len().saturating_sub(RUNNING_ESTIMATES_KEPT);
        let running_estimates = running_estimates.split_off(keep_from);

        let mut meta = Map::new();
        meta.insert("simulation".into(), json!("pi_darts"));
        meta.insert("trials".into(), json!(trials));
        meta.insert("seed".into(), json!(self.seed));

        let mut series = Map::new();
        series.insert("running_estimates".into(), Value::Array(running_estimates));
        series.insert("sample_points".into(), Value::Array(sample_points));

        let mut metrics = Map::new();
        metrics.insert("pi_estimate".into(), json!(round6(final_pi)));
        metrics.insert("actual_pi".into(), json!(round6(std::f64::consts::PI)));
        metrics.insert("absolute_error".into(), json!(round6(error)));
        metrics.insert("relative_error_pct".into(), json!(round4(relative_error)));
        metrics.insert("points_inside".into(), json!(inside_count));
        metrics.insert("points_total".into(), json!(trials));
        metrics.insert(
            "proportion_inside".into(),
            json!(round6(inside_count as f64 / trials as f64)),
        );
        metrics.insert(
            "confidence_interval_95".into(),
            json!({
                "lower": round6(ci_lower),
                "upper": round6(ci_upper),
            }),
        );

        Ok(ResultEnvelope::new(meta, Some(series), metrics))
    }
}
