//! Fair-coin flip demonstrator.
//!
//! The introductory probability simulation: flip a fair coin many
//! times, watch the heads proportion settle toward one half. Running
//! proportions are checkpointed for law-of-large-numbers charting.

use serde_json::{json, Map, Value};
use tracing::debug;

use statsim_core::constants::CHECKPOINT_INTERVAL;
use statsim_core::{ResultEnvelope, SimLimits, SimulationParams, SimulationError};

use super::{round2, Simulation};
use crate::rng::SimRng;

/// Coin-flip simulation.
pub struct CoinFlipSimulation {
    rng: SimRng,
    seed: Option<u64>,
    limits: SimLimits,
}

impl CoinFlipSimulation {
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

impl Simulation for CoinFlipSimulation {
    fn run(&mut self, params: &SimulationParams) -> Result<ResultEnvelope, SimulationError> {
        // Clamped rather than rejected: the flip count silently caps at
        // the configured ceiling, the behavior this simulation has
        // always had.
        let num_flips = params.u64_or("num_flips", 100)?.clamp(1, self.limits.max_trials);

        let mut heads: u64 = 0;
        let mut running_proportions: Vec<Value> = Vec::new();
        for flip in 1..=num_flips {
            if self.rng.bernoulli(0.5) {
                heads += 1;
            }
            if flip % CHECKPOINT_INTERVAL == 0 || flip == num_flips {
                running_proportions.push(json!({
                    "n": flip,
                    "proportion_heads": heads as f64 / flip as f64,
                }));
            }
        }

        let tails = num_flips - heads;
        let heads_percentage = heads as f64 / num_flips as f64 * 100.0;
        let deviation = (heads_percentage - 50.0).abs();

        debug!(num_flips, heads, "coin flip finished");

        let mut meta = Map::new();
        meta.insert("simulation".into(), json!("coin_flip"));
        meta.insert("num_flips".into(), json!(num_flips));
        meta.insert("seed".into(), json!(self.seed));

        let mut series = Map::new();
        series.insert(
            "running_proportions".into(),
            Value::Array(running_proportions),
        );

        let mut metrics = Map::new();
        metrics.insert("total_flips".into(), json!(num_flips));
        metrics.insert("heads".into(), json!(heads));
        metrics.insert("tails".into(), json!(tails));
        metrics.insert("heads_percentage".into(), json!(round2(heads_percentage)));
        metrics.insert("expected_percentage".into(), json!(50.0));
        metrics.insert("deviation".into(), json!(round2(deviation)));

        Ok(ResultEnvelope::new(meta, Some(series), metrics))
    }
}
