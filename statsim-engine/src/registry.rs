//! String-keyed dispatch over the simulation variants.
//!
//! The external HTTP dispatcher hands over a simulation id and a raw
//! parameter bag; a fresh variant instance is constructed per call, so
//! no state of any kind survives between invocations.

use tracing::{debug, warn};

use statsim_core::{ResultEnvelope, SimLimits, SimulationError, SimulationParams};

use crate::simulations::{
    BagDrawSimulation, CltSimulation, CoinFlipSimulation, OneSampleTTestSimulation,
    PiDartsSimulation, ProportionZTestSimulation, Simulation,
};

/// Public ids of every registered simulation.
pub const SIMULATION_IDS: [&str; 6] = [
    "pi_darts",
    "clt",
    "t_test_one_sample",
    "z_test_proportion",
    "bag_draw",
    "coin_flip",
];

/// Run the simulation registered under `id`.
///
/// The reproducibility seed rides in the parameter bag (`seed` key);
/// `limits` are the externally supplied ceilings, resolved once by the
/// caller. Every call constructs a fresh variant with its own RNG.
pub fn run_simulation(
    id: &str,
    params: &SimulationParams,
    limits: SimLimits,
) -> Result<ResultEnvelope, SimulationError> {
    let seed = params.seed();
    debug!(simulation = id, seeded = seed.is_some(), "dispatching simulation");

    let result = match id {
        "pi_darts" => PiDartsSimulation::with_limits(seed, limits).run(params),
        "clt" => CltSimulation::with_limits(seed, limits).run(params),
        "t_test_one_sample" => OneSampleTTestSimulation::new(seed).run(params),
        "z_test_proportion" => ProportionZTestSimulation::new(seed).run(params),
        "bag_draw" => BagDrawSimulation::with_limits(seed, limits).run(params),
        "coin_flip" => CoinFlipSimulation::with_limits(seed, limits).run(params),
        other => Err(SimulationError::UnknownSimulation {
            id: other.to_string(),
        }),
    };

    if let Err(ref error) = result {
        warn!(simulation = id, %error, "simulation rejected");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_registered_id_runs_with_defaults() {
        for id in SIMULATION_IDS {
            let params = SimulationParams::from_value(json!({
                "seed": 42,
                // One-sample t has no defaults for its sample.
                "data": [1.0, 2.0, 3.0, 4.0],
            }))
            .unwrap();
            let envelope = run_simulation(id, &params, SimLimits::default())
                .unwrap_or_else(|e| panic!("{id} failed: {e}"));
            assert!(!envelope.metrics.is_empty(), "{id} produced empty metrics");
        }
    }

    #[test]
    fn test_unknown_id_is_a_domain_error() {
        let params = SimulationParams::new();
        let err = run_simulation("roulette", &params, SimLimits::default()).unwrap_err();
        assert!(matches!(err, SimulationError::UnknownSimulation { .. }));
        assert_eq!(err.to_string(), "Unknown simulation: roulette");
    }

    #[test]
    fn test_seed_is_read_from_the_parameter_bag() {
        let params = SimulationParams::from_value(json!({"seed": 7, "trials": 1_000})).unwrap();
        let a = run_simulation("pi_darts", &params, SimLimits::default()).unwrap();
        let b = run_simulation("pi_darts", &params, SimLimits::default()).unwrap();
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(a.meta["seed"].as_u64().unwrap(), 7);
    }

    #[test]
    fn test_limits_are_honored_at_dispatch() {
        let limits = SimLimits {
            max_trials: 100,
            max_replicates: 10,
        };
        let params = SimulationParams::from_value(json!({"trials": 1_000})).unwrap();
        let err = run_simulation("pi_darts", &params, limits).unwrap_err();
        assert!(matches!(err, SimulationError::OutOfRange { .. }));
    }
}
