//! Property-based tests for mathematical invariants of the engine.
//!
//! Uses proptest to fuzz-verify:
//!   - pi estimation count/proportion identities
//!   - p-values and powers staying inside [0, 1]
//!   - bag-draw frequency normalization
//!   - seeded purity across the registry

use proptest::prelude::*;
use serde_json::json;

use statsim_core::{SimLimits, SimulationParams};
use statsim_engine::registry::run_simulation;
use statsim_engine::stats::{noncentral_t_cdf, sample_std};

fn params(value: serde_json::Value) -> SimulationParams {
    SimulationParams::from_value(value).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Inside count and proportion are always consistent with the
    /// requested trial count.
    #[test]
    fn prop_pi_counts_partition_trials(trials in 1u64..5_000, seed in any::<u64>()) {
        let envelope = run_simulation(
            "pi_darts",
            &params(json!({"trials": trials, "seed": seed})),
            SimLimits::default(),
        ).unwrap();
        let inside = envelope.metrics["points_inside"].as_u64().unwrap();
        let total = envelope.metrics["points_total"].as_u64().unwrap();
        prop_assert_eq!(total, trials);
        prop_assert!(inside <= total);
        let proportion = envelope.metrics["proportion_inside"].as_f64().unwrap();
        prop_assert!((0.0..=1.0).contains(&proportion));
        let estimate = envelope.metrics["pi_estimate"].as_f64().unwrap();
        prop_assert!((0.0..=4.0).contains(&estimate));
    }

    /// The z-test's p-value and power stay in [0, 1] across the whole
    /// valid parameter domain.
    #[test]
    fn prop_z_test_probabilities_bounded(
        successes in 0u64..=200,
        extra in 0u64..200,
        p0_milli in 1u64..1000,
        alt_index in 0usize..3,
    ) {
        let n = successes + extra.max(1);
        let p0 = p0_milli as f64 / 1000.0;
        let alternative = ["two-sided", "greater", "less"][alt_index];
        let envelope = run_simulation(
            "z_test_proportion",
            &params(json!({
                "successes": successes,
                "n": n,
                "p0": p0,
                "alternative": alternative,
            })),
            SimLimits::default(),
        ).unwrap();
        let p_value = envelope.metrics["p_value"].as_f64().unwrap();
        prop_assert!((0.0..=1.0 + 1e-9).contains(&p_value));
        let power = envelope.metrics["power"].as_f64().unwrap();
        prop_assert!((-1e-9..=1.0 + 1e-9).contains(&power));
        let ci = &envelope.metrics["confidence_interval"];
        prop_assert!(ci["lower"].as_f64().unwrap() >= 0.0);
        prop_assert!(ci["upper"].as_f64().unwrap() <= 1.0);
    }

    /// t-test p-values are bounded and the CI always brackets the
    /// sample mean.
    #[test]
    fn prop_t_test_ci_brackets_mean(
        data in prop::collection::vec(-100.0f64..100.0, 2..50),
        mu0 in -50.0f64..50.0,
    ) {
        // Skip degenerate zero-spread samples: t pins to ±inf there.
        prop_assume!(sample_std(&data) > 1e-9);
        let mean: f64 = data.iter().sum::<f64>() / data.len() as f64;
        let envelope = run_simulation(
            "t_test_one_sample",
            &params(json!({"data": data, "mu0": mu0})),
            SimLimits::default(),
        ).unwrap();
        let p_value = envelope.metrics["p_value"].as_f64().unwrap();
        prop_assert!((0.0..=1.0 + 1e-9).contains(&p_value));
        let ci = &envelope.metrics["confidence_interval"];
        let lower = ci["lower"].as_f64().unwrap();
        let upper = ci["upper"].as_f64().unwrap();
        prop_assert!(lower <= mean + 1e-4 && mean - 1e-4 <= upper);
    }

    /// First-draw empirical frequencies always sum to 1 over the
    /// observed colors.
    #[test]
    fn prop_bag_draw_first_draw_normalized(
        red in 1u64..10,
        blue in 1u64..10,
        green in 0u64..10,
        replacement in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let envelope = run_simulation(
            "bag_draw",
            &params(json!({
                "colors": {"red": red, "blue": blue, "green": green},
                "draws": 2,
                "replacement": replacement,
                "trials": 500,
                "seed": seed,
            })),
            SimLimits::default(),
        ).unwrap();
        let empirical = envelope.metrics["first_draw_probabilities"]["empirical"]
            .as_object()
            .unwrap();
        let sum: f64 = empirical.values().map(|v| v.as_f64().unwrap()).sum();
        // Rounded to 4 decimals per color, so allow a small slack.
        prop_assert!((sum - 1.0).abs() < 1e-2);
    }

    /// Running any seeded simulation twice yields identical metrics.
    #[test]
    fn prop_seeded_runs_are_pure(seed in any::<u64>()) {
        for (id, request) in [
            ("pi_darts", json!({"trials": 2_000, "seed": seed})),
            ("clt", json!({"num_samples": 100, "seed": seed})),
            ("bag_draw", json!({"trials": 500, "seed": seed})),
            ("coin_flip", json!({"num_flips": 2_000, "seed": seed})),
        ] {
            let first = run_simulation(id, &params(request.clone()), SimLimits::default()).unwrap();
            let second = run_simulation(id, &params(request), SimLimits::default()).unwrap();
            prop_assert_eq!(
                serde_json::to_string(&first.metrics).unwrap(),
                serde_json::to_string(&second.metrics).unwrap()
            );
        }
    }

    /// The noncentral-t CDF is a proper CDF: bounded and monotone in t.
    #[test]
    fn prop_noncentral_t_cdf_bounded_monotone(
        df in 1.0f64..200.0,
        delta in -5.0f64..5.0,
        t_lo in -10.0f64..10.0,
        step in 0.01f64..5.0,
    ) {
        let lo = noncentral_t_cdf(t_lo, df, delta);
        let hi = noncentral_t_cdf(t_lo + step, df, delta);
        prop_assert!((0.0..=1.0).contains(&lo));
        prop_assert!((0.0..=1.0).contains(&hi));
        prop_assert!(hi >= lo - 1e-9);
    }
}
