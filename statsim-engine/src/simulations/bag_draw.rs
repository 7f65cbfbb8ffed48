//! Bag-draw probability simulator.
//!
//! Repeatedly draws colored items from a bag, with or without
//! replacement, and compares empirical frequencies against theoretical
//! probabilities. The `draws == 2` without-replacement case also gets
//! an exact ordered-pair table from hypergeometric-style arithmetic.

use std::collections::HashMap;

use serde_json::{json, Map, Value};
use tracing::debug;

use statsim_core::constants::TOP_SEQUENCES_KEPT;
use statsim_core::params::ensure_range_u64;
use statsim_core::{ResultEnvelope, SimLimits, SimulationError, SimulationParams};

use super::{round4, Simulation};
use crate::rng::SimRng;

/// Bag-draw simulation.
pub struct BagDrawSimulation {
    rng: SimRng,
    seed: Option<u64>,
    limits: SimLimits,
}

impl BagDrawSimulation {
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

    /// Color labels and counts from the `colors` mapping, falling back
    /// to the default bag.
    fn parse_colors(
        params: &SimulationParams,
    ) -> Result<Vec<(String, u64)>, SimulationError> {
        match params.object("colors")? {
            Some(map) => map
                .iter()
                .map(|(color, value)| {
                    // Integral floats are accepted, like every other
                    // numeric parameter.
                    let count = value
                        .as_u64()
                        .or_else(|| match value.as_f64() {
                            Some(f) if f >= 0.0 && f.fract() == 0.0 => Some(f as u64),
                            _ => None,
                        })
                        .ok_or_else(|| SimulationError::InvalidParameter {
                            param: format!("colors.{color}"),
                            message: "expected a non-negative integer count".to_string(),
                        })?;
                    Ok((color.clone(), count))
                })
                .collect(),
            None => Ok(vec![
                ("red".to_string(), 5),
                ("blue".to_string(), 3),
                ("green".to_string(), 2),
            ]),
        }
    }
}

impl Simulation for BagDrawSimulation {
    fn run(&mut self, params: &SimulationParams) -> Result<ResultEnvelope, SimulationError> {
        let colors = Self::parse_colors(params)?;
        let draws = params.u64_or("draws", 2)?;
        let replacement = params.bool_or("replacement", false)?;
        let trials = params.u64_or("trials", 10_000)?;

        let total_items: u64 = colors.iter().map(|(_, count)| count).sum();
        if colors.is_empty() || total_items == 0 {
            return Err(SimulationError::EmptyBag);
        }
        ensure_range_u64("draws", draws, 1, self.limits.max_trials)?;
        ensure_range_u64("trials", trials, 1, self.limits.max_trials)?;
        if !replacement && draws > total_items {
            return Err(SimulationError::DrawsExceedBag {
                draws,
                total: total_items,
            });
        }

        // Flat bag of color indices.
        let num_colors = colors.len();
        let mut bag: Vec<usize> = Vec::with_capacity(total_items as usize);
        for (index, (_, count)) in colors.iter().enumerate() {
            bag.extend(std::iter::repeat(index).take(*count as usize));
        }

        let draws_usize = draws as usize;
        let mut sequence_counts: HashMap<Vec<usize>, u64> = HashMap::new();
        let mut first_draw_counts = vec![0u64; num_colors];
        let mut position_counts = vec![vec![0u64; num_colors]; draws_usize];

        let mut scratch = bag.clone();
        let mut outcome = vec![0usize; draws_usize];
        for _ in 0..trials {
            if replacement {
                for slot in outcome.iter_mut() {
                    *slot = bag[self.rng.index(bag.len())];
                }
            } else {
                scratch.copy_from_slice(&bag);
                self.rng.partial_shuffle(&mut scratch, draws_usize);
                outcome.copy_from_slice(&scratch[..draws_usize]);
            }

            first_draw_counts[outcome[0]] += 1;
            for (position, &color) in outcome.iter().enumerate() {
                position_counts[position][color] += 1;
            }
            *sequence_counts.entry(outcome.clone()).or_insert(0) += 1;
        }

        let trials_f = trials as f64;
        let color_name = |index: usize| colors[index].0.as_str();

        // Empirical first-draw frequencies, observed colors only.
        let empirical_first: Map<String, Value> = first_draw_counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(index, &count)| {
                (
                    color_name(index).to_string(),
                    json!(round4(count as f64 / trials_f)),
                )
            })
            .collect();

        let theoretical_first: Map<String, Value> = colors
            .iter()
            .map(|(color, count)| {
                (
                    color.clone(),
                    json!(round4(*count as f64 / total_items as f64)),
                )
            })
            .collect();

        let position_probabilities: Vec<Value> = position_counts
            .iter()
            .map(|counts| {
                let probs: Map<String, Value> = counts
                    .iter()
                    .enumerate()
                    .filter(|(_, &count)| count > 0)
                    .map(|(index, &count)| {
                        (color_name(index).to_string(), json!(count as f64 / trials_f))
                    })
                    .collect();
                Value::Object(probs)
            })
            .collect();

        // Rank sequences by frequency; ties break on the label so
        // seeded runs stay bit-identical.
        let format_sequence = |sequence: &[usize]| {
            sequence
                .iter()
                .map(|&index| color_name(index))
                .collect::<Vec<_>>()
                .join(" → ")
        };
        let mut ranked: Vec<(String, u64)> = sequence_counts
            .iter()
            .map(|(sequence, &count)| (format_sequence(sequence), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let top_sequences: Vec<Value> = ranked
            .iter()
            .take(TOP_SEQUENCES_KEPT)
            .map(|(sequence, count)| {
                json!({
                    "sequence": sequence,
                    "count": count,
                    "probability": *count as f64 / trials_f,
                })
            })
            .collect();

        // P(all draws share one color) and P(all colors pairwise
        // distinct); the latter is only meaningful when the bag has at
        // least `draws` distinct colors.
        let distinct = |sequence: &[usize]| {
            let mut seen = vec![false; num_colors];
            let mut count = 0;
            for &color in sequence {
                if !seen[color] {
                    seen[color] = true;
                    count += 1;
                }
            }
            count
        };
        let all_same_count: u64 = sequence_counts
            .iter()
            .filter(|(sequence, _)| distinct(sequence) == 1)
            .map(|(_, &count)| count)
            .sum();
        let p_all_same = all_same_count as f64 / trials_f;

        let p_all_different = if draws_usize <= num_colors {
            let all_different_count: u64 = sequence_counts
                .iter()
                .filter(|(sequence, _)| distinct(sequence) == draws_usize)
                .map(|(_, &count)| count)
                .sum();
            all_different_count as f64 / trials_f
        } else {
            0.0
        };

        // Exact ordered-pair probabilities for two draws without
        // replacement: same color n₁(n₁−1), different n₁n₂, over
        // T(T−1).
        let exact_probabilities = if !replacement && draws == 2 {
            let total_f = total_items as f64;
            let mut exact = Map::new();
            for (first_color, first_count) in &colors {
                for (second_color, second_count) in &colors {
                    let probability = if first_color == second_color {
                        let n1 = *first_count as f64;
                        (n1 / total_f) * ((n1 - 1.0) / (total_f - 1.0))
                    } else {
                        let n1 = *first_count as f64;
                        let n2 = *second_count as f64;
                        (n1 / total_f) * (n2 / (total_f - 1.0))
                    };
                    exact.insert(
                        format!("{first_color} then {second_color}"),
                        json!(round4(probability)),
                    );
                }
            }
            Value::Object(exact)
        } else {
            Value::Null
        };

        debug!(
            trials,
            draws,
            replacement,
            unique_sequences = sequence_counts.len(),
            "bag draw finished"
        );

        let mut meta = Map::new();
        meta.insert(
            "bag_contents".into(),
            Value::Object(
                colors
                    .iter()
                    .map(|(color, count)| (color.clone(), json!(count)))
                    .collect(),
            ),
        );
        meta.insert("simulation".into(), json!("bag_draw"));
        meta.insert("total_items".into(), json!(total_items));
        meta.insert("draws".into(), json!(draws));
        meta.insert("replacement".into(), json!(replacement));
        meta.insert("trials".into(), json!(trials));
        meta.insert("seed".into(), json!(self.seed));

        let mut series = Map::new();
        series.insert(
            "position_probabilities".into(),
            Value::Array(position_probabilities),
        );
        series.insert("top_sequences".into(), Value::Array(top_sequences));

        let mut metrics = Map::new();
        metrics.insert(
            "first_draw_probabilities".into(),
            json!({
                "empirical": empirical_first,
                "theoretical": theoretical_first,
            }),
        );
        metrics.insert(
            "special_events".into(),
            json!({
                "all_same_color": round4(p_all_same),
                "all_different_colors": round4(p_all_different),
            }),
        );
        metrics.insert("exact_probabilities".into(), exact_probabilities);
        metrics.insert(
            "unique_sequences_found".into(),
            json!(sequence_counts.len()),
        );
        metrics.insert(
            "most_likely_sequence".into(),
            match ranked.first() {
                Some((sequence, count)) => json!({
                    "sequence": sequence,
                    "probability": round4(*count as f64 / trials_f),
                }),
                None => json!({"sequence": null, "probability": null}),
            },
        );

        Ok(ResultEnvelope::new(meta, Some(series), metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run_with(params: Value, seed: Option<u64>) -> ResultEnvelope {
        let params = SimulationParams::from_value(params).unwrap();
        BagDrawSimulation::new(seed).run(&params).unwrap()
    }

    #[test]
    fn test_two_item_bag_exhausts_both_orders() {
        let envelope = run_with(
            json!({
                "colors": {"red": 1, "blue": 1},
                "draws": 2,
                "replacement": false,
                "trials": 10_000,
            }),
            Some(42),
        );

        let series = envelope.series.clone().unwrap();
        let top = series["top_sequences"].as_array().unwrap();
        assert_eq!(top.len(), 2);
        for entry in top {
            let sequence = entry["sequence"].as_str().unwrap();
            assert!(sequence == "red → blue" || sequence == "blue → red");
        }

        let special = &envelope.metrics["special_events"];
        assert_eq!(special["all_same_color"].as_f64().unwrap(), 0.0);
        assert_eq!(special["all_different_colors"].as_f64().unwrap(), 1.0);

        let exact = &envelope.metrics["exact_probabilities"];
        assert_eq!(exact["red then blue"].as_f64().unwrap(), 0.5);
        assert_eq!(exact["blue then red"].as_f64().unwrap(), 0.5);
        assert_eq!(exact["red then red"].as_f64().unwrap(), 0.0);
    }

    #[test]
    fn test_default_bag_exact_table() {
        // {red: 5, blue: 3, green: 2}, 2 draws without replacement.
        let envelope = run_with(json!({"trials": 2_000}), Some(1));
        let exact = &envelope.metrics["exact_probabilities"];
        // 5/10 * 4/9
        assert_eq!(exact["red then red"].as_f64().unwrap(), round4(20.0 / 90.0));
        // 5/10 * 3/9
        assert_eq!(exact["red then blue"].as_f64().unwrap(), round4(15.0 / 90.0));
        assert_eq!(envelope.meta["total_items"].as_u64().unwrap(), 10);
    }

    #[test]
    fn test_replacement_disables_exact_table() {
        let envelope = run_with(
            json!({"replacement": true, "trials": 1_000}),
            Some(2),
        );
        assert!(envelope.metrics["exact_probabilities"].is_null());
    }

    #[test]
    fn test_position_probabilities_cover_every_draw() {
        let envelope = run_with(
            json!({"draws": 3, "trials": 5_000}),
            Some(3),
        );
        let series = envelope.series.unwrap();
        let positions = series["position_probabilities"].as_array().unwrap();
        assert_eq!(positions.len(), 3);
        for position in positions {
            let sum: f64 = position
                .as_object()
                .unwrap()
                .values()
                .map(|v| v.as_f64().unwrap())
                .sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empirical_first_draw_tracks_theoretical() {
        let envelope = run_with(json!({"trials": 50_000}), Some(4));
        let probs = &envelope.metrics["first_draw_probabilities"];
        let empirical = probs["empirical"]["red"].as_f64().unwrap();
        let theoretical = probs["theoretical"]["red"].as_f64().unwrap();
        assert_eq!(theoretical, 0.5);
        assert!((empirical - theoretical).abs() < 0.02);
    }

    #[test]
    fn test_all_different_is_zero_when_draws_exceed_palette() {
        let envelope = run_with(
            json!({
                "colors": {"red": 4, "blue": 4},
                "draws": 3,
                "replacement": true,
                "trials": 2_000,
            }),
            Some(5),
        );
        let special = &envelope.metrics["special_events"];
        assert_eq!(special["all_different_colors"].as_f64().unwrap(), 0.0);
        assert!(special["all_same_color"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_overdraw_without_replacement_fails() {
        let params = SimulationParams::from_value(json!({
            "colors": {"red": 2, "blue": 1},
            "draws": 4,
            "replacement": false,
        }))
        .unwrap();
        let err = BagDrawSimulation::new(None).run(&params).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::DrawsExceedBag { draws: 4, total: 3 }
        ));
    }

    #[test]
    fn test_empty_bag_fails() {
        for colors in [json!({}), json!({"red": 0, "blue": 0})] {
            let params =
                SimulationParams::from_value(json!({"colors": colors})).unwrap();
            let err = BagDrawSimulation::new(None).run(&params).unwrap_err();
            assert!(matches!(err, SimulationError::EmptyBag));
        }
    }

    #[test]
    fn test_zero_draws_fails() {
        let params = SimulationParams::from_value(json!({"draws": 0})).unwrap();
        let err = BagDrawSimulation::new(None).run(&params).unwrap_err();
        assert!(matches!(err, SimulationError::OutOfRange { .. }));
    }

    #[test]
    fn test_seeded_determinism() {
        let request = json!({"draws": 2, "trials": 5_000});
        let a = run_with(request.clone(), Some(9));
        let b = run_with(request, Some(9));
        assert_eq!(a.metrics, b.metrics);
    }
}
