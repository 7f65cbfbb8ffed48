//! Static catalog of the available simulations.
//!
//! Descriptive metadata for the dispatcher's listing endpoint. Unlock
//! state and per-user progress live with the caller; this is just what
//! the engine can run.

use serde::Serialize;

use crate::registry::SIMULATION_IDS;

/// Metadata describing one runnable simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub difficulty: &'static str,
    pub estimated_minutes: u32,
}

/// Every simulation the engine can run, in catalog order.
pub fn available_simulations() -> &'static [SimulationInfo] {
    &CATALOG
}

static CATALOG: [SimulationInfo; 6] = [
    SimulationInfo {
        id: "coin_flip",
        title: "Coin Flip Probability",
        description: "Explore probability with virtual coin flips",
        category: "Basic Probability",
        difficulty: "Beginner",
        estimated_minutes: 10,
    },
    SimulationInfo {
        id: "bag_draw",
        title: "Drawing From a Bag",
        description: "Draw colored items with or without replacement",
        category: "Basic Probability",
        difficulty: "Beginner",
        estimated_minutes: 10,
    },
    SimulationInfo {
        id: "pi_darts",
        title: "Estimating Pi With Darts",
        description: "Monte Carlo estimation of pi from random points",
        category: "Monte Carlo Methods",
        difficulty: "Intermediate",
        estimated_minutes: 12,
    },
    SimulationInfo {
        id: "clt",
        title: "Central Limit Theorem",
        description: "See how sample means become normal",
        category: "Sampling Distributions",
        difficulty: "Intermediate",
        estimated_minutes: 15,
    },
    SimulationInfo {
        id: "t_test_one_sample",
        title: "One-Sample t-Test",
        description: "Test a sample mean against a hypothesized value",
        category: "Statistical Inference",
        difficulty: "Advanced",
        estimated_minutes: 20,
    },
    SimulationInfo {
        id: "z_test_proportion",
        title: "One-Proportion z-Test",
        description: "Test a sample proportion against a hypothesized value",
        category: "Statistical Inference",
        difficulty: "Advanced",
        estimated_minutes: 20,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_matches_registry() {
        let catalog_ids: Vec<&str> = available_simulations().iter().map(|s| s.id).collect();
        let mut sorted_catalog = catalog_ids.clone();
        sorted_catalog.sort_unstable();
        let mut sorted_registry = SIMULATION_IDS.to_vec();
        sorted_registry.sort_unstable();
        assert_eq!(sorted_catalog, sorted_registry);
    }

    #[test]
    fn test_catalog_entries_are_complete() {
        for info in available_simulations() {
            assert!(!info.title.is_empty());
            assert!(!info.description.is_empty());
            assert!(info.estimated_minutes > 0);
        }
    }

    #[test]
    fn test_catalog_serializes() {
        let json = serde_json::to_value(available_simulations()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 6);
        assert_eq!(json[0]["id"], "coin_flip");
    }
}
