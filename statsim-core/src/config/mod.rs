//! Configuration system for statsim.
//! TOML-based, 3-layer resolution: env > project > defaults.

pub mod limits_config;
pub mod statsim_config;

pub use limits_config::{LimitsConfig, SimLimits};
pub use statsim_config::StatsimConfig;
