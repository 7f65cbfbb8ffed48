//! Top-level statsim configuration with 3-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{LimitsConfig, SimLimits};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`STATSIM_*`)
/// 2. Project config (`statsim.toml` in the project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StatsimConfig {
    pub limits: LimitsConfig,
}

impl StatsimConfig {
    /// Load configuration with 3-layer resolution.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 2: project config
        let project_config_path = root.join("statsim.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 1 (highest priority): environment variables
        Self::apply_env_overrides(&mut config);

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &StatsimConfig) -> Result<(), ConfigError> {
        if let Some(max_trials) = config.limits.max_trials {
            if max_trials == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "limits.max_trials".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(max_replicates) = config.limits.max_replicates {
            if max_replicates == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "limits.max_replicates".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// The resolved ceilings, ready for injection into simulations.
    pub fn sim_limits(&self) -> SimLimits {
        SimLimits::from(&self.limits)
    }

    fn merge_toml_file(config: &mut StatsimConfig, path: &Path) -> Result<(), ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let parsed: StatsimConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        if parsed.limits.max_trials.is_some() {
            config.limits.max_trials = parsed.limits.max_trials;
        }
        if parsed.limits.max_replicates.is_some() {
            config.limits.max_replicates = parsed.limits.max_replicates;
        }
        Ok(())
    }

    fn apply_env_overrides(config: &mut StatsimConfig) {
        if let Ok(val) = std::env::var("STATSIM_MAX_TRIALS") {
            if let Ok(v) = val.parse::<u64>() {
                config.limits.max_trials = Some(v);
            }
        }
        if let Ok(val) = std::env::var("STATSIM_MAX_REPLICATES") {
            if let Ok(v) = val.parse::<u64>() {
                config.limits.max_replicates = Some(v);
            }
        }
    }
}
