//! Resource-ceiling configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_REPLICATES, DEFAULT_MAX_TRIALS};

/// Configuration for the simulation resource ceilings.
///
/// These are the only safeguard against oversized work: the parameter
/// validator rejects any cost-bounding parameter above them before a
/// simulation allocates anything.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum Monte Carlo trials per simulation. Default: 2,000,000.
    pub max_trials: Option<u64>,
    /// Maximum CLT replicates per run. Default: 10,000.
    pub max_replicates: Option<u64>,
}

impl LimitsConfig {
    /// Returns the effective trial ceiling, defaulting to 2,000,000.
    pub fn effective_max_trials(&self) -> u64 {
        self.max_trials.unwrap_or(DEFAULT_MAX_TRIALS)
    }

    /// Returns the effective replicate ceiling, defaulting to 10,000.
    pub fn effective_max_replicates(&self) -> u64 {
        self.max_replicates.unwrap_or(DEFAULT_MAX_REPLICATES)
    }
}

/// Resolved ceiling snapshot injected into each simulation instance.
///
/// Copied out of [`LimitsConfig`] once at construction and treated as an
/// immutable input at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimLimits {
    pub max_trials: u64,
    pub max_replicates: u64,
}

impl Default for SimLimits {
    fn default() -> Self {
        Self {
            max_trials: DEFAULT_MAX_TRIALS,
            max_replicates: DEFAULT_MAX_REPLICATES,
        }
    }
}

impl From<&LimitsConfig> for SimLimits {
    fn from(config: &LimitsConfig) -> Self {
        Self {
            max_trials: config.effective_max_trials(),
            max_replicates: config.effective_max_replicates(),
        }
    }
}
