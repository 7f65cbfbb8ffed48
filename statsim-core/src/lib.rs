//! Core types, errors, config, tracing, and constants for the statsim
//! simulation engine.
//!
//! Nothing in this crate runs a simulation. It defines the boundary
//! contract every simulation speaks: the parameter bag coming in, the
//! result envelope going out, the error taxonomy in between, and the
//! externally supplied resource ceilings.

pub mod config;
pub mod constants;
pub mod envelope;
pub mod errors;
pub mod params;
pub mod tracing;

pub use config::{LimitsConfig, SimLimits, StatsimConfig};
pub use envelope::ResultEnvelope;
pub use errors::{ConfigError, SimulationError, StatsimErrorCode};
pub use params::SimulationParams;
