//! Error handling for statsim.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod simulation_error;

pub use config_error::ConfigError;
pub use error_code::StatsimErrorCode;
pub use simulation_error::SimulationError;
