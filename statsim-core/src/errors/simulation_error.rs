//! Parameter-domain errors raised by simulations.

use super::error_code::{self, StatsimErrorCode};

/// Errors that can occur while validating or running a simulation.
///
/// All variants are value-domain failures: recoverable by the caller by
/// resubmitting corrected parameters, never retried automatically, and
/// never fatal to the process. Numeric degeneracy (zero variance, zero
/// standard error) is handled inside the algorithms and deliberately has
/// no variant here.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("{param} must be between {min} and {max}, got {got}")]
    OutOfRange {
        param: String,
        min: f64,
        max: f64,
        got: f64,
    },

    #[error("Invalid value for {param}: {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Missing parameter {param}: {message}")]
    MissingParameter { param: String, message: String },

    #[error("Unknown distribution: {name}")]
    UnsupportedDistribution { name: String },

    #[error("Alternative must be 'two-sided', 'greater', or 'less', got '{name}'")]
    UnsupportedAlternative { name: String },

    #[error("Bag must contain at least one item")]
    EmptyBag,

    #[error("Cannot draw more items than in bag without replacement ({draws} > {total})")]
    DrawsExceedBag { draws: u64, total: u64 },

    #[error("Unknown simulation: {id}")]
    UnknownSimulation { id: String },
}

impl StatsimErrorCode for SimulationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => error_code::PARAM_OUT_OF_RANGE,
            Self::InvalidParameter { .. } => error_code::INVALID_PARAMETER,
            Self::MissingParameter { .. } => error_code::MISSING_PARAMETER,
            Self::UnsupportedDistribution { .. } => error_code::UNSUPPORTED_DISTRIBUTION,
            Self::UnsupportedAlternative { .. } => error_code::UNSUPPORTED_ALTERNATIVE,
            Self::EmptyBag => error_code::EMPTY_BAG,
            Self::DrawsExceedBag { .. } => error_code::DRAWS_EXCEED_BAG,
            Self::UnknownSimulation { .. } => error_code::UNKNOWN_SIMULATION,
        }
    }
}
