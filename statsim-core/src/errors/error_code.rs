//! StatsimErrorCode trait for the dispatcher boundary.

/// Trait for converting statsim errors to stable code strings.
/// Every error enum implements this so the external dispatcher can map
/// a failure onto an HTTP 4xx response without parsing messages.
pub trait StatsimErrorCode {
    /// Returns the boundary error code string (e.g., "PARAM_OUT_OF_RANGE").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn dispatch_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants for the dispatcher boundary.
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PARAM_OUT_OF_RANGE: &str = "PARAM_OUT_OF_RANGE";
pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
pub const MISSING_PARAMETER: &str = "MISSING_PARAMETER";
pub const UNSUPPORTED_DISTRIBUTION: &str = "UNSUPPORTED_DISTRIBUTION";
pub const UNSUPPORTED_ALTERNATIVE: &str = "UNSUPPORTED_ALTERNATIVE";
pub const EMPTY_BAG: &str = "EMPTY_BAG";
pub const DRAWS_EXCEED_BAG: &str = "DRAWS_EXCEED_BAG";
pub const UNKNOWN_SIMULATION: &str = "UNKNOWN_SIMULATION";
