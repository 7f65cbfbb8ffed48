//! Structured span field definitions for statsim metrics.
//!
//! These constants define the standard field names used in tracing
//! events across the engine. Using consistent field names enables
//! structured log queries over simulation runs.

/// Registry: public simulation id being dispatched.
pub const SIMULATION_ID: &str = "simulation";

/// Any variant: whether the run was seeded.
pub const SEEDED: &str = "seeded";

/// Monte Carlo variants: trials executed.
pub const TRIALS: &str = "trials";

/// CLT sampler: replicates generated.
pub const NUM_SAMPLES: &str = "num_samples";

/// CLT sampler: draws per replicate.
pub const SAMPLE_SIZE: &str = "sample_size";

/// Test variants: whether the null hypothesis was rejected.
pub const REJECT_NULL: &str = "reject_null";

/// Registry: the domain error a rejected run surfaced.
pub const ERROR: &str = "error";
