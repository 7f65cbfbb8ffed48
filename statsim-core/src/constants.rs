//! Shared constants for the statsim simulation engine.

/// statsim version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default ceiling on Monte Carlo trials per simulation.
pub const DEFAULT_MAX_TRIALS: u64 = 2_000_000;

/// Default ceiling on CLT replicates (sample means generated per run).
pub const DEFAULT_MAX_REPLICATES: u64 = 10_000;

/// Upper bound on CLT sample size (draws per replicate).
pub const CLT_MAX_SAMPLE_SIZE: u64 = 1_000;

/// Cumulative-trial cadence for running-estimate checkpoints.
pub const CHECKPOINT_INTERVAL: u64 = 1_000;

/// Running-estimate checkpoints retained in the output series.
pub const RUNNING_ESTIMATES_KEPT: usize = 50;

/// Sample points retained for scatter-plot output.
pub const SAMPLE_POINTS_KEPT: usize = 100;

/// Sample points are only collected when the first batch has at most
/// this many trials.
pub const SAMPLE_POINTS_MAX_BATCH: u64 = 1_000;

/// Default batch size cap for the pi estimation loop.
pub const PI_DEFAULT_BATCH_SIZE: u64 = 100_000;

/// Bins in the CLT sample-mean density histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Points on the theoretical normal overlay curve.
pub const NORMAL_CURVE_POINTS: usize = 100;

/// Points on the null/alternative density curves of the hypothesis tests.
pub const DENSITY_CURVE_POINTS: usize = 200;

/// Sample means retained in the CLT output series.
pub const SAMPLE_MEANS_KEPT: usize = 1_000;

/// Largest replicate count tested with Shapiro-Wilk; above it the CLT
/// sampler switches to Kolmogorov-Smirnov. Fixed constant carried over
/// from the original service; changing it silently changes verdicts.
pub const NORMALITY_SHAPIRO_MAX_N: usize = 5_000;

/// Cutoff on the normality-test p-value for the "is normal" verdict.
pub const NORMALITY_ALPHA: f64 = 0.05;

/// Distinct draw sequences retained in the bag-draw output series.
pub const TOP_SEQUENCES_KEPT: usize = 10;

/// Floor under the variance term of the z-test standard error.
pub const SE_EPSILON: f64 = 1e-12;
