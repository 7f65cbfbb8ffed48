//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the statsim tracing/logging system.
///
/// Reads the `STATSIM_LOG` environment variable for per-subsystem log
/// levels. Format: `STATSIM_LOG=statsim_engine=debug,statsim_core=warn`
///
/// Falls back to `statsim=info` if `STATSIM_LOG` is not set or is invalid.
///
/// This function is idempotent — calling it multiple times is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("STATSIM_LOG")
            .unwrap_or_else(|_| EnvFilter::new("statsim=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}
