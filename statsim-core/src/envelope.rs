//! The uniform result envelope every simulation returns.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Three-part simulation result.
///
/// `meta` echoes enough of the input to reproduce the run (including the
/// seed when one was supplied), `series` carries chart-ready data and is
/// `null` for simulations with nothing to plot, `metrics` carries scalar
/// and derived statistics and is never empty.
///
/// Constructed once at the end of `run`, immutable afterwards, and
/// serialized directly as the dispatcher's response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub meta: Map<String, Value>,
    pub series: Option<Map<String, Value>>,
    pub metrics: Map<String, Value>,
}

impl ResultEnvelope {
    /// Assemble an envelope from its three parts.
    pub fn new(
        meta: Map<String, Value>,
        series: Option<Map<String, Value>>,
        metrics: Map<String, Value>,
    ) -> Self {
        debug_assert!(!metrics.is_empty(), "metrics must never be empty");
        Self {
            meta,
            series,
            metrics,
        }
    }

    /// The envelope as a plain JSON value with exactly the three
    /// top-level keys `meta`, `series`, `metrics`.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "meta": self.meta,
            "series": self.series,
            "metrics": self.metrics,
        })
    }
}
