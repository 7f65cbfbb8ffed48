//! The statsim simulation engine.
//!
//! Five statistical simulations plus a coin-flip demonstrator, each a
//! stateless, per-invocation computation behind the common
//! [`Simulation`] contract: validate parameters eagerly, draw from an
//! exclusively owned seedable RNG, and assemble a `{meta, series,
//! metrics}` [`ResultEnvelope`](statsim_core::ResultEnvelope).
//!
//! The external dispatcher goes through [`registry::run_simulation`];
//! everything else here is library surface for embedding individual
//! simulations directly.

pub mod catalog;
pub mod registry;
pub mod rng;
pub mod simulations;
pub mod stats;

pub use registry::run_simulation;
pub use rng::SimRng;
pub use simulations::Simulation;
