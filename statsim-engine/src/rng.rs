//! Seedable random source owned by a single simulation instance.
//!
//! Every simulation constructs its own `SimRng` from its own seed; no
//! process-wide random state exists anywhere in the engine, so seeded
//! runs reproduce bit-identically and concurrent invocations stay
//! independent.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Binomial, Distribution, Exp};

/// Seedable pseudo-random source with the draw operations the
/// simulations need.
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    /// Create a new source. `Some(seed)` gives a reproducible stream;
    /// `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let inner = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { inner }
    }

    /// Uniform real in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform real in `[low, high)`. Returns `low` when the bounds
    /// coincide.
    #[inline]
    pub fn uniform_range(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.inner.gen_range(low..high)
    }

    /// Bernoulli draw with success probability `p`.
    #[inline]
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// Exponential draw with the given scale (mean). Scale is validated
    /// upstream; a non-positive scale yields a degenerate zero draw.
    #[inline]
    pub fn exponential(&mut self, scale: f64) -> f64 {
        match Exp::new(1.0 / scale) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => 0.0,
        }
    }

    /// Binomial draw: successes in `n` Bernoulli trials at probability
    /// `p`. Parameters are validated upstream; invalid ones yield a
    /// degenerate zero draw.
    #[inline]
    pub fn binomial(&mut self, n: u64, p: f64) -> u64 {
        match Binomial::new(n, p) {
            Ok(dist) => dist.sample(&mut self.inner),
            Err(_) => 0,
        }
    }

    /// Uniform index in `[0, len)`. `len` must be nonzero.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Draw `count` indices from `[0, len)` without replacement via a
    /// partial Fisher-Yates shuffle of `scratch`, which must hold the
    /// values `0..len` in any order on entry. The drawn indices occupy
    /// `scratch[..count]` on return.
    pub fn partial_shuffle(&mut self, scratch: &mut [usize], count: usize) {
        let len = scratch.len();
        debug_assert!(count <= len);
        for i in 0..count.min(len.saturating_sub(1)) {
            let j = self.inner.gen_range(i..len);
            scratch.swap(i, j);
        }
    }
}
