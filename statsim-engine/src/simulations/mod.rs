//! The simulation variants and their common contract.
//!
//! Each variant composes the shared pieces (parameter bag, validator,
//! `SimRng`, stats helpers) rather than inheriting them; `run`
//! validates eagerly, computes, and assembles the envelope in one pass.

pub mod bag_draw;
pub mod clt;
pub mod coin_flip;
pub mod one_sample_t;
pub mod pi_darts;
pub mod proportion_z;

pub use bag_draw::BagDrawSimulation;
pub use clt::CltSimulation;
pub use coin_flip::CoinFlipSimulation;
pub use one_sample_t::OneSampleTTestSimulation;
pub use pi_darts::PiDartsSimulation;
pub use proportion_z::ProportionZTestSimulation;

use statsim_core::{ResultEnvelope, SimulationError, SimulationParams};

/// Common contract implemented by every simulation variant.
///
/// `run` is a pure, synchronous computation over locally allocated
/// state: the only mutation is the variant's own RNG advancing, so a
/// fresh instance with the same seed and parameters produces a
/// bit-identical envelope.
pub trait Simulation {
    /// Validate `params`, run the computation, and assemble the result.
    fn run(&mut self, params: &SimulationParams) -> Result<ResultEnvelope, SimulationError>;
}

/// Direction of the alternative hypothesis in the two test simulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alternative {
    TwoSided,
    Greater,
    Less,
}

impl Alternative {
    /// Parse the wire name; anything unrecognized is a domain error.
    pub fn parse(name: &str) -> Result<Self, SimulationError> {
        match name {
            "two-sided" => Ok(Self::TwoSided),
            "greater" => Ok(Self::Greater),
            "less" => Ok(Self::Less),
            other => Err(SimulationError::UnsupportedAlternative {
                name: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoSided => "two-sided",
            Self::Greater => "greater",
            Self::Less => "less",
        }
    }
}

/// Round to `places` decimal places. Non-finite values pass through
/// untouched (they serialize as JSON null).
pub(crate) fn round_to(x: f64, places: i32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let factor = 10f64.powi(places);
    (x * factor).round() / factor
}

pub(crate) fn round6(x: f64) -> f64 {
    round_to(x, 6)
}

pub(crate) fn round4(x: f64) -> f64 {
    round_to(x, 4)
}

pub(crate) fn round2(x: f64) -> f64 {
    round_to(x, 2)
}

pub(crate) fn round1(x: f64) -> f64 {
    round_to(x, 1)
}

/// Confidence-level label, e.g. "95%" for alpha = 0.05.
pub(crate) fn confidence_level_label(alpha: f64) -> String {
    format!("{:.0}%", (1.0 - alpha) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternative_parse() {
        assert_eq!(Alternative::parse("two-sided").unwrap(), Alternative::TwoSided);
        assert_eq!(Alternative::parse("greater").unwrap(), Alternative::Greater);
        assert_eq!(Alternative::parse("less").unwrap(), Alternative::Less);
        assert!(matches!(
            Alternative::parse("both"),
            Err(SimulationError::UnsupportedAlternative { .. })
        ));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round6(std::f64::consts::PI), 3.141593);
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round2(49.999), 50.0);
        assert!(round6(f64::INFINITY).is_infinite());
    }

    #[test]
    fn test_confidence_level_label() {
        assert_eq!(confidence_level_label(0.05), "95%");
        assert_eq!(confidence_level_label(0.01), "99%");
    }
}
