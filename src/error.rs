//! Error types.
//!
//! Only caller mistakes surface as errors. Running out of generations
//! without an exact match is a normal [`EvolutionResult`](crate::EvolutionResult),
//! and degenerate expressions evaluate to ordinary floating-point values.

use thiserror::Error;

/// Errors raised by the genome codec, the genetic operators and the
/// evolution driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaError {
    /// A crossover cut fraction outside `[0, 1]` (or NaN).
    #[error("crossover rate must be within [0, 1], got {0}")]
    CrossoverRateOutOfRange(f64),

    /// A configuration parameter failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A genome string contained something other than `0` or `1`.
    #[error("invalid genome: unexpected {found:?} at position {position}")]
    InvalidGenome { position: usize, found: char },

    /// A digit symbol outside `1..=9`, which no 4-bit window encodes.
    #[error("digit {0} has no symbol code")]
    UnencodableDigit(u8),

    /// Crossover between genomes of different lengths.
    #[error("genome length mismatch: {left} vs {right}")]
    GenomeLengthMismatch { left: usize, right: usize },
}

pub type Result<T> = std::result::Result<T, GaError>;
