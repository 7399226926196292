//! Genetic-algorithm search for arithmetic expressions.
//!
//! Candidate expressions are encoded as fixed-length bit strings. Each
//! 4-bit window maps to a digit `1`–`9` or one of `+ - * /`; decoding keeps
//! an alternating operand/operator sequence, and evaluation folds it left to
//! right without precedence. A population of such genomes is evolved by
//! roulette-wheel selection, single-point crossover and per-bit mutation
//! until one evaluates exactly to the goal.
//!
//! # Key Types
//!
//! - [`Genome`]: the bit string, with [`codec`] to generate and decode it
//! - [`Chromosome`]: an immutable genome scored against a goal
//! - [`Population`]: one generation, with selection and the generational step
//! - [`Evolution`] / [`EvolutionRunner`]: the generational loop
//! - [`EvolutionConfig`]: run parameters, builder style
//!
//! # Example
//!
//! ```
//! use genexpr::{EvolutionConfig, EvolutionRunner};
//!
//! let config = EvolutionConfig::quick().with_goal(22.0).with_seed(42);
//! let result = EvolutionRunner::run(&config).unwrap();
//! println!("{result}");
//! ```
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod chromosome;
pub mod codec;
mod config;
mod error;
pub mod evaluator;
pub mod operators;
mod population;
pub mod random;
mod runner;
pub mod selection;

pub use chromosome::{fitness, Chromosome, Individual, SOLUTION_FITNESS};
pub use codec::{Genome, Operator, Symbol};
pub use config::{Breeding, EvolutionConfig};
pub use error::{GaError, Result};
pub use population::Population;
pub use runner::{Evolution, EvolutionResult, EvolutionRunner};
