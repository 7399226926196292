//! Evolution configuration.
//!
//! [`EvolutionConfig`] holds every parameter of a run; [`Breeding`] is the
//! per-generation subset that [`Population::advance_generation_with`]
//! consumes.
//!
//! [`Population::advance_generation_with`]: crate::Population::advance_generation_with

use crate::codec::DEFAULT_SYMBOL_COUNT;
use crate::error::{GaError, Result};

/// Configuration for an evolution run.
///
/// # Defaults
///
/// ```
/// use genexpr::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 300);
/// assert_eq!(config.max_generations, 400);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use genexpr::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_goal(42.0)
///     .with_population_size(100)
///     .with_mutation_rate(0.01)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Value the evolved expression should evaluate to.
    pub goal: f64,

    /// Number of chromosomes per generation. Constant across the run.
    pub population_size: usize,

    /// Number of 4-bit symbol windows per genome.
    pub symbol_count: usize,

    /// Generation budget. Exhausting it is a normal, unsolved outcome.
    pub max_generations: usize,

    /// Crossover cut position as a fraction of the genome length.
    ///
    /// Must lie in `[0, 1]`; not clamped, so `validate` rejects bad values.
    pub crossover_rate: f64,

    /// Probability that a selected pair is recombined at all (0.0–1.0).
    ///
    /// When recombination is skipped the first parent is carried into
    /// mutation unchanged.
    pub crossover_probability: f64,

    /// Per-bit flip probability (0.0–1.0).
    pub mutation_rate: f64,

    /// Whether offspring are bred in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature. Results are the same
    /// either way for a given seed.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws one from entropy.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            goal: 22.0,
            population_size: 300,
            symbol_count: DEFAULT_SYMBOL_COUNT,
            max_generations: 400,
            crossover_rate: 0.7,
            crossover_probability: 1.0,
            mutation_rate: 0.05,
            parallel: true,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn with_goal(mut self, goal: f64) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_symbol_count(mut self, n: usize) -> Self {
        self.symbol_count = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover cut fraction. Out-of-range values are kept and
    /// rejected by [`validate`](Self::validate).
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The reference setup: goal 22, 300 chromosomes of 75 symbols,
    /// crossover 0.7, mutation 0.05, 400 generations.
    pub fn reference() -> Self {
        Self::default()
    }

    /// Small population and budget for smoke runs.
    ///
    /// - Population: 50, Generations: 100, Symbols: 20
    pub fn quick() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            symbol_count: 20,
            ..Self::default()
        }
    }

    /// The per-generation breeding parameters.
    pub fn breeding(&self) -> Breeding {
        Breeding {
            crossover_rate: self.crossover_rate,
            crossover_probability: self.crossover_probability,
            mutation_rate: self.mutation_rate,
            parallel: self.parallel,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(GaError::CrossoverRateOutOfRange(self.crossover_rate));
        }
        if self.population_size == 0 {
            return Err(GaError::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if self.max_generations == 0 {
            return Err(GaError::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        if self.symbol_count == 0 {
            return Err(GaError::InvalidConfig(
                "symbol_count must be at least 1".into(),
            ));
        }
        if !self.goal.is_finite() {
            return Err(GaError::InvalidConfig(format!(
                "goal must be finite, got {}",
                self.goal
            )));
        }
        Ok(())
    }
}

/// Operator parameters for one generational step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breeding {
    pub crossover_rate: f64,
    pub crossover_probability: f64,
    pub mutation_rate: f64,
    pub parallel: bool,
}

impl Breeding {
    /// Always recombines; parallel when the feature allows it.
    pub fn new(crossover_rate: f64, mutation_rate: f64) -> Self {
        Self {
            crossover_rate,
            crossover_probability: 1.0,
            mutation_rate,
            parallel: true,
        }
    }

    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
