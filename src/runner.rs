//! Generational loop.
//!
//! [`Evolution`] drives a seed population forward one generation at a
//! time until an offspring hits the goal exactly or the generation budget
//! runs out. [`EvolutionRunner`] wraps it with configuration, seeding and
//! initial population construction.

use crate::chromosome::Chromosome;
use crate::codec::Genome;
use crate::config::{Breeding, EvolutionConfig};
use crate::error::{GaError, Result};
use crate::population::Population;
use crate::random::{create_rng, entropy_seed};
use rand::Rng;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Outcome of an evolution run.
///
/// Running out of generations is reported here with `solved == false`;
/// it is not an error.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionResult {
    /// Whether an exact solution was found.
    pub solved: bool,

    /// The goal value.
    pub target: f64,

    /// The first exact solution of the final generation.
    pub solution: Option<Chromosome>,

    /// Fittest chromosome of the final population.
    pub best: Option<Chromosome>,

    /// Generational steps executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best fitness of the seed population followed by each generation.
    pub fitness_history: Vec<f64>,

    /// The final population.
    pub population: Population,
}

impl EvolutionResult {
    /// Answer of the solution, if solved.
    pub fn answer(&self) -> Option<f64> {
        self.solution.as_ref().map(Chromosome::answer)
    }

    /// Fitness of the solution, if solved.
    pub fn fitness(&self) -> Option<f64> {
        self.solution.as_ref().map(Chromosome::fitness)
    }

    /// Genome of the solution, if solved.
    pub fn genome(&self) -> Option<&Genome> {
        self.solution.as_ref().map(Chromosome::genome)
    }
}

impl fmt::Display for EvolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.solution {
            Some(solution) => {
                writeln!(
                    f,
                    "Solved {} in {} generations",
                    self.target, self.generations
                )?;
                writeln!(f, "{solution}")?;
                write!(f, "Bits: {}", solution.genome())
            }
            None => {
                write!(
                    f,
                    "No solution for {} after {} generations",
                    self.target, self.generations
                )?;
                if let Some(best) = &self.best {
                    write!(f, "; closest: {} = {}", best.expression(), best.answer())?;
                }
                Ok(())
            }
        }
    }
}

/// Evolves a seed population toward its goal.
///
/// # Usage
///
/// ```
/// use genexpr::{Evolution, Population};
/// use genexpr::random::create_rng;
///
/// let mut rng = create_rng(42);
/// let seed = Population::new_random(22.0, 50, &mut rng);
/// let result = Evolution::new(seed).run(0.7, 0.05, 20, &mut rng).unwrap();
/// assert!(result.solved || result.generations == 20);
/// ```
#[derive(Debug, Clone)]
pub struct Evolution {
    seed: Population,
}

impl Evolution {
    pub fn new(seed: Population) -> Self {
        Self { seed }
    }

    pub fn target(&self) -> f64 {
        self.seed.goal()
    }

    /// Runs up to `max_generations` steps with crossover always applied.
    pub fn run<R: Rng>(
        &self,
        crossover_rate: f64,
        mutation_rate: f64,
        max_generations: usize,
        rng: &mut R,
    ) -> Result<EvolutionResult> {
        self.run_with_cancel(
            &Breeding::new(crossover_rate, mutation_rate),
            max_generations,
            rng,
            None,
        )
    }

    /// Runs with explicit breeding parameters and an optional cancellation
    /// flag, checked once before each generation.
    ///
    /// # Errors
    /// [`GaError::CrossoverRateOutOfRange`] before any generation runs.
    pub fn run_with_cancel<R: Rng>(
        &self,
        breeding: &Breeding,
        max_generations: usize,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult> {
        if !(0.0..=1.0).contains(&breeding.crossover_rate) {
            return Err(GaError::CrossoverRateOutOfRange(breeding.crossover_rate));
        }

        let target = self.target();
        let mut current = self.seed.clone();
        // Caps may be huge when callers rely on cancellation.
        let mut fitness_history = Vec::with_capacity(max_generations.min(1024) + 1);
        fitness_history.push(best_fitness(&current));

        if current.solution().is_some() {
            log::info!("seed population already solves {target}");
            return Ok(finish(target, current, 0, false, fitness_history));
        }

        let mut generations = 0usize;
        let mut cancelled = false;

        while generations < max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            current = current.advance_generation_with(breeding, rng)?;
            generations += 1;

            let best = best_fitness(&current);
            fitness_history.push(best);
            log::debug!(
                "generation {generations}: best fitness {best}, mean fitness {}",
                current.mean_fitness()
            );

            if current.solution().is_some() {
                log::info!("solved {target} after {generations} generations");
                return Ok(finish(target, current, generations, false, fitness_history));
            }
        }

        if cancelled {
            log::info!("cancelled after {generations} generations");
        } else {
            log::info!("no solution for {target} within {max_generations} generations");
        }
        Ok(finish(
            target,
            current,
            generations,
            cancelled,
            fitness_history,
        ))
    }
}

fn best_fitness(population: &Population) -> f64 {
    population.best().map_or(0.0, Chromosome::fitness)
}

fn finish(
    target: f64,
    population: Population,
    generations: usize,
    cancelled: bool,
    fitness_history: Vec<f64>,
) -> EvolutionResult {
    let solution = population.solution().cloned();
    EvolutionResult {
        solved: solution.is_some(),
        target,
        solution,
        best: population.best().cloned(),
        generations,
        cancelled,
        fitness_history,
        population,
    }
}

/// Runs a full evolution from an [`EvolutionConfig`].
///
/// ```
/// use genexpr::{EvolutionConfig, EvolutionRunner};
///
/// let config = EvolutionConfig::quick().with_goal(9.0).with_seed(42);
/// let result = EvolutionRunner::run(&config).unwrap();
/// if result.solved {
///     assert_eq!(result.answer(), Some(9.0));
/// }
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    pub fn run(config: &EvolutionConfig) -> Result<EvolutionResult> {
        Self::run_with_cancel(config, None)
    }

    /// Validates `config`, seeds the generator, builds a random population
    /// and evolves it.
    pub fn run_with_cancel(
        config: &EvolutionConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(entropy_seed);
        log::debug!(
            "evolving toward {} with {} chromosomes, seed {seed}",
            config.goal,
            config.population_size
        );
        let mut rng = create_rng(seed);

        let population = Population::new_random_sized(
            config.goal,
            config.population_size,
            config.symbol_count,
            &mut rng,
        );
        Evolution::new(population).run_with_cancel(
            &config.breeding(),
            config.max_generations,
            &mut rng,
            cancel,
        )
    }
}
