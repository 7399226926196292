//! Populations and the generational step.

use crate::chromosome::Chromosome;
use crate::codec::DEFAULT_SYMBOL_COUNT;
use crate::config::Breeding;
use crate::error::{GaError, Result};
use crate::random::{create_rng, split_streams};
use crate::selection;
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One generation of chromosomes, all scored against the same goal.
///
/// Populations are never modified after construction; each step produces
/// a new one of the same size.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "PopulationData"))]
pub struct Population {
    goal: f64,
    chromosomes: Vec<Chromosome>,
    generation: usize,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    solution: Option<usize>,
}

/// Serialized form; the solution index is derived on load.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PopulationData {
    goal: f64,
    chromosomes: Vec<Chromosome>,
    generation: usize,
}

#[cfg(feature = "serde")]
impl From<PopulationData> for Population {
    fn from(data: PopulationData) -> Self {
        Self::from_chromosomes(data.goal, data.chromosomes, data.generation)
    }
}

impl Population {
    /// `size` random chromosomes with the default genome length.
    pub fn new_random<R: Rng>(goal: f64, size: usize, rng: &mut R) -> Self {
        Self::new_random_sized(goal, size, DEFAULT_SYMBOL_COUNT, rng)
    }

    /// `size` random chromosomes of `symbol_count` windows each.
    pub fn new_random_sized<R: Rng>(
        goal: f64,
        size: usize,
        symbol_count: usize,
        rng: &mut R,
    ) -> Self {
        let chromosomes = (0..size)
            .map(|_| Chromosome::random(goal, symbol_count, rng))
            .collect();
        Self::from_chromosomes(goal, chromosomes, 0)
    }

    /// Wraps existing chromosomes, recording the first exact solution.
    pub fn from_chromosomes(goal: f64, chromosomes: Vec<Chromosome>, generation: usize) -> Self {
        let solution = chromosomes.iter().position(Chromosome::is_solution);
        Self {
            goal,
            chromosomes,
            generation,
            solution,
        }
    }

    pub fn goal(&self) -> f64 {
        self.goal
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// All chromosomes in population order.
    pub fn all(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    /// Number of generational steps that produced this population.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The first chromosome that hits the goal exactly, if any.
    pub fn solution(&self) -> Option<&Chromosome> {
        self.solution.map(|i| &self.chromosomes[i])
    }

    /// The fittest chromosome; ties go to the earliest.
    pub fn best(&self) -> Option<&Chromosome> {
        selection::best(&self.chromosomes).map(|i| &self.chromosomes[i])
    }

    pub fn mean_fitness(&self) -> f64 {
        if self.chromosomes.is_empty() {
            return 0.0;
        }
        let total: f64 = self.chromosomes.iter().map(Chromosome::fitness).sum();
        total / self.chromosomes.len() as f64
    }

    /// Roulette-wheel pick, with replacement.
    ///
    /// # Panics
    /// Panics if the population is empty.
    pub fn select_one<R: Rng>(&self, rng: &mut R) -> &Chromosome {
        &self.chromosomes[selection::roulette(&self.chromosomes, rng)]
    }

    /// Two independent picks; both may be the same chromosome.
    pub fn select_pair<R: Rng>(&self, rng: &mut R) -> (&Chromosome, &Chromosome) {
        let (a, b) = selection::roulette_pair(&self.chromosomes, rng);
        (&self.chromosomes[a], &self.chromosomes[b])
    }

    /// Breeds the next generation with crossover always applied.
    pub fn advance_generation<R: Rng>(
        &self,
        crossover_rate: f64,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Result<Population> {
        self.advance_generation_with(&Breeding::new(crossover_rate, mutation_rate), rng)
    }

    /// Breeds a same-size generation: for every slot, select a pair,
    /// recombine, mutate and score.
    ///
    /// Each slot gets its own generator seeded from `rng`, so slots can run
    /// on any thread without sharing random state.
    ///
    /// # Errors
    /// [`GaError::CrossoverRateOutOfRange`] before any breeding happens.
    pub fn advance_generation_with<R: Rng>(
        &self,
        breeding: &Breeding,
        rng: &mut R,
    ) -> Result<Population> {
        if !(0.0..=1.0).contains(&breeding.crossover_rate) {
            return Err(GaError::CrossoverRateOutOfRange(breeding.crossover_rate));
        }

        let seeds = split_streams(rng, self.chromosomes.len());
        let offspring = self.breed_all(&seeds, breeding)?;
        Ok(Population::from_chromosomes(
            self.goal,
            offspring,
            self.generation + 1,
        ))
    }

    #[cfg(feature = "parallel")]
    fn breed_all(&self, seeds: &[u64], breeding: &Breeding) -> Result<Vec<Chromosome>> {
        if breeding.parallel {
            seeds
                .par_iter()
                .map(|&seed| self.breed_one(seed, breeding))
                .collect()
        } else {
            seeds
                .iter()
                .map(|&seed| self.breed_one(seed, breeding))
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn breed_all(&self, seeds: &[u64], breeding: &Breeding) -> Result<Vec<Chromosome>> {
        seeds
            .iter()
            .map(|&seed| self.breed_one(seed, breeding))
            .collect()
    }

    fn breed_one(&self, seed: u64, breeding: &Breeding) -> Result<Chromosome> {
        let mut rng = create_rng(seed);
        let (male, female) = self.select_pair(&mut rng);

        let recombine = breeding.crossover_probability >= 1.0
            || rng.random::<f64>() < breeding.crossover_probability;
        let child = if recombine {
            male.crossover(female, breeding.crossover_rate)?
        } else {
            male.clone()
        };

        Ok(child.mutate(breeding.mutation_rate, &mut rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Genome;

    fn fixed(goal: f64, genomes: &[&str]) -> Population {
        let chromosomes = genomes
            .iter()
            .map(|g| Chromosome::new(goal, g.parse::<Genome>().unwrap()))
            .collect();
        Population::from_chromosomes(goal, chromosomes, 0)
    }

    #[test]
    fn test_new_random_size() {
        let mut rng = create_rng(42);
        let pop = Population::new_random(22.0, 100, &mut rng);
        assert_eq!(pop.len(), 100);
        assert_eq!(pop.generation(), 0);
        assert!(pop.all().iter().all(|c| c.genome().len() == 300));
    }

    #[test]
    fn test_new_random_sized() {
        let mut rng = create_rng(42);
        let pop = Population::new_random_sized(22.0, 10, 20, &mut rng);
        assert!(pop.all().iter().all(|c| c.genome().len() == 80));
    }

    #[test]
    fn test_from_chromosomes_records_first_solution() {
        // "7+4" = 11, "9" = 9, "7+4" = 11
        let pop = fixed(11.0, &["011110100100", "1001", "011110100100"]);
        let solution = pop.solution().unwrap();
        assert!(std::ptr::eq(solution, &pop.all()[0]));

        let pop = fixed(5.0, &["011110100100", "1001"]);
        assert!(pop.solution().is_none());
    }

    #[test]
    fn test_best() {
        // answers 11, 9, 3 against goal 4
        let pop = fixed(4.0, &["011110100100", "1001", "0011"]);
        assert_eq!(pop.best().unwrap().answer(), 3.0);
    }

    #[test]
    fn test_advance_preserves_size_and_counts_generation() {
        let mut rng = create_rng(42);
        let pop = Population::new_random_sized(22.0, 30, 20, &mut rng);
        let next = pop.advance_generation(0.7, 0.05, &mut rng).unwrap();
        assert_eq!(next.len(), 30);
        assert_eq!(next.generation(), 1);
        assert_eq!(next.goal(), 22.0);
        assert!(next.all().iter().all(|c| c.genome().len() == 80));
    }

    #[test]
    fn test_advance_rejects_bad_crossover_rate() {
        let mut rng = create_rng(42);
        let pop = Population::new_random_sized(22.0, 5, 4, &mut rng);
        assert_eq!(
            pop.advance_generation(1.2, 0.05, &mut rng).unwrap_err(),
            GaError::CrossoverRateOutOfRange(1.2)
        );
    }

    #[test]
    fn test_advance_parallel_matches_sequential() {
        let pop = Population::new_random_sized(22.0, 40, 20, &mut create_rng(1));
        let breeding = Breeding::new(0.7, 0.05);

        let a = pop
            .advance_generation_with(&breeding.with_parallel(true), &mut create_rng(9))
            .unwrap();
        let b = pop
            .advance_generation_with(&breeding.with_parallel(false), &mut create_rng(9))
            .unwrap();
        assert_eq!(a.all(), b.all());
    }

    #[test]
    fn test_no_crossover_no_mutation_copies_parents() {
        let pop = fixed(30.0, &["011110100100", "1001"]);
        let breeding = Breeding::new(0.5, 0.0).with_crossover_probability(0.0);
        let next = pop
            .advance_generation_with(&breeding, &mut create_rng(5))
            .unwrap();
        for c in next.all() {
            assert!(pop.all().iter().any(|p| p.genome() == c.genome()));
        }
    }

    #[test]
    fn test_identical_population_is_stable_without_mutation() {
        let pop = fixed(30.0, &["011110100100"; 4]);
        let next = pop.advance_generation(0.3, 0.0, &mut create_rng(2)).unwrap();
        assert!(next.all().iter().all(|c| c.expression() == "7+4"));
    }

    #[test]
    fn test_select_pair_with_replacement() {
        let pop = fixed(30.0, &["1001"]);
        let (a, b) = pop.select_pair(&mut create_rng(3));
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_mean_fitness() {
        // answers 9 and 3 against goal 5: fitness 0.25 and 0.5
        let pop = fixed(5.0, &["1001", "0011"]);
        assert!((pop.mean_fitness() - 0.375).abs() < 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_derives_solution_index() {
        let pop = fixed(9.0, &["011110100100", "1001"]);
        let mut value = serde_json::to_value(&pop).unwrap();
        assert!(value.get("solution").is_none());

        value["solution"] = serde_json::json!(99);
        let back: Population = serde_json::from_value(value).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.solution().unwrap().expression(), "9");

        let mut value = serde_json::to_value(&pop).unwrap();
        value["chromosomes"] = serde_json::json!([]);
        let empty: Population = serde_json::from_value(value).unwrap();
        assert!(empty.is_empty());
        assert!(empty.solution().is_none());
    }
}
