//! Scored candidate expressions.
//!
//! A [`Chromosome`] is an immutable value: a genome plus everything derived
//! from it for a given goal (decoded expression, evaluated answer, fitness).
//! Crossover and mutation build new chromosomes and never touch their
//! inputs, so chromosomes can be shared freely across worker threads.

use crate::codec::{self, Genome, SYMBOL_BITS};
use crate::error::Result;
use crate::evaluator;
use crate::operators;
use rand::Rng;
use std::fmt;

/// Fitness of an exact match.
pub const SOLUTION_FITNESS: f64 = f64::MAX;

/// Anything that carries a fitness score.
///
/// Higher is better. Selection is generic over this trait.
pub trait Individual: Clone + Send + Sync {
    fn fitness(&self) -> f64;
}

/// Scores an answer against a goal.
///
/// Exact matches (within `f64::EPSILON`) score [`SOLUTION_FITNESS`];
/// everything else scores `1 / |goal - answer|`.
pub fn fitness(goal: f64, answer: f64) -> f64 {
    if (answer - goal).abs() < f64::EPSILON {
        return SOLUTION_FITNESS;
    }
    1.0 / (goal - answer).abs()
}

/// A genome scored against a goal.
///
/// Only `genome` and `goal` are read back when deserializing; the other
/// fields are recomputed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ChromosomeData"))]
pub struct Chromosome {
    genome: Genome,
    goal: f64,
    expression: String,
    answer: f64,
    fitness: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ChromosomeData {
    genome: Genome,
    goal: f64,
}

#[cfg(feature = "serde")]
impl From<ChromosomeData> for Chromosome {
    fn from(data: ChromosomeData) -> Self {
        Self::new(data.goal, data.genome)
    }
}

impl Chromosome {
    /// Decodes, evaluates and scores `genome` against `goal`.
    pub fn new(goal: f64, genome: Genome) -> Self {
        let expression = codec::decode(&genome);
        let answer = evaluator::evaluate(&expression);
        Self {
            fitness: fitness(goal, answer),
            genome,
            goal,
            expression,
            answer,
        }
    }

    /// A chromosome with `symbol_count` random 4-bit windows.
    pub fn random<R: Rng>(goal: f64, symbol_count: usize, rng: &mut R) -> Self {
        Self::new(goal, codec::generate(symbol_count * SYMBOL_BITS, rng))
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn goal(&self) -> f64 {
        self.goal
    }

    /// The decoded expression, e.g. `"7+4"`.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn answer(&self) -> f64 {
        self.answer
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Whether this chromosome's answer hits its goal exactly.
    pub fn is_solution(&self) -> bool {
        self.fitness == SOLUTION_FITNESS
    }

    pub fn equals_answer(&self, target: f64) -> bool {
        (self.answer - target).abs() < f64::EPSILON
    }

    /// The same genome scored against another goal.
    pub fn rescore(&self, goal: f64) -> Self {
        Self {
            genome: self.genome.clone(),
            goal,
            expression: self.expression.clone(),
            answer: self.answer,
            fitness: fitness(goal, self.answer),
        }
    }

    /// Single-point crossover: `self[..p] ++ other[p..]` with
    /// `p = floor(rate * len)`.
    ///
    /// # Errors
    /// `rate` outside `[0, 1]`, or genomes of different lengths.
    pub fn crossover(&self, other: &Chromosome, rate: f64) -> Result<Chromosome> {
        Ok(self.crossover_pair(other, rate)?.0)
    }

    /// Like [`crossover`](Self::crossover), also returning the mirror child
    /// `other[..p] ++ self[p..]`.
    pub fn crossover_pair(
        &self,
        other: &Chromosome,
        rate: f64,
    ) -> Result<(Chromosome, Chromosome)> {
        let (child, mirror) =
            operators::single_point_crossover(self.genome.bits(), other.genome.bits(), rate)?;
        Ok((
            Chromosome::new(self.goal, Genome::from_bits(child)),
            Chromosome::new(self.goal, Genome::from_bits(mirror)),
        ))
    }

    /// Flips each bit with probability `rate` and rescores the result.
    pub fn mutate<R: Rng>(&self, rate: f64, rng: &mut R) -> Chromosome {
        let bits = operators::bit_flip_mutation(self.genome.bits(), rate, rng);
        Chromosome::new(self.goal, Genome::from_bits(bits))
    }
}

impl Individual for Chromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fitness: {}, Solution: {}, Answer: {}",
            self.fitness, self.expression, self.answer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Operator, Symbol};
    use crate::error::GaError;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn from_str(goal: f64, bits: &str) -> Chromosome {
        Chromosome::new(goal, bits.parse().unwrap())
    }

    #[test]
    fn test_new_decodes_and_scores() {
        let genome = Genome::from_symbols(&[
            Symbol::Digit(7),
            Symbol::Op(Operator::Add),
            Symbol::Digit(4),
        ])
        .unwrap();
        let c = Chromosome::new(22.0, genome);
        assert_eq!(c.expression(), "7+4");
        assert_eq!(c.answer(), 11.0);
        assert!((c.fitness() - 1.0 / 11.0).abs() < 1e-12);
        assert!(!c.is_solution());
    }

    #[test]
    fn test_exact_match_is_solution() {
        let genome = Genome::from_symbols(&[
            Symbol::Digit(7),
            Symbol::Op(Operator::Add),
            Symbol::Digit(4),
        ])
        .unwrap();
        let c = Chromosome::new(11.0, genome);
        assert!(c.is_solution());
        assert!(c.equals_answer(11.0));
        assert_eq!(c.fitness(), SOLUTION_FITNESS);
    }

    #[test]
    fn test_random_length() {
        let mut rng = create_rng(42);
        let c = Chromosome::random(22.0, 75, &mut rng);
        assert_eq!(c.genome().len(), 300);
    }

    #[test]
    fn test_fitness_values() {
        assert_eq!(fitness(22.0, 22.0), SOLUTION_FITNESS);
        assert_eq!(fitness(22.0, 20.0), 0.5);
        assert_eq!(fitness(22.0, 24.0), 0.5);
        assert_eq!(fitness(22.0, 12.0), 0.1);
    }

    #[test]
    fn test_fitness_within_epsilon_is_solution() {
        assert_eq!(fitness(22.0, 22.0 + f64::EPSILON / 2.0), SOLUTION_FITNESS);
        assert_eq!(fitness(0.0, f64::EPSILON / 2.0), SOLUTION_FITNESS);
        assert!(fitness(0.0, f64::EPSILON * 2.0) < SOLUTION_FITNESS);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_recomputes_derived_fields() {
        let c = from_str(11.0, "011110100100");
        let mut value = serde_json::to_value(&c).unwrap();
        value["expression"] = serde_json::json!("9");
        value["answer"] = serde_json::json!(9.0);
        value["fitness"] = serde_json::json!(0.0);

        let back: Chromosome = serde_json::from_value(value).unwrap();
        assert_eq!(back, c);
        assert!(back.is_solution());
    }

    #[test]
    fn test_crossover_at_half() {
        let a = from_str(1.0, "11111111");
        let b = from_str(1.0, "00000000");
        let child = a.crossover(&b, 0.5).unwrap();
        assert_eq!(child.genome().to_string(), "11110000");

        let (child, mirror) = a.crossover_pair(&b, 0.5).unwrap();
        assert_eq!(child.genome().to_string(), "11110000");
        assert_eq!(mirror.genome().to_string(), "00001111");
    }

    #[test]
    fn test_crossover_leaves_parents_untouched() {
        let a = from_str(1.0, "11111111");
        let b = from_str(1.0, "00000000");
        let _ = a.crossover_pair(&b, 0.25).unwrap();
        assert_eq!(a.genome().to_string(), "11111111");
        assert_eq!(b.genome().to_string(), "00000000");
    }

    #[test]
    fn test_crossover_rate_above_one_fails() {
        let a = from_str(1.0, "11111111");
        let b = from_str(1.0, "00000000");
        assert_eq!(
            a.crossover(&b, 1.01),
            Err(GaError::CrossoverRateOutOfRange(1.01))
        );
    }

    #[test]
    fn test_crossover_child_is_rescored() {
        // 0111 1010 | 0100 0000  ++  .... .... | 0000 0010 -> "7+2"
        let a = from_str(9.0, "0111101001000000");
        let b = from_str(9.0, "0000000000000010");
        let child = a.crossover(&b, 0.5).unwrap();
        assert_eq!(child.expression(), "7+2");
        assert!(child.is_solution());
    }

    #[test]
    fn test_mutate_rate_one_flips_every_bit() {
        let mut rng = create_rng(1);
        let c = from_str(1.0, "11111111");
        assert_eq!(c.mutate(1.0, &mut rng).genome().to_string(), "00000000");
    }

    #[test]
    fn test_mutate_rate_zero_changes_nothing() {
        let mut rng = create_rng(1);
        let c = from_str(1.0, "11111111");
        assert_eq!(c.mutate(0.0, &mut rng), c);
    }

    #[test]
    fn test_rescore() {
        let c = from_str(22.0, "01111010").rescore(7.0);
        assert_eq!(c.goal(), 7.0);
        assert!(c.is_solution());
    }

    #[test]
    fn test_display() {
        let c = from_str(13.0, "011110100100");
        assert_eq!(c.to_string(), "Fitness: 0.5, Solution: 7+4, Answer: 11");
    }

    proptest! {
        #[test]
        fn prop_fitness_decreases_with_distance(
            goal in -1000.0f64..1000.0,
            near in 0.001f64..100.0,
            extra in 0.001f64..100.0,
        ) {
            let close = fitness(goal, goal + near);
            let far = fitness(goal, goal + near + extra);
            prop_assert!(close > far);
            prop_assert!(close < SOLUTION_FITNESS);
        }
    }
}
