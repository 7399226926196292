//! Parent selection.
//!
//! Fitness-proportionate (roulette wheel) sampling with replacement: the
//! same candidate may be drawn for both parents of a pair.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use crate::chromosome::Individual;
use rand::Rng;

/// Roulette wheel selection. Higher fitness = proportionally more likely.
///
/// Draws `slice = total * u` and returns the first candidate whose
/// cumulative fitness reaches `slice`, falling back to the last candidate
/// when rounding leaves the walk short. If the total is zero, negative or
/// not finite (two exact solutions overflow it), the draw is uniform.
///
/// # Complexity
/// O(n) per selection
///
/// # Panics
/// Panics if `candidates` is empty.
pub fn roulette<I: Individual, R: Rng>(candidates: &[I], rng: &mut R) -> usize {
    assert!(
        !candidates.is_empty(),
        "cannot select from empty population"
    );

    let n = candidates.len();
    let total: f64 = candidates.iter().map(Individual::fitness).sum();
    if !total.is_finite() || total <= 0.0 {
        log::trace!("degenerate fitness total {total}, selecting uniformly");
        return rng.random_range(0..n);
    }

    let slice = total * rng.random::<f64>();
    let mut cumulative = 0.0;
    for (i, candidate) in candidates.iter().enumerate() {
        cumulative += candidate.fitness();
        if cumulative >= slice {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

/// Two independent roulette draws over the same candidates.
pub fn roulette_pair<I: Individual, R: Rng>(candidates: &[I], rng: &mut R) -> (usize, usize) {
    let first = roulette(candidates, rng);
    let second = roulette(candidates, rng);
    (first, second)
}

/// Index of the highest-fitness candidate; ties go to the earliest.
///
/// Returns `None` for an empty slice.
pub fn best<I: Individual>(candidates: &[I]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .reduce(|acc, next| {
            if acc.1.fitness() >= next.1.fitness() {
                acc
            } else {
                next
            }
        })
        .map(|(i, _)| i)
}
