//! Bit-string genetic operators.
//!
//! These work on plain `&[bool]` slices and return new vectors; the caller's
//! bits are never rewritten in place.
//!
//! # Crossover
//!
//! - [`single_point_crossover`]: deterministic cut at `floor(rate * len)`,
//!   returning the child and its mirror.
//!
//! # Mutation
//!
//! - [`bit_flip_mutation`]: independent per-bit flip with probability `rate`.

use crate::error::{GaError, Result};
use rand::Rng;

/// Cut position for a crossover fraction.
///
/// # Errors
/// [`GaError::CrossoverRateOutOfRange`] unless `0 <= rate <= 1`.
pub fn cut_position(len: usize, rate: f64) -> Result<usize> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(GaError::CrossoverRateOutOfRange(rate));
    }
    Ok((rate * len as f64).floor() as usize)
}

/// Single-point crossover at `floor(rate * len)`.
///
/// Returns `(left[..p] ++ right[p..], right[..p] ++ left[p..])`.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Errors
/// Rate outside `[0, 1]` or parents of different lengths.
pub fn single_point_crossover(
    left: &[bool],
    right: &[bool],
    rate: f64,
) -> Result<(Vec<bool>, Vec<bool>)> {
    let position = cut_position(left.len(), rate)?;
    if left.len() != right.len() {
        return Err(GaError::GenomeLengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let child = splice(left, right, position);
    let mirror = splice(right, left, position);
    Ok((child, mirror))
}

fn splice(head: &[bool], tail: &[bool], position: usize) -> Vec<bool> {
    let mut out = Vec::with_capacity(head.len());
    out.extend_from_slice(&head[..position]);
    out.extend_from_slice(&tail[position..]);
    out
}

/// Flips each bit independently when a uniform draw is `<= rate`.
///
/// A rate of `1` flips every bit. A rate of `0` still flips a bit if the
/// generator returns exactly `0.0`, which for `StdRng` has probability
/// 2^-53 per bit.
pub fn bit_flip_mutation<R: Rng>(bits: &[bool], rate: f64, rng: &mut R) -> Vec<bool> {
    bits.iter()
        .map(|&bit| if rng.random::<f64>() <= rate { !bit } else { bit })
        .collect()
}
