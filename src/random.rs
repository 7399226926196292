//! Random source wiring.
//!
//! Every run owns exactly one master [`StdRng`]. Parallel work never shares
//! it: before a generation fans out, [`split_streams`] draws one seed per
//! offspring slot from the master, and each slot builds its own generator
//! from that seed. The sequence of offspring is therefore the same whether
//! or not the `parallel` feature is enabled.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a reproducible generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws a fresh seed from the thread-local entropy source.
pub fn entropy_seed() -> u64 {
    rand::random()
}

/// Draws `n` independent stream seeds from `rng`.
pub fn split_streams<R: Rng>(rng: &mut R, n: usize) -> Vec<u64> {
    (0..n).map(|_| rng.random()).collect()
}
