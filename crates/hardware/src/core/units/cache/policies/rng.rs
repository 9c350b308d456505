//! Insertion Random Source.
//!
//! BRRIP inserts most lines at the long RRPV and a small fraction at the
//! distant RRPV. The draw that decides between them goes through
//! [`InsertionRng`] so simulations are reproducible from a seed and tests can
//! pin the outcome.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of bounded random draws.
pub trait InsertionRng: Send + Sync {
    /// Returns a value in `0..bound`.
    fn draw(&mut self, bound: u32) -> u32;
}

/// ChaCha8-backed source seeded from a `u64`.
#[derive(Clone, Debug)]
pub struct ChaChaSource {
    rng: ChaCha8Rng,
}

impl ChaChaSource {
    /// Creates a source from a seed. Equal seeds yield equal draw sequences.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl InsertionRng for ChaChaSource {
    fn draw(&mut self, bound: u32) -> u32 {
        self.rng.next_u32() % bound
    }
}
