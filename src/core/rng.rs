//! Deterministic random number generation for dice and deck shuffling.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Replayable**: A fixed seed reproduces an entire game, which makes
//!   scenario tests and bug reports exact
//!
//! All randomness in the engine - dice rolls and the one-time luck deck
//! shuffle - routes through a single `GameRng` owned by the game state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG for dice rolls and deck shuffling.
///
/// Uses ChaCha8 for speed while maintaining high-quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the operating system's entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate one die face: a uniform draw in [1,6].
    pub fn die_face(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}
