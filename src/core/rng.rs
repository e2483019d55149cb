//! Deterministic random number generation for setup and search.
//!
//! The generator is never process-global: the match owns one, each round
//! shuffles with a fork of it, and search code owns its own. Cloning a
//! `GameRng` copies its stream position, so two clones of a state draw the
//! same values without sharing any mutable generator.
//!
//! ```
//! use rust_jaipur::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut round_rng = rng.fork();
//!
//! let mut again = GameRng::new(42);
//! let mut round_again = again.fork();
//! assert_eq!(round_rng.gen_range_usize(0..100), round_again.gen_range_usize(0..100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded ChaCha8 generator with deterministic forking.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "GameRngState", into = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Derive an independent child stream.
    ///
    /// The n-th fork of a given seed is always the same stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Uniform integer in `range`.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Pick an index with probability proportional to `weights`.
    ///
    /// Returns `None` if weights are empty or sum to zero.
    pub fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let total: f32 = weights.iter().sum();
        if weights.is_empty() || total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen::<f32>() * total;
        for (i, &weight) in weights.iter().enumerate() {
            threshold -= weight;
            if threshold <= 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case - return last index
        Some(weights.len() - 1)
    }

    /// Capture the current stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore a generator from a captured position.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

impl PartialEq for GameRng {
    fn eq(&self, other: &Self) -> bool {
        self.state() == other.state()
    }
}

/// Serializable generator position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Seed of the stream.
    pub seed: u64,
    /// ChaCha8 word position.
    pub word_pos: u128,
    /// Forks taken so far.
    pub fork_counter: u64,
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        GameRng::from_state(&state)
    }
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}
