//! Deterministic random number generation for dice and narration.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical dice sequence
//! - **Context streams**: Independent sequences for different purposes,
//!   so narration choices never disturb the dice
//!
//! ## Usage
//!
//! ```
//! use ludo_echoes::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let roll = rng.roll_die();
//! assert!((1..=6).contains(&roll));
//!
//! // Same seed, same rolls
//! let mut replay = GameRng::new(42);
//! assert_eq!(replay.roll_die(), roll);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Number of faces on the die.
pub const DIE_FACES: u8 = 6;

/// Deterministic RNG with per-context streams.
///
/// Uses ChaCha8 for speed while maintaining cryptographic quality randomness.
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

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed,
    /// regardless of how much of this RNG has been consumed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Roll one die: uniform over 1..=6.
    pub fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=DIE_FACES)
    }

    /// Generate a random boolean with given probability of true.
    ///
    /// The probability is clamped to `[0, 1]`; NaN counts as 0.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
