//! Deterministic dice for stealth and other HUD-driven rolls.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical rolls
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use conditional_visibility::core::RollRng;
//!
//! let mut dice = RollRng::new(7);
//! let roll = dice.d20();
//! assert!((1..=20).contains(&roll));
//!
//! // Same seed, same rolls
//! let mut again = RollRng::new(7);
//! assert_eq!(again.d20(), roll);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded dice roller.
///
/// Uses ChaCha8 so that a session seeded from configuration replays the
/// same rolls.
#[derive(Clone, Debug)]
pub struct RollRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl RollRng {
    /// Create a new roller with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Roll one die with `sides` faces. A die with fewer than one face rolls 0.
    pub fn roll_die(&mut self, sides: u32) -> i64 {
        if sides == 0 {
            return 0;
        }
        i64::from(self.inner.gen_range(1..=sides))
    }

    /// Roll `count` dice with `sides` faces and sum them.
    pub fn roll(&mut self, count: u32, sides: u32) -> i64 {
        (0..count).map(|_| self.roll_die(sides)).sum()
    }

    /// Roll a d20.
    pub fn d20(&mut self) -> i64 {
        self.roll_die(20)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> RollRngState {
        RollRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &RollRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable roller state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRngState {
    /// Seed the roller started from
    pub seed: u64,
    /// ChaCha8 word position
    pub word_pos: u128,
}
