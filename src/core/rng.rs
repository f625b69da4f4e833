//! Deterministic random number generation for dealing.
//!
//! A round is dealt from a seeded ChaCha8 stream, so the same seed and the
//! same settings always produce the same grid. Hosts that want a fresh deal
//! every time use [`GameRng::from_entropy`].
//!
//! ```
//! use memory_match::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//!
//! let mut left = vec![1, 2, 3, 4, 5, 6];
//! let mut right = left.clone();
//! a.shuffle(&mut left);
//! b.shuffle(&mut right);
//!
//! assert_eq!(left, right);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded RNG used by the round controller.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from the OS.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Pick `count` distinct elements, without replacement.
    ///
    /// Returns `None` if the slice holds fewer than `count` elements.
    #[must_use]
    pub fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Option<Vec<T>> {
        if items.len() < count {
            return None;
        }
        Some(items.choose_multiple(&mut self.inner, count).cloned().collect())
    }
}
