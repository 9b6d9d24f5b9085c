//! The engine's single seeded random stream.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// A seeded, portable random stream. The same seed yields the same draws on
/// every platform.
#[derive(Clone, Debug)]
pub struct RandomStream {
    seed: u64,
    rng: ChaCha12Rng,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream from its seed.
    pub fn rewind(&mut self) {
        self.rng = ChaCha12Rng::seed_from_u64(self.seed);
    }

    /// Switch to a new seed and restart from it.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rewind();
    }

    /// A value in `[from, to)`. Returns `from` without drawing when the
    /// bounds are equal.
    pub fn uniform(&mut self, from: f64, to: f64) -> f64 {
        if from == to {
            return from;
        }
        from + self.rng.gen::<f64>() * (to - from)
    }

    /// A value in `[0, 1)`, compared against operator probabilities.
    pub fn probability(&mut self) -> f64 {
        self.uniform(0.0, 1.0)
    }

    /// An index in `[0, len)`. Does not draw when there is one choice or none.
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.uniform(0.0, len as f64) as usize).min(len - 1)
    }

    /// An integer in `[lo, hi]`. Does not draw when `lo == hi`.
    pub fn int_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        if lo >= hi {
            return lo;
        }
        lo + self.index(hi - lo + 1)
    }
}
