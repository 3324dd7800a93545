//! Splittable deterministic random source
//!
//! Every random decision in the engine draws from a `SimRng`. Parents mint
//! child seeds for sub-decisions so that replaying the same event sequence
//! from the same seed reproduces identical outcomes.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Mint an independent seed for a sub-decision
    pub fn child_seed(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Mint an independent generator for a sub-decision
    pub fn child(&mut self) -> SimRng {
        SimRng::new(self.child_seed())
    }

    /// Reseed from a stored seed and advance the stored value.
    ///
    /// Owners that persist their random state as a single `u64` use this so
    /// each call gets a fresh stream while the state stays serializable.
    pub fn advance(seed: &mut u64) -> SimRng {
        let mut rng = SimRng::new(*seed);
        *seed = rng.child_seed();
        rng
    }

    /// Uniform in [0, 1)
    pub fn unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// True with probability `p` (clamped to [0, 1])
    pub fn chance(&mut self, p: f32) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.unit() < p
    }

    /// Round to an integer, rounding up with probability equal to the fraction
    pub fn stochastic_round(&mut self, value: f32) -> i32 {
        if !value.is_finite() {
            return 0;
        }
        let floor = value.floor();
        let frac = value - floor;
        let up = if frac > 0.0 && self.unit() < frac { 1 } else { 0 };
        floor as i32 + up
    }

    /// Uniform index into a collection of `len` items, None when empty
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.inner.gen_range(0..len))
        }
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
