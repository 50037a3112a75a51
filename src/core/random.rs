//! Injectable randomness
//!
//! Behaviors that need noise take a `&mut impl RandomSource` instead of
//! reaching for a global generator, so a seeded world replays exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed noise
pub trait RandomSource {
    /// Uniform sample in `[-1, 1]`
    fn random_clamped(&mut self) -> f32;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn random_clamped(&mut self) -> f32 {
        self.gen_range(-1.0..=1.0)
    }
}

/// Generator type owned by the simulation world
pub type SimRng = StdRng;

/// Create a deterministic generator from a seed
#[must_use]
pub fn seeded(seed: u64) -> SimRng {
    StdRng::seed_from_u64(seed)
}
