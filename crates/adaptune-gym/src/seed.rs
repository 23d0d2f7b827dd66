//! Deterministic, reseedable stream of environment seeds

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Exclusive upper bound of emitted seeds
pub const SEED_BOUND: u64 = 1 << 32;

#[derive(Debug, Clone)]
pub struct SeedSequence {
    seed: u64,
    generator: StdRng,
    last: Option<u64>,
}

impl SeedSequence {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            generator: StdRng::seed_from_u64(seed),
            last: None,
        }
    }

    /// Draw the next environment seed
    pub fn next_seed(&mut self) -> u64 {
        let seed = self.generator.gen_range(0..SEED_BOUND);
        self.last = Some(seed);
        seed
    }

    /// Most recently emitted seed
    pub fn get_seed(&self) -> Option<u64> {
        self.last
    }

    /// Rewind to the start of the current sequence
    pub fn reset(&mut self) {
        self.generator = StdRng::seed_from_u64(self.seed);
        self.last = None;
    }

    /// Restart the sequence from a new master seed
    pub fn set_generator(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }

    /// Master seed of the current sequence
    pub fn master_seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SeedSequence {
    fn default() -> Self {
        Self::new(rand::thread_rng().gen())
    }
}
