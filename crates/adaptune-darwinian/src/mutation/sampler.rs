//! Random draws consumed by the mutation engine

use rand::{Rng, RngCore};

/// Source of the uniform draws a mutation needs
pub trait Sampler {
    /// Uniform draw in `[0, 1)`
    fn uniform(&mut self) -> f64;

    /// Uniform index in `[0, len)`; `len` is never zero
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: RngCore + ?Sized> Sampler for R {
    fn uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}
