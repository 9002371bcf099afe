//! Sources of uniform randomness consumed by variations and regions

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Largest f32 strictly below 1.0
const BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// Default seed, so that two emitters built with defaults behave identically
pub const DEFAULT_SEED: u64 = 0xDEAD_BEEF;

/// A source of uniformly distributed fractions.
///
/// Every random decision the emitter makes goes through this trait, which
/// makes the whole simulation reproducible given the same sampler output.
pub trait Sampler {
    /// Returns a value in [0, 1)
    fn next_unit(&mut self) -> f32;

    /// Returns a value in [min, max)
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit() * (max - min)
    }
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

/// Seedable PCG32 stream
#[derive(Debug, Clone)]
pub struct SeededSampler {
    rng: Pcg32,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Default for SeededSampler {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Sampler for SeededSampler {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Always yields the same fraction. Ranges resolve to a fixed point inside
/// them, which makes emitter output fully predictable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSampler(pub f32);

impl Sampler for ConstantSampler {
    fn next_unit(&mut self) -> f32 {
        clamp_unit(self.0)
    }
}

/// Cycles through a fixed list of fractions
#[derive(Debug, Clone)]
pub struct SequenceSampler {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSampler {
    /// An empty list behaves like `ConstantSampler(0.0)`
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl Sampler for SequenceSampler {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = (self.cursor + 1) % self.values.len();
        clamp_unit(v)
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, BELOW_ONE)
}
