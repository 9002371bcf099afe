//! Variation specs: a fixed value or a range, resolved to one concrete
//! sample per call

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::curves::{lerp_f32, lerp_vec3};
use crate::{Color, Sampler};

/// A value type that can be sampled between two bounds
pub trait Varying: Copy {
    /// Picks the value at fraction `t` (in [0, 1)) between `min` and `max`
    fn sample_between(min: Self, max: Self, t: f32) -> Self;
}

impl Varying for f32 {
    fn sample_between(min: Self, max: Self, t: f32) -> Self {
        lerp_f32(min, max, t)
    }
}

impl Varying for u32 {
    /// Uniform over the inclusive integer range
    fn sample_between(min: Self, max: Self, t: f32) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (hi - lo) as f64 + 1.0;
        let offset = (t as f64 * span).floor() as u32;
        lo.saturating_add(offset).min(hi)
    }
}

impl Varying for Color {
    fn sample_between(min: Self, max: Self, t: f32) -> Self {
        min.lerp(max, t)
    }
}

impl Varying for Vec3 {
    fn sample_between(min: Self, max: Self, t: f32) -> Self {
        lerp_vec3(min, max, t)
    }
}

/// A fixed value or a `{ min, max }` range.
///
/// In config files a bare value deserializes as `Fixed`, a table with
/// `min`/`max` as `Range`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variation<T> {
    Fixed(T),
    Range { min: T, max: T },
}

impl<T: Varying> Variation<T> {
    /// Resolve to one concrete value. `Fixed` does not draw from the sampler.
    pub fn resolve<S: Sampler + ?Sized>(&self, sampler: &mut S) -> T {
        match *self {
            Variation::Fixed(v) => v,
            Variation::Range { min, max } => T::sample_between(min, max, sampler.next_unit()),
        }
    }
}

impl<T> Variation<T> {
    pub fn range(min: T, max: T) -> Self {
        Variation::Range { min, max }
    }
}

impl Variation<f32> {
    /// Whether a range has its bounds in order (always true for `Fixed`)
    pub fn is_ordered(&self) -> bool {
        match self {
            Variation::Fixed(_) => true,
            Variation::Range { min, max } => min <= max,
        }
    }
}

impl<T: Default> Default for Variation<T> {
    fn default() -> Self {
        Variation::Fixed(T::default())
    }
}

impl<T> From<T> for Variation<T> {
    fn from(value: T) -> Self {
        Variation::Fixed(value)
    }
}
