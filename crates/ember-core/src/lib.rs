//! Ember Core - Foundational types for the Ember particle emitter
//!
//! This crate provides the primitives the emitter consumes:
//! - `Vec2`, `Vec3` - Vector math (re-exported from glam)
//! - `Color` - RGBA colour values
//! - `Sampler` - Sources of uniform randomness
//! - `Variation` - Fixed-or-ranged values resolved once per sample
//! - `Region` - 2D spawn areas with uniform point sampling
//! - Error types and Result alias

pub mod curves;
mod error;
mod region;
mod sampler;
mod types;
mod variation;

pub use error::{EmberError, Result};
pub use glam::{Vec2, Vec3};
pub use region::Region;
pub use sampler::{ConstantSampler, Sampler, SeededSampler, SequenceSampler};
pub use types::Color;
pub use variation::{Variation, Varying};
