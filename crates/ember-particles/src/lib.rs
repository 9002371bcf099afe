//! Ember Particles - deterministic CPU particle emitter
//!
//! Provides a single-emitter simulation with:
//! - Loop/duration accounting with finite or infinite loop budgets
//! - One-shot bursts fired exactly once per loop
//! - Rate-based continuous emission with frame-time catch-up
//! - Gravity integration and an ordered chain of modifier modules
//! - Rule-based despawning and FIFO eviction at capacity
//! - GPU instance packing for instanced draw calls

pub mod despawn;
pub mod emitter;
pub mod modules;
pub mod options;
pub mod particle;

pub use despawn::{should_despawn, DespawnRule};
pub use emitter::{Emitter, EmitterStats};
pub use modules::{
    ColourOverLifetime, FadeOut, ModuleConfig, ParticleModule, RotateWithVelocity,
    SizeOverLifetime, SpeedLimit,
};
pub use options::{
    Burst, CoreOptions, EmissionOptions, EmitterOptions, ParticleBlendMode, RendererOptions,
    ShapeOptions, DEFAULT_GRAVITY, MAX_PARTICLE_CAPACITY,
};
pub use particle::{Particle, ParticleInstance};
