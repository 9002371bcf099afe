//! Modifier modules: pluggable per-particle mutators run every tick
//!
//! Modules run in registration order on every live particle, after physics
//! integration and before despawn rules are evaluated.

use ember_core::curves::{inverse_lerp, lerp_color, lerp_f32};
use ember_core::Color;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// A unit that mutates a particle in place.
///
/// Modules may keep internal state across calls, but must not depend on
/// the order particles are visited within a tick.
pub trait ParticleModule {
    fn apply(&mut self, particle: &mut Particle);

    /// Human-readable name for diagnostics
    fn name(&self) -> &str {
        "module"
    }
}

impl<F> ParticleModule for F
where
    F: FnMut(&mut Particle),
{
    fn apply(&mut self, particle: &mut Particle) {
        self(particle)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Interpolates size from `start` to `end` over the particle's life
#[derive(Debug, Clone, Copy)]
pub struct SizeOverLifetime {
    pub start: f32,
    pub end: f32,
}

impl ParticleModule for SizeOverLifetime {
    fn apply(&mut self, particle: &mut Particle) {
        particle.size = lerp_f32(self.start, self.end, particle.life_fraction());
    }

    fn name(&self) -> &str {
        "size_over_lifetime"
    }
}

/// Interpolates colour from `start` to `end` over the particle's life
#[derive(Debug, Clone, Copy)]
pub struct ColourOverLifetime {
    pub start: Color,
    pub end: Color,
}

impl ParticleModule for ColourOverLifetime {
    fn apply(&mut self, particle: &mut Particle) {
        particle.colour = lerp_color(self.start, self.end, particle.life_fraction());
    }

    fn name(&self) -> &str {
        "colour_over_lifetime"
    }
}

/// Fades alpha linearly to zero once the life fraction passes
/// `start_fraction`. Leaves RGB untouched.
#[derive(Debug, Clone, Copy)]
pub struct FadeOut {
    pub start_fraction: f32,
}

impl ParticleModule for FadeOut {
    fn apply(&mut self, particle: &mut Particle) {
        let t = particle.life_fraction();
        if t <= self.start_fraction {
            return;
        }
        let remaining = 1.0 - inverse_lerp(self.start_fraction, 1.0, t);
        particle.colour.a = particle.colour.a.min(remaining);
    }

    fn name(&self) -> &str {
        "fade_out"
    }
}

/// Clamps velocity magnitude to `max_speed`
#[derive(Debug, Clone, Copy)]
pub struct SpeedLimit {
    pub max_speed: f32,
}

impl ParticleModule for SpeedLimit {
    fn apply(&mut self, particle: &mut Particle) {
        particle.velocity = particle.velocity.clamp_length_max(self.max_speed.max(0.0));
    }

    fn name(&self) -> &str {
        "speed_limit"
    }
}

/// Points the particle's rotation along its planar heading
#[derive(Debug, Clone, Copy, Default)]
pub struct RotateWithVelocity;

impl ParticleModule for RotateWithVelocity {
    fn apply(&mut self, particle: &mut Particle) {
        let v = particle.velocity;
        if v.x != 0.0 || v.y != 0.0 {
            particle.rotation = v.y.atan2(v.x);
        }
    }

    fn name(&self) -> &str {
        "rotate_with_velocity"
    }
}

/// Declarative description of the built-in modules, for config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleConfig {
    SizeOverLifetime { start: f32, end: f32 },
    ColourOverLifetime { start: Color, end: Color },
    FadeOut { start_fraction: f32 },
    SpeedLimit { max_speed: f32 },
    RotateWithVelocity,
}

impl ModuleConfig {
    pub fn into_module(self) -> Box<dyn ParticleModule> {
        match self {
            ModuleConfig::SizeOverLifetime { start, end } => {
                Box::new(SizeOverLifetime { start, end })
            }
            ModuleConfig::ColourOverLifetime { start, end } => {
                Box::new(ColourOverLifetime { start, end })
            }
            ModuleConfig::FadeOut { start_fraction } => Box::new(FadeOut { start_fraction }),
            ModuleConfig::SpeedLimit { max_speed } => Box::new(SpeedLimit { max_speed }),
            ModuleConfig::RotateWithVelocity => Box::new(RotateWithVelocity),
        }
    }
}
