//! Particle types: CPU simulation record and GPU instance data

use bytemuck::{Pod, Zeroable};
use ember_core::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// One simulated element. Particles carry no identity beyond their slot in
/// the emitter's collection and hold no reference back to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub location: Vec3,
    pub velocity: Vec3,
    /// Remaining seconds
    pub lifetime: f32,
    /// Seconds since spawn
    pub age: f32,
    pub size: f32,
    pub rotation: f32,
    pub colour: Color,
}

impl Particle {
    pub fn new(location: Vec3, velocity: Vec3, lifetime: f32) -> Self {
        Self {
            location,
            velocity,
            lifetime,
            age: 0.0,
            size: 1.0,
            rotation: 0.0,
            colour: Color::WHITE,
        }
    }

    /// Fraction of the particle's life already spent, in [0, 1]
    pub fn life_fraction(&self) -> f32 {
        let total = self.age + self.lifetime.max(0.0);
        if total <= 0.0 {
            1.0
        } else {
            (self.age / total).clamp(0.0, 1.0)
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, 0.0)
    }
}

/// GPU instance data for instanced billboards.
/// 48 bytes laid out as three vec4 rows.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// xyz = location, w = size
    pub pos_size: [f32; 4],
    /// rgba
    pub color: [f32; 4],
    /// x = rotation, y = life fraction, z = frames_x, w = frames_y
    pub rotation_life: [f32; 4],
}

impl ParticleInstance {
    pub fn from_particle(p: &Particle, frames_x: u32, frames_y: u32) -> Self {
        Self {
            pos_size: [p.location.x, p.location.y, p.location.z, p.size],
            color: p.colour.to_array(),
            rotation_life: [
                p.rotation,
                p.life_fraction(),
                frames_x as f32,
                frames_y as f32,
            ],
        }
    }
}
