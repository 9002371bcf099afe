//! Emitter option groups: core, emission, shape and renderer passthrough

use std::f32::consts::{FRAC_PI_2, TAU};

use ember_core::{Color, EmberError, Region, Result, Variation};
use serde::{Deserialize, Serialize};

use crate::despawn::DespawnRule;

/// Upper bound accepted for `max_particles`
pub const MAX_PARTICLE_CAPACITY: usize = 1_000_000;

/// Default gravitational acceleration along the up axis
pub const DEFAULT_GRAVITY: f32 = -9.81;

/// Lifetime, capacity and initial-value configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreOptions {
    /// Seconds per loop
    pub duration: f64,
    /// Number of loops to run; negative means forever
    pub loops: i32,
    pub max_particles: usize,
    pub initial_lifetime: Variation<f32>,
    pub initial_speed: Variation<f32>,
    pub initial_size: Variation<f32>,
    /// Radians
    pub initial_rotation: Variation<f32>,
    pub initial_colour: Variation<Color>,
    /// Acceleration applied along +Y every tick (negative pulls down)
    pub gravity: f32,
    pub despawning_rules: Vec<DespawnRule>,
}

impl Default for CoreOptions {
    fn default() -> Self {
        Self {
            duration: 5.0,
            loops: -1,
            max_particles: 256,
            initial_lifetime: Variation::range(1.0, 2.0),
            initial_speed: Variation::range(1.0, 3.0),
            initial_size: Variation::Fixed(0.1),
            initial_rotation: Variation::range(0.0, TAU),
            initial_colour: Variation::Fixed(Color::WHITE),
            gravity: DEFAULT_GRAVITY,
            despawning_rules: vec![DespawnRule::LifetimeExpired],
        }
    }
}

/// One-shot emission at a point within each loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Burst {
    /// Seconds since the start of the loop
    pub time: f64,
    pub count: Variation<u32>,
}

impl Burst {
    pub fn new(time: f64, count: u32) -> Self {
        Self {
            time,
            count: Variation::Fixed(count),
        }
    }
}

/// Continuous and burst emission configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionOptions {
    /// Particles per second
    pub rate: f64,
    pub bursts: Vec<Burst>,
    /// Cap on continuous spawns in a single tick; the rest of the backlog is
    /// dropped. With `None` the catch-up loop spends the accumulated time,
    /// creating at most `max_particles` particles per tick.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_per_tick: Option<u32>,
}

impl Default for EmissionOptions {
    fn default() -> Self {
        Self {
            rate: 10.0,
            bursts: Vec::new(),
            max_per_tick: None,
        }
    }
}

/// Spawn location and initial direction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeOptions {
    pub source: Region,
    /// Planar heading in radians, measured from +X towards +Y
    pub angle: Variation<f32>,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        let spread = 15f32.to_radians();
        Self {
            source: Region::default(),
            angle: Variation::range(FRAC_PI_2 - spread, FRAC_PI_2 + spread),
        }
    }
}

/// Blend mode for particle rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleBlendMode {
    #[default]
    Alpha,
    Additive,
}

/// Settings owned by the rendering layer. The emitter stores them and never
/// reads them during simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    pub blend_mode: ParticleBlendMode,
    pub texture: String,
    pub frames_x: u32,
    pub frames_y: u32,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            blend_mode: ParticleBlendMode::Alpha,
            texture: String::new(),
            frames_x: 1,
            frames_y: 1,
        }
    }
}

/// All four option groups of an emitter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterOptions {
    pub core: CoreOptions,
    pub emission: EmissionOptions,
    pub shape: ShapeOptions,
    pub renderer: RendererOptions,
}

impl EmitterOptions {
    /// Reject configurations that would misbehave during simulation
    pub fn validate(&self) -> Result<()> {
        let rate = self.emission.rate;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(EmberError::InvalidRate(rate));
        }

        let duration = self.core.duration;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(EmberError::InvalidDuration(duration));
        }

        let capacity = self.core.max_particles;
        if capacity == 0 || capacity > MAX_PARTICLE_CAPACITY {
            return Err(EmberError::InvalidCapacity(capacity));
        }

        let scalars = [
            ("initial_lifetime", &self.core.initial_lifetime),
            ("initial_speed", &self.core.initial_speed),
            ("initial_size", &self.core.initial_size),
            ("initial_rotation", &self.core.initial_rotation),
            ("angle", &self.shape.angle),
        ];
        for (field, spec) in scalars {
            if let Variation::Range { min, max } = *spec {
                if !spec.is_ordered() {
                    return Err(EmberError::InvalidRange {
                        field: field.to_string(),
                        min,
                        max,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        let options = EmitterOptions::default();
        assert!(options.validate().is_ok());
        assert!(options.emission.rate > 0.0);
        assert!(options.core.loops < 0);
        assert_eq!(options.core.despawning_rules.len(), 1);
    }

    #[test]
    fn rejects_non_positive_rate() {
        let mut options = EmitterOptions::default();
        options.emission.rate = 0.0;
        assert_eq!(options.validate(), Err(EmberError::InvalidRate(0.0)));
        options.emission.rate = f64::INFINITY;
        assert!(matches!(options.validate(), Err(EmberError::InvalidRate(_))));
    }

    #[test]
    fn rejects_non_positive_duration() {
        let mut options = EmitterOptions::default();
        options.core.duration = -1.0;
        assert_eq!(options.validate(), Err(EmberError::InvalidDuration(-1.0)));
    }

    #[test]
    fn rejects_bad_capacity() {
        let mut options = EmitterOptions::default();
        options.core.max_particles = 0;
        assert_eq!(options.validate(), Err(EmberError::InvalidCapacity(0)));
        options.core.max_particles = MAX_PARTICLE_CAPACITY + 1;
        assert!(matches!(
            options.validate(),
            Err(EmberError::InvalidCapacity(_))
        ));
    }

    #[test]
    fn rejects_inverted_ranges() {
        let mut options = EmitterOptions::default();
        options.core.initial_speed = Variation::range(5.0, 1.0);
        match options.validate() {
            Err(EmberError::InvalidRange { field, .. }) => assert_eq!(field, "initial_speed"),
            other => panic!("expected InvalidRange, got {other:?}"),
        }
    }

    #[test]
    fn burst_times_are_not_validated() {
        let mut options = EmitterOptions::default();
        options.emission.bursts = vec![Burst::new(-1.0, 3), Burst::new(99.0, 3)];
        assert!(options.validate().is_ok());
    }

    #[test]
    fn parse_partial_options_from_toml() {
        let src = r#"
[core]
duration = 2
loops = 3
max_particles = 500
initial_lifetime = { min = 0.5, max = 1.5 }
initial_colour = { r = 1.0, g = 0.5, b = 0.0 }

[emission]
rate = 50.0
bursts = [{ time = 0.0, count = 10 }, { time = 1.0, count = { min = 2, max = 4 } }]

[shape]
source = { shape = "rect", min = [-1.0, 0.0], max = [1.0, 0.0] }

[renderer]
blend_mode = "additive"
"#;
        let options: EmitterOptions = toml::from_str(src).unwrap();
        assert_eq!(options.core.duration, 2.0);
        assert_eq!(options.core.loops, 3);
        assert_eq!(options.core.max_particles, 500);
        assert_eq!(options.core.initial_lifetime, Variation::range(0.5, 1.5));
        assert_eq!(
            options.core.initial_colour,
            Variation::Fixed(Color::new(1.0, 0.5, 0.0, 1.0))
        );
        assert_eq!(options.core.gravity, DEFAULT_GRAVITY);
        assert_eq!(options.emission.rate, 50.0);
        assert_eq!(options.emission.bursts.len(), 2);
        assert_eq!(options.emission.bursts[1].count, Variation::range(2, 4));
        assert_eq!(options.renderer.blend_mode, ParticleBlendMode::Additive);
        assert!(options.validate().is_ok());
    }
}
