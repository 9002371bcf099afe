//! 2D spawn regions

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Sampler;

/// A 2D area that spawn locations are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Region {
    Point { at: Vec2 },
    Rect { min: Vec2, max: Vec2 },
    Circle { center: Vec2, radius: f32 },
}

impl Region {
    pub fn point(x: f32, y: f32) -> Self {
        Region::Point { at: Vec2::new(x, y) }
    }

    /// Sample one point uniformly distributed inside the region
    pub fn sample_inside<S: Sampler + ?Sized>(&self, sampler: &mut S) -> Vec2 {
        match *self {
            Region::Point { at } => at,
            Region::Rect { min, max } => Vec2::new(
                sampler.range(min.x, max.x),
                sampler.range(min.y, max.y),
            ),
            Region::Circle { center, radius } => {
                // sqrt keeps the density uniform over the disc area
                let r = radius * sampler.next_unit().sqrt();
                let theta = sampler.range(0.0, std::f32::consts::TAU);
                center + Vec2::from_angle(theta) * r
            }
        }
    }

    /// Whether `p` lies inside (or on the edge of) the region
    pub fn contains(&self, p: Vec2) -> bool {
        match *self {
            Region::Point { at } => at == p,
            Region::Rect { min, max } => {
                p.x >= min.x.min(max.x)
                    && p.x <= min.x.max(max.x)
                    && p.y >= min.y.min(max.y)
                    && p.y <= min.y.max(max.y)
            }
            Region::Circle { center, radius } => p.distance(center) <= radius.abs() + 1e-5,
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Region::Point { at: Vec2::ZERO }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstantSampler, SeededSampler};

    #[test]
    fn point_always_returns_itself() {
        let region = Region::point(1.0, -2.0);
        let mut s = SeededSampler::new(1);
        assert_eq!(region.sample_inside(&mut s), Vec2::new(1.0, -2.0));
    }

    #[test]
    fn rect_samples_stay_inside() {
        let region = Region::Rect {
            min: Vec2::new(-1.0, 0.0),
            max: Vec2::new(1.0, 4.0),
        };
        let mut s = SeededSampler::new(11);
        for _ in 0..500 {
            assert!(region.contains(region.sample_inside(&mut s)));
        }
    }

    #[test]
    fn circle_samples_stay_inside() {
        let region = Region::Circle {
            center: Vec2::new(3.0, 3.0),
            radius: 2.0,
        };
        let mut s = SeededSampler::new(5);
        for _ in 0..500 {
            assert!(region.contains(region.sample_inside(&mut s)));
        }
    }

    #[test]
    fn constant_sampler_hits_rect_midpoint() {
        let region = Region::Rect {
            min: Vec2::ZERO,
            max: Vec2::new(4.0, 2.0),
        };
        let p = region.sample_inside(&mut ConstantSampler(0.5));
        assert_eq!(p, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn tagged_deserialization() {
        let src = r#"
shape = "circle"
center = [0.0, 1.0]
radius = 0.5
"#;
        let region: Region = toml::from_str(src).unwrap();
        assert_eq!(
            region,
            Region::Circle {
                center: Vec2::new(0.0, 1.0),
                radius: 0.5
            }
        );
    }
}
