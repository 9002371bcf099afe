//! Linear interpolation helpers shared by variations and lifetime modules

use glam::Vec3;

use crate::Color;

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two RGBA colors
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    a.lerp(b, t)
}

/// Component-wise linear interpolation between two vectors
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a.lerp(b, t)
}

/// Where `value` sits between `a` and `b`, clamped to [0, 1].
/// A degenerate span maps to 1.0.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    let span = b - a;
    if span.abs() <= f32::EPSILON {
        return 1.0;
    }
    ((value - a) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_f32_endpoints() {
        assert!((lerp_f32(0.0, 10.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((lerp_f32(0.0, 10.0, 1.0) - 10.0).abs() < 1e-6);
        assert!((lerp_f32(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn lerp_color_midpoint() {
        let white = Color::new(1.0, 1.0, 1.0, 1.0);
        let black = Color::new(0.0, 0.0, 0.0, 0.0);
        let mid = lerp_color(white, black, 0.5);
        for c in mid.to_array() {
            assert!((c - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn lerp_vec3_quarter() {
        let v = lerp_vec3(Vec3::ZERO, Vec3::new(4.0, 8.0, -4.0), 0.25);
        assert_eq!(v, Vec3::new(1.0, 2.0, -1.0));
    }

    #[test]
    fn inverse_lerp_clamps_and_handles_degenerate_span() {
        assert!((inverse_lerp(2.0, 4.0, 3.0) - 0.5).abs() < 1e-6);
        assert_eq!(inverse_lerp(2.0, 4.0, 10.0), 1.0);
        assert_eq!(inverse_lerp(2.0, 4.0, -1.0), 0.0);
        assert_eq!(inverse_lerp(3.0, 3.0, 3.0), 1.0);
    }
}
