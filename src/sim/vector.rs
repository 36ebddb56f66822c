//! 2D vector math
//!
//! `Vec2` is glam's double-precision vector. Add, subtract, scale and negate
//! come from its operators; the helpers here cover the rest and pin down the
//! edge cases the simulation relies on (zero-length normalize, angle
//! conventions). Every function takes its arguments by value and returns a
//! new vector.

use std::f64::consts::{PI, TAU};

pub use glam::DVec2 as Vec2;

/// Default tolerance for [`approx_eq`]
pub const EPSILON: f64 = 1e-9;

#[inline]
pub fn dot(a: Vec2, b: Vec2) -> f64 {
    a.dot(b)
}

/// 2D cross product (z component of the 3D cross product)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

#[inline]
pub fn length(v: Vec2) -> f64 {
    v.length()
}

#[inline]
pub fn length_squared(v: Vec2) -> f64 {
    v.length_squared()
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    (b - a).length()
}

/// Unit vector in the direction of `v`, or zero for a zero-length input
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Rotate `v` counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// `v` turned 90° counter-clockwise
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

#[inline]
pub fn lerp(a: Vec2, b: Vec2, t: f64) -> Vec2 {
    a + (b - a) * t
}

/// Unit vector pointing along `angle` (0 = +X, π/2 = +Y)
#[inline]
pub fn heading(angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos, sin)
}

#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Normalize an angle to [-π, π)
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Shorten `v` to at most `max` length, keeping its direction
pub fn clamp_length(v: Vec2, max: f64) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > max * max && len_sq > 0.0 {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}

/// Component-wise equality within `epsilon`
#[inline]
pub fn approx_eq(a: Vec2, b: Vec2, epsilon: f64) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
        let n = normalize(Vec2::new(3.0, 4.0));
        assert!(approx_eq(n, Vec2::new(0.6, 0.8), EPSILON));
    }

    #[test]
    fn test_cross_sign() {
        let x = Vec2::new(1.0, 0.0);
        let y = Vec2::new(0.0, 1.0);
        assert_eq!(cross(x, y), 1.0);
        assert_eq!(cross(y, x), -1.0);
        assert_eq!(cross(x, x * 5.0), 0.0);
    }

    #[test]
    fn test_rotate_and_perpendicular_agree() {
        let v = Vec2::new(2.0, -1.0);
        assert!(approx_eq(rotate(v, FRAC_PI_2), perpendicular(v), EPSILON));
        assert!(approx_eq(rotate(v, PI), -v, EPSILON));
    }

    #[test]
    fn test_heading() {
        assert!(approx_eq(heading(0.0), Vec2::X, EPSILON));
        assert!(approx_eq(heading(FRAC_PI_2), Vec2::Y, EPSILON));
    }

    #[test]
    fn test_angle_conversions() {
        assert!((deg_to_rad(180.0) - PI).abs() < EPSILON);
        assert!((rad_to_deg(FRAC_PI_2) - 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_normalize_angle_range() {
        for raw in [-10.0, -PI, -0.5, 0.0, PI, 3.5 * PI, 100.0] {
            let a = normalize_angle(raw);
            assert!((-PI..PI).contains(&a), "{raw} -> {a}");
            assert!(((a - raw) / TAU - ((a - raw) / TAU).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_clamp_length() {
        let v = Vec2::new(30.0, 40.0);
        assert!(approx_eq(clamp_length(v, 5.0), Vec2::new(3.0, 4.0), EPSILON));
        assert_eq!(clamp_length(v, 100.0), v);
        assert_eq!(clamp_length(Vec2::ZERO, 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(3.0, 5.0);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert!(approx_eq(lerp(a, b, 0.5), Vec2::new(2.0, 3.0), EPSILON));
    }

    #[test]
    fn test_arguments_untouched() {
        let a = Vec2::new(1.0, 2.0);
        let _ = rotate(a, 1.0);
        let _ = normalize(a);
        assert_eq!(a, Vec2::new(1.0, 2.0));
        assert!((distance(a, Vec2::new(4.0, 6.0)) - 5.0).abs() < EPSILON);
        assert_eq!(dot(a, a), length_squared(a));
        assert!((length(Vec2::new(3.0, 4.0)) - 5.0).abs() < EPSILON);
    }
}
