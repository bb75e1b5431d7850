//! Scalar helpers shared by the ellipsoid and tessellation code

use glam::DVec3;
use std::f64::consts::{PI, TAU};

pub const EPSILON1: f64 = 0.1;
pub const EPSILON2: f64 = 0.01;
pub const EPSILON10: f64 = 1e-10;
pub const EPSILON12: f64 = 1e-12;
pub const EPSILON15: f64 = 1e-15;

/// One degree, the default granularity
pub const RADIANS_PER_DEGREE: f64 = PI / 180.0;

/// Length of the chord subtending `angle` radians on a circle of `radius`
#[inline]
pub fn chord_length(angle: f64, radius: f64) -> f64 {
    2.0 * radius * (angle * 0.5).sin()
}

/// Relative-or-absolute float comparison
#[inline]
pub fn equals_epsilon(left: f64, right: f64, relative: f64, absolute: f64) -> bool {
    let diff = (left - right).abs();
    diff <= absolute || diff <= relative * left.abs().max(right.abs())
}

/// Component-wise [`equals_epsilon`] for vectors
#[inline]
pub fn vec_equals_epsilon(left: DVec3, right: DVec3, relative: f64, absolute: f64) -> bool {
    equals_epsilon(left.x, right.x, relative, absolute)
        && equals_epsilon(left.y, right.y, relative, absolute)
        && equals_epsilon(left.z, right.z, relative, absolute)
}

/// Wrap an angle into `(-PI, PI]`
pub fn negative_pi_to_pi(angle: f64) -> f64 {
    if angle >= -PI && angle <= PI {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}
