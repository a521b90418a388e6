//! Operations on the horizontal (X, Z) plane.
//!
//! Sign convention: [`cross_xz`] is positive when `b` lies clockwise of `a`
//! when looking down the Y axis, i.e. to the right of travel along `a`.

use std::f64::consts::TAU;

use glam::{DVec2, DVec3};

/// Horizontal-plane helpers on [`DVec3`].
pub trait FlatExt {
    /// Copy with the height component set to zero.
    fn make_flat(self) -> DVec3;
    /// Flattened and normalized, or zero when the horizontal part vanishes.
    fn make_flat_normalized(self) -> DVec3;
    /// `(x, z)` as a 2D vector.
    fn xz(self) -> DVec2;
    fn flat_length(self) -> f64;
    fn flat_distance(self, other: DVec3) -> f64;
    /// Quarter turn about the Y axis.
    ///
    /// Clockwise maps travel direction to its right-hand side.
    fn turn90(self, clockwise: bool) -> DVec3;
    /// Heading of the horizontal part, `atan2(z, x)`.
    fn absolute_angle(self) -> f64;
}

impl FlatExt for DVec3 {
    fn make_flat(self) -> DVec3 {
        DVec3::new(self.x, 0.0, self.z)
    }

    fn make_flat_normalized(self) -> DVec3 {
        self.make_flat().normalize_or_zero()
    }

    fn xz(self) -> DVec2 {
        DVec2::new(self.x, self.z)
    }

    fn flat_length(self) -> f64 {
        self.xz().length()
    }

    fn flat_distance(self, other: DVec3) -> f64 {
        self.xz().distance(other.xz())
    }

    fn turn90(self, clockwise: bool) -> DVec3 {
        if clockwise {
            DVec3::new(self.z, self.y, -self.x)
        } else {
            DVec3::new(-self.z, self.y, self.x)
        }
    }

    fn absolute_angle(self) -> f64 {
        self.z.atan2(self.x)
    }
}

/// Horizontal cross product, positive when `b` is to the right of `a`.
pub fn cross_xz(a: DVec3, b: DVec3) -> f64 {
    a.z * b.x - a.x * b.z
}

pub fn dot_xz(a: DVec3, b: DVec3) -> f64 {
    a.x * b.x + a.z * b.z
}

/// [`cross_xz`] of the flattened unit vectors; zero if either vanishes.
pub fn normalized_cross_xz(a: DVec3, b: DVec3) -> f64 {
    cross_xz(a.make_flat_normalized(), b.make_flat_normalized())
}

/// Signed angle turning `from` onto `to`, in `(-π, π]`, increasing with heading.
pub fn angle_between_xz(from: DVec3, to: DVec3) -> f64 {
    (from.x * to.z - from.z * to.x).atan2(dot_xz(from, to))
}

/// Unit horizontal vector with heading `angle`.
pub fn direction_from_angle(angle: f64) -> DVec3 {
    DVec3::new(angle.cos(), 0.0, angle.sin())
}

/// Round `value` to the nearest multiple of `step`.
pub fn round_to_nearest(value: f64, step: f64) -> f64 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

/// Map an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}
