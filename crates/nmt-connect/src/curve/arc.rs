//! Horizontal circular arc.

use nmt_math::{direction_from_angle, FlatExt, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::Curve;

/// A horizontal arc at the height of `center`, parameterized by heading over
/// `[start_angle, start_angle + sweep]`.
///
/// Positive `sweep` runs with increasing heading (a left turn), negative
/// against it (a right turn).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point3,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc {
    pub fn new(center: Point3, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    pub fn start_point(&self) -> Point3 {
        self.point_at(self.start_angle)
    }

    pub fn end_point(&self) -> Point3 {
        self.point_at(self.start_angle + self.sweep)
    }
}

impl Curve for Arc {
    fn point_at(&self, t: f64) -> Point3 {
        self.center + direction_from_angle(t) * self.radius
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        // Quarter turn of the radius direction toward the sweep
        let tangent = direction_from_angle(t).turn90(false) * self.radius;
        if self.sweep < 0.0 {
            -tangent
        } else {
            tangent
        }
    }

    fn domain(&self) -> (f64, f64) {
        (self.start_angle, self.start_angle + self.sweep)
    }

    fn length(&self) -> f64 {
        self.sweep.abs() * self.radius
    }
}
