use nmt_math::{FlatExt, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::Curve;

/// Straight piece of a path; `t = 0` at `start`, `t = 1` at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point3,
    pub end: Point3,
}

impl Line {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }
}

impl Curve for Line {
    fn point_at(&self, t: f64) -> Point3 {
        self.start.lerp(self.end, t)
    }

    fn tangent_at(&self, _t: f64) -> Vector3 {
        (self.end - self.start).make_flat_normalized()
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn length(&self) -> f64 {
        self.start.flat_distance(self.end)
    }
}
