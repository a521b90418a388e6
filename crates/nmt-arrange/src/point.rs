use nmt_core::NodeId;
use nmt_math::{direction_from_angle, normalize_angle, Point3};
use serde::{Deserialize, Serialize};

/// A node placed on the arrangement circle at a heading from the centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePoint {
    pub node: NodeId,
    angle: f64,
}

impl CirclePoint {
    /// The angle is normalised into `[0, 2π)`.
    pub fn new(node: NodeId, angle: f64) -> Self {
        Self {
            node,
            angle: normalize_angle(angle),
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Rotated copy; positive `delta` increases the heading.
    pub fn turn(&self, delta: f64) -> Self {
        Self::new(self.node, self.angle + delta)
    }

    /// Position on a circle, at the centre's height.
    pub fn position(&self, center: Point3, radius: f64) -> Point3 {
        center + direction_from_angle(self.angle) * radius
    }
}
