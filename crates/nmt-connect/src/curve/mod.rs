//! Pieces a connection path is made of.

mod arc;
mod line;

use nmt_math::{Point3, Vector3};

pub use arc::Arc;
pub use line::Line;

/// A path piece sampled by parameter.
///
/// Lengths are measured in plan; heights only ride along.
pub trait Curve: Send + Sync {
    fn point_at(&self, t: f64) -> Point3;

    /// Direction of travel at `t`, not necessarily unit length.
    fn tangent_at(&self, t: f64) -> Vector3;

    fn domain(&self) -> (f64, f64);

    fn length(&self) -> f64;
}
