//! Edge circles: the two outer circles anchored to the guide trajectories.
//!
//! Each guide starts at the existing segment end and points into the
//! connection. The anchor sits `offset` along the guide; the circle is
//! tangent to the guide there, so the offset length becomes the outer
//! straight of the connection.

use nmt_core::{ConnectionConfig, NmtError, Result};
use nmt_math::{cross_xz, dot_xz, FlatExt, Point3, Trajectory, Vector3};
use serde::{Deserialize, Serialize};

use crate::circle::{Circle, Direction};

/// Which end of the connection an edge circle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeEnd {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeAnchor {
    pub end: EdgeEnd,
    guide: Trajectory,
    offset: f64,
}

impl EdgeAnchor {
    pub fn new(end: EdgeEnd, guide: Trajectory) -> Result<Self> {
        if guide.is_degenerate() {
            return Err(NmtError::Geometry(format!(
                "{end:?} guide has no horizontal direction"
            )));
        }
        Ok(Self {
            end,
            guide: Trajectory::ray(guide.start, guide.direction),
            offset: 0.0,
        })
    }

    pub fn guide(&self) -> &Trajectory {
        &self.guide
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Negative values clamp to zero.
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset.max(0.0);
    }

    /// Tangent point on the guide.
    pub fn position(&self) -> Point3 {
        self.guide.position(self.offset)
    }

    /// Unit guide direction, pointing into the connection.
    pub fn direction(&self) -> Vector3 {
        self.guide.tangent()
    }

    /// Unit vector from the anchor toward the centre.
    pub fn side(&self, direction: Direction) -> Vector3 {
        let normal = self.direction().turn90(direction.is_right());
        match self.end {
            EdgeEnd::First => normal,
            EdgeEnd::Last => -normal,
        }
    }

    /// Centre and fixed radius direction for a circle of `radius`.
    pub(crate) fn placement(&self, direction: Direction, radius: f64) -> (Point3, Vector3) {
        let side = self.side(direction);
        (self.position() + side * radius, -side)
    }

    /// Slide the anchor so that the centre line passes through `point`.
    ///
    /// The centre line is perpendicular to the guide, so this projects
    /// `point` onto the guide and clamps to `[0, max_offset]`.
    pub fn set_center(&mut self, point: Point3, max_offset: f64) {
        let t = dot_xz(point - self.guide.start, self.direction());
        self.offset = if t.is_finite() { t.clamp(0.0, max_offset) } else { 0.0 };
    }
}

/// Turning directions for the first and last edge circles.
pub fn get_sides(first: &Circle, last: &Circle) -> (Direction, Direction) {
    let connect = (last.end_pos() - first.start_pos()).make_flat_normalized();

    let first_cross = cross_xz(first.start_dir(), connect) >= 0.0;
    let mut last_cross = cross_xz(-last.end_dir(), -connect) >= 0.0;
    let first_dot = dot_xz(first.start_dir(), connect) >= 0.0;
    let last_dot = dot_xz(-last.end_dir(), -connect) >= 0.0;

    if first_dot != last_dot && first_cross != last_cross {
        last_cross = !last_cross;
    }

    let first_side = if first_cross { Direction::Right } else { Direction::Left };
    let last_side = if last_cross { Direction::Left } else { Direction::Right };
    (first_side, last_side)
}

/// Solved radius for a pair of edge circles that face each other directly.
///
/// Equal directions form a bend: the radius fits the corner where the two
/// guides meet, or half the guide spacing for a U-turn. Opposite directions
/// form an S: the tightest straight-less radius scaled by
/// `reverse_curve_ratio`. `None` when no positive radius exists.
pub fn default_edge_radius(
    first: &EdgeAnchor,
    first_dir: Direction,
    last: &EdgeAnchor,
    last_dir: Direction,
    config: &ConnectionConfig,
) -> Option<f64> {
    let eps = config.tolerance.linear;
    let a1 = first.position();
    let a2 = last.position();
    let u1 = first.direction();
    let u2 = last.direction();
    let delta = (a2 - a1).make_flat();

    if first_dir == last_dir {
        let ray1 = Trajectory::ray(a1, u1);
        let ray2 = Trajectory::ray(a2, u2);
        if let Some((t1, t2)) = ray1.intersect_lines(&ray2) {
            if t1 > eps && t2 > eps {
                let corner = dot_xz(u1, u2).clamp(-1.0, 1.0).acos();
                return Some(t1.min(t2) * (corner / 2.0).tan());
            }
        }
        let spacing = dot_xz(delta, first.side(first_dir)).abs() / 2.0;
        return (spacing > eps).then_some(spacing);
    }

    let w = (last.side(last_dir) - first.side(first_dir)).make_flat();
    let a = dot_xz(w, w) - 4.0;
    let b = 2.0 * dot_xz(delta, w);
    let c = dot_xz(delta, delta);

    let tightest = if a.abs() < eps {
        (b < 0.0).then(|| -c / b)
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            None
        } else {
            let sqrt = discriminant.sqrt();
            [(-b + sqrt) / (2.0 * a), (-b - sqrt) / (2.0 * a)]
                .into_iter()
                .filter(|r| *r > eps)
                .reduce(f64::max)
        }
    };

    tightest
        .filter(|r| r.is_finite() && *r > eps)
        .map(|r| r * config.reverse_curve_ratio)
}
