use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::flat::{cross_xz, dot_xz, FlatExt};
use crate::{Point3, Vector3};

/// A horizontal line, ray or segment.
///
/// `bound` is `None` for an unbounded ray or line. Intersection and
/// projection ignore height; positions interpolate it along the direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub start: Point3,
    pub direction: Vector3,
    pub bound: Option<f64>,
}

impl Trajectory {
    /// Unbounded ray from `start` along the flattened `direction`.
    pub fn ray(start: Point3, direction: Vector3) -> Self {
        Self {
            start,
            direction: direction.make_flat_normalized(),
            bound: None,
        }
    }

    /// Section from `start` to `end`.
    pub fn between(start: Point3, end: Point3) -> Self {
        let delta = end - start;
        let length = delta.flat_length();
        let direction = if length > 0.0 {
            delta / length
        } else {
            DVec3::ZERO
        };
        Self {
            start,
            direction,
            bound: Some(length),
        }
    }

    /// Unbounded line through `start` and `through`.
    pub fn line(start: Point3, through: Point3) -> Self {
        Self::ray(start, through - start)
    }

    /// Section of `length` along `direction`.
    pub fn section(start: Point3, direction: Vector3, length: f64) -> Self {
        Self {
            start,
            direction: direction.make_flat_normalized(),
            bound: Some(length.max(0.0)),
        }
    }

    pub fn position(&self, t: f64) -> Point3 {
        self.start + self.direction * t
    }

    pub fn tangent(&self) -> Vector3 {
        self.direction.make_flat_normalized()
    }

    /// End point of a section; `None` when unbounded.
    pub fn end_position(&self) -> Option<Point3> {
        self.bound.map(|l| self.position(l))
    }

    /// Section length, infinite when unbounded.
    pub fn length(&self) -> f64 {
        self.bound.unwrap_or(f64::INFINITY)
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction.flat_length() == 0.0
    }

    /// Parameters `(t, s)` where the infinite carrier lines meet, such that
    /// `self.position(t) == other.position(s)` in plan. `None` when parallel.
    pub fn intersect_lines(&self, other: &Trajectory) -> Option<(f64, f64)> {
        let d1 = self.direction.make_flat();
        let d2 = other.direction.make_flat();
        let denom = cross_xz(d1, d2);
        if denom.abs() < 1e-12 {
            return None;
        }
        let w = (other.start - self.start).make_flat();
        let t = cross_xz(w, d2) / denom;
        let s = cross_xz(w, d1) / denom;
        Some((t, s))
    }

    /// Like [`intersect_lines`](Self::intersect_lines) but both parameters
    /// must lie on their trajectories.
    pub fn intersect(&self, other: &Trajectory) -> Option<(f64, f64)> {
        let (t, s) = self.intersect_lines(other)?;
        (self.contains_param(t) && other.contains_param(s)).then_some((t, s))
    }

    /// Parameter of the orthogonal projection of `point`, clamped onto the
    /// trajectory.
    pub fn project(&self, point: Point3) -> f64 {
        let t = dot_xz(point - self.start, self.direction.make_flat());
        match self.bound {
            Some(l) => t.clamp(0.0, l),
            None => t.max(0.0),
        }
    }

    pub fn distance_to_point(&self, point: Point3) -> f64 {
        self.position(self.project(point)).flat_distance(point)
    }

    fn contains_param(&self, t: f64) -> bool {
        const EPS: f64 = 1e-9;
        t >= -EPS && self.bound.map_or(true, |l| t <= l + EPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec3;

    #[test]
    fn test_between() {
        let seg = Trajectory::between(dvec3(0.0, 0.0, 0.0), dvec3(3.0, 2.0, 4.0));
        assert_relative_eq!(seg.length(), 5.0);
        assert_relative_eq!(seg.tangent().length(), 1.0);
        let end = seg.end_position().unwrap();
        assert_relative_eq!(end.x, 3.0);
        assert_relative_eq!(end.y, 2.0);
        assert_relative_eq!(end.z, 4.0);
    }

    #[test]
    fn test_intersect_lines() {
        let a = Trajectory::ray(DVec3::ZERO, DVec3::X);
        let b = Trajectory::ray(dvec3(10.0, 0.0, -5.0), DVec3::Z);
        let (t, s) = a.intersect_lines(&b).unwrap();
        assert_relative_eq!(t, 10.0);
        assert_relative_eq!(s, 5.0);
        assert!(a.intersect(&b).is_some());

        // Behind the ray origin
        let c = Trajectory::ray(dvec3(-10.0, 0.0, -5.0), DVec3::Z);
        assert!(a.intersect_lines(&c).is_some());
        assert!(a.intersect(&c).is_none());
    }

    #[test]
    fn test_parallel() {
        let a = Trajectory::ray(DVec3::ZERO, DVec3::X);
        let b = Trajectory::ray(dvec3(0.0, 0.0, 3.0), -DVec3::X);
        assert!(a.intersect_lines(&b).is_none());
    }

    #[test]
    fn test_line_is_unbounded() {
        let line = Trajectory::line(DVec3::ZERO, dvec3(0.0, 0.0, 2.0));
        assert!(line.end_position().is_none());
        assert!(line.length().is_infinite());
        assert_relative_eq!(line.project(dvec3(1.0, 0.0, 50.0)), 50.0);
    }

    #[test]
    fn test_project_clamps() {
        let seg = Trajectory::section(DVec3::ZERO, DVec3::X, 10.0);
        assert_relative_eq!(seg.project(dvec3(4.0, 0.0, 3.0)), 4.0);
        assert_relative_eq!(seg.project(dvec3(-4.0, 0.0, 3.0)), 0.0);
        assert_relative_eq!(seg.project(dvec3(40.0, 0.0, 3.0)), 10.0);
        assert_relative_eq!(seg.distance_to_point(dvec3(4.0, 0.0, 3.0)), 3.0);
    }
}
