use nmt_core::Tolerance;
use nmt_math::{FlatExt, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::circle::{radius_offset, Circle};
use crate::curve::Line;

/// Straight tangent section of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Straight {
    pub start: Point3,
    pub end: Point3,
    /// Unit travel direction. Kept explicitly so zero-length straights
    /// still report a heading.
    pub direction: Vector3,
    /// Right-hand normal of `direction`.
    pub normal: Vector3,
}

impl Straight {
    pub fn new(start: Point3, end: Point3, direction: Vector3) -> Self {
        let direction = direction.make_flat_normalized();
        Self {
            start,
            end,
            direction,
            normal: direction.turn90(true),
        }
    }

    /// Horizontal length.
    pub fn length(&self) -> f64 {
        self.start.flat_distance(self.end)
    }

    /// Position at `t ∈ [0, 1]`.
    pub fn position(&self, t: f64) -> Point3 {
        self.start.lerp(self.end, t)
    }

    pub fn tangent(&self) -> Vector3 {
        self.direction
    }

    pub fn line(&self) -> Line {
        Line::new(self.start, self.end)
    }
}

/// Outer tangent from the end of `a` to the start of `b`.
///
/// Writes `a`'s end radius direction and `b`'s start radius direction.
/// Coincident circles of equal signed radius join at `a`'s start. When no
/// tangent exists, the radius directions are left untouched and a straight
/// between the centres is returned for display.
pub fn tangent_link(a: &mut Circle, b: &mut Circle, tolerance: &Tolerance) -> Straight {
    let ca = a.center();
    let cb = b.center();
    let delta = (cb - ca).make_flat();
    let d2 = delta.length_squared();
    let q = radius_offset(a, b);
    let eps = tolerance.scaled(a.radius().max(b.radius()));

    if d2.sqrt() <= eps && q.abs() <= eps {
        let rd = a.start_radius_dir();
        a.set_end_radius_dir(rd);
        b.set_start_radius_dir(rd);
        let point = a.start_pos();
        return Straight::new(point, point, a.start_dir());
    }

    let l2 = d2 - q * q;
    if d2 <= 0.0 || l2 < -eps * eps.max(d2.sqrt()) {
        log::trace!("no tangent between circles: d^2 = {d2:.3}, q = {q:.3}");
        return Straight::new(ca, cb, delta);
    }

    let l = l2.max(0.0).sqrt();
    let tangent = Vector3::new(
        (l * delta.x - q * delta.z) / d2,
        0.0,
        (q * delta.x + l * delta.z) / d2,
    )
    .normalize_or_zero();
    let normal = tangent.turn90(true);

    let ka = a.direction().sign();
    let kb = b.direction().sign();
    a.set_end_radius_dir(-normal * ka);
    b.set_start_radius_dir(-normal * kb);

    Straight::new(
        ca - normal * (ka * a.radius()),
        cb - normal * (kb * b.radius()),
        tangent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circle::Direction;
    use nmt_math::{dot_xz, DVec3};

    fn assert_tangent(c: &Circle, point: Point3, dir: Vector3) {
        let radial = point - c.center();
        assert!((radial.flat_length() - c.radius()).abs() < 1e-9);
        assert!(dot_xz(radial, dir).abs() < 1e-9);
    }

    #[test]
    fn test_straight_basics() {
        let s = Straight::new(DVec3::ZERO, DVec3::new(10.0, 2.0, 0.0), DVec3::X);
        assert!((s.length() - 10.0).abs() < 1e-12);
        assert!((s.position(0.5) - DVec3::new(5.0, 1.0, 0.0)).length() < 1e-12);
        assert!((s.normal + DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_outer_tangent_same_direction() {
        let tol = Tolerance::default();
        let mut a = Circle::free(DVec3::ZERO, 10.0, Direction::Left);
        let mut b = Circle::free(DVec3::new(100.0, 0.0, 0.0), 10.0, Direction::Left);
        let s = tangent_link(&mut a, &mut b, &tol);
        assert!((s.length() - 100.0).abs() < 1e-9);
        assert!((s.direction - DVec3::X).length() < 1e-9);
        // Left circles travelling +X touch on their -Z side
        assert!((s.start - DVec3::new(0.0, 0.0, -10.0)).length() < 1e-9);
        assert_tangent(&a, s.start, s.direction);
        assert_tangent(&b, s.end, s.direction);
        assert!((a.end_radius_dir() + DVec3::Z).length() < 1e-9);
        assert!((b.start_radius_dir() + DVec3::Z).length() < 1e-9);
        assert!((a.end_dir() - s.direction).length() < 1e-9);
        assert!((b.start_dir() - s.direction).length() < 1e-9);
    }

    #[test]
    fn test_cross_tangent_opposite_direction() {
        let tol = Tolerance::default();
        let mut a = Circle::free(DVec3::ZERO, 65.0, Direction::Left);
        let mut b = Circle::free(DVec3::new(100.0, 0.0, -110.0), 65.0, Direction::Right);
        let s = tangent_link(&mut a, &mut b, &tol);
        assert!((s.length() - 5200f64.sqrt()).abs() < 1e-9);
        assert_tangent(&a, s.start, s.direction);
        assert_tangent(&b, s.end, s.direction);
        assert!((a.end_dir() - s.direction).length() < 1e-9);
        assert!((b.start_dir() - s.direction).length() < 1e-9);
    }

    #[test]
    fn test_infeasible_falls_back_to_centre_line() {
        let tol = Tolerance::default();
        let mut a = Circle::free(DVec3::ZERO, 30.0, Direction::Left);
        let mut b = Circle::free(DVec3::new(40.0, 0.0, 0.0), 30.0, Direction::Right);
        let before = a.end_radius_dir();
        let s = tangent_link(&mut a, &mut b, &tol);
        assert_eq!(s.start, DVec3::ZERO);
        assert_eq!(s.end, DVec3::new(40.0, 0.0, 0.0));
        assert_eq!(a.end_radius_dir(), before);
    }

    #[test]
    fn test_coincident_circles_join_at_start() {
        let tol = Tolerance::default();
        let mut a = Circle::free(DVec3::ZERO, 20.0, Direction::Right);
        a.set_start_radius_dir(DVec3::Z);
        let mut b = Circle::free(DVec3::ZERO, 20.0, Direction::Right);
        let s = tangent_link(&mut a, &mut b, &tol);
        assert_eq!(s.length(), 0.0);
        assert_eq!(a.sweep(), 0.0);
        assert_eq!(b.start_radius_dir(), DVec3::Z);
    }
}
