//! Minimum enclosing circle of a small point set.
//!
//! Exhaustive search over every pair (as a diameter) and every triple (as a
//! circumcircle). Cubic in the number of points, which stays small since the
//! points are picked by hand.

use nmt_core::Tolerance;
use nmt_math::{FlatExt, Point3, Trajectory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnclosingCircle {
    /// Centre on the horizontal plane, at the mean height of the points.
    pub center: Point3,
    pub radius: f64,
}

impl EnclosingCircle {
    pub fn contains(&self, point: Point3, tolerance: &Tolerance) -> bool {
        self.center.flat_distance(point) <= self.radius + tolerance.scaled(self.radius)
    }
}

/// Smallest circle containing every point in plan.
///
/// Returns `None` for an empty set, or when no candidate beats
/// `initial_radius`. A single point yields a circle of radius zero.
pub fn min_enclosing_circle(
    points: &[Point3],
    initial_radius: f64,
    tolerance: &Tolerance,
) -> Option<EnclosingCircle> {
    let height = points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64;
    let flat: Vec<Point3> = points.iter().map(|p| p.make_flat()).collect();

    let mut best: Option<EnclosingCircle> = match flat.as_slice() {
        [] => return None,
        [single] => Some(EnclosingCircle {
            center: *single,
            radius: 0.0,
        }),
        _ => None,
    };
    let mut best_radius = if best.is_some() { 0.0 } else { initial_radius };

    let mut consider = |candidate: EnclosingCircle, best: &mut Option<EnclosingCircle>| {
        if candidate.radius < best_radius && flat.iter().all(|p| candidate.contains(*p, tolerance)) {
            best_radius = candidate.radius;
            *best = Some(candidate);
        }
    };

    for i in 0..flat.len() {
        for j in i + 1..flat.len() {
            consider(
                EnclosingCircle {
                    center: (flat[i] + flat[j]) * 0.5,
                    radius: flat[i].flat_distance(flat[j]) * 0.5,
                },
                &mut best,
            );

            for k in j + 1..flat.len() {
                match circumcircle(flat[i], flat[j], flat[k]) {
                    Some(candidate) => consider(candidate, &mut best),
                    None => log::trace!("skipping collinear triple ({i}, {j}, {k})"),
                }
            }
        }
    }

    best.map(|mut circle| {
        circle.center.y = height;
        circle
    })
}

/// Circle through three flat points, by intersecting two perpendicular
/// bisectors. `None` for collinear points.
fn circumcircle(a: Point3, b: Point3, c: Point3) -> Option<EnclosingCircle> {
    let bisector_ab = Trajectory::ray((a + b) * 0.5, (b - a).turn90(true));
    let bisector_bc = Trajectory::ray((b + c) * 0.5, (c - b).turn90(true));
    if bisector_ab.is_degenerate() || bisector_bc.is_degenerate() {
        return None;
    }
    let (t, _) = bisector_ab.intersect_lines(&bisector_bc)?;
    let center = bisector_ab.position(t);
    let radius = center.flat_distance(a);
    radius.is_finite().then_some(EnclosingCircle { center, radius })
}
