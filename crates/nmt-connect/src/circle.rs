//! Circles of a connection and their radius classification.

use std::f64::consts::TAU;

use nmt_core::{ConnectionConfig, Tolerance};
use nmt_math::{FlatExt, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::curve::Arc;
use crate::edge::{EdgeAnchor, EdgeEnd};

/// Sweeps this close to a full turn are treated as empty.
const FULL_TURN_SNAP: f64 = 1e-7;

/// Turning direction of a circle.
///
/// `Right` places the centre on the clockwise side of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn is_right(self) -> bool {
        self == Self::Right
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// `+1` for right, `-1` for left.
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Result of classifying a circle's radius against the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RadiusOutcome {
    Calculated,
    BigRadius,
    SmallRadius,
    /// No finite positive radius could be determined.
    Degenerate,
}

impl RadiusOutcome {
    pub fn success(self) -> bool {
        self == Self::Calculated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CircleKind {
    /// Centre and radius are user parameters.
    Free,
    /// Tangent to a guide trajectory at a fixed offset.
    Edge(EdgeAnchor),
}

/// One arc of a connection.
///
/// The arc runs from the start radius direction to the end radius direction
/// (unit vectors from the centre toward the tangent points), turning
/// according to [`Direction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    kind: CircleKind,
    direction: Direction,
    center: Point3,
    radius: f64,
    pinned_radius: Option<f64>,
    start_radius_dir: Vector3,
    end_radius_dir: Vector3,
    outcome: Option<RadiusOutcome>,
    is_correct: bool,
}

impl Circle {
    pub fn free(center: Point3, radius: f64, direction: Direction) -> Self {
        Self::with_kind(CircleKind::Free, center, radius, direction)
    }

    /// Edge circle anchored to `anchor`. The direction is normally replaced
    /// by [`get_sides`](crate::edge::get_sides) right after construction.
    pub fn edge(anchor: EdgeAnchor) -> Self {
        let center = anchor.position();
        Self::with_kind(CircleKind::Edge(anchor), center, 0.0, Direction::Right)
    }

    fn with_kind(kind: CircleKind, center: Point3, radius: f64, direction: Direction) -> Self {
        Self {
            kind,
            direction,
            center,
            radius,
            pinned_radius: None,
            start_radius_dir: Vector3::X,
            end_radius_dir: Vector3::X,
            outcome: None,
            is_correct: false,
        }
    }

    pub fn kind(&self) -> &CircleKind {
        &self.kind
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.kind, CircleKind::Edge(_))
    }

    pub fn edge_anchor(&self) -> Option<&EdgeAnchor> {
        match &self.kind {
            CircleKind::Edge(anchor) => Some(anchor),
            CircleKind::Free => None,
        }
    }

    pub(crate) fn edge_anchor_mut(&mut self) -> Option<&mut EdgeAnchor> {
        match &mut self.kind {
            CircleKind::Edge(anchor) => Some(anchor),
            CircleKind::Free => None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_right(&self) -> bool {
        self.direction.is_right()
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Move a free circle. Edge circles derive their centre from the anchor
    /// and ignore this; use [`EdgeAnchor::set_center`] instead.
    pub fn set_free_center(&mut self, center: Point3) {
        if !self.is_edge() {
            self.center = center;
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn pinned_radius(&self) -> Option<f64> {
        self.pinned_radius
    }

    /// Pin the radius so it overrides the solved default, or unpin it.
    ///
    /// Free circles keep their last radius when unpinned.
    pub fn set_pinned_radius(&mut self, radius: Option<f64>) {
        if let (Some(r), CircleKind::Free) = (radius, &self.kind) {
            self.radius = r;
        }
        self.pinned_radius = radius;
    }

    /// The radius this circle will use when it carries its own; the edge
    /// solver default does not count.
    pub fn own_radius(&self) -> Option<f64> {
        match self.kind {
            CircleKind::Free => Some(self.pinned_radius.unwrap_or(self.radius)),
            CircleKind::Edge(_) => self.pinned_radius,
        }
    }

    pub fn start_radius_dir(&self) -> Vector3 {
        self.start_radius_dir
    }

    pub fn end_radius_dir(&self) -> Vector3 {
        self.end_radius_dir
    }

    /// Ignored on a first edge circle, whose start is fixed by its guide.
    pub fn set_start_radius_dir(&mut self, dir: Vector3) {
        if self.edge_anchor().map(|a| a.end) != Some(EdgeEnd::First) {
            self.start_radius_dir = dir;
        }
    }

    /// Ignored on a last edge circle, whose end is fixed by its guide.
    pub fn set_end_radius_dir(&mut self, dir: Vector3) {
        if self.edge_anchor().map(|a| a.end) != Some(EdgeEnd::Last) {
            self.end_radius_dir = dir;
        }
    }

    pub fn start_pos(&self) -> Point3 {
        match &self.kind {
            CircleKind::Edge(anchor) if anchor.end == EdgeEnd::First => anchor.position(),
            _ => self.center + self.start_radius_dir * self.radius,
        }
    }

    pub fn end_pos(&self) -> Point3 {
        match &self.kind {
            CircleKind::Edge(anchor) if anchor.end == EdgeEnd::Last => anchor.position(),
            _ => self.center + self.end_radius_dir * self.radius,
        }
    }

    pub fn start_dir(&self) -> Vector3 {
        match &self.kind {
            CircleKind::Edge(anchor) if anchor.end == EdgeEnd::First => anchor.direction(),
            _ => self.start_radius_dir.turn90(self.is_right()),
        }
    }

    pub fn end_dir(&self) -> Vector3 {
        match &self.kind {
            CircleKind::Edge(anchor) if anchor.end == EdgeEnd::Last => -anchor.direction(),
            _ => self.end_radius_dir.turn90(self.is_right()),
        }
    }

    /// Unsigned turning angle from start to end, in `[0, 2π)`.
    pub fn sweep(&self) -> f64 {
        let start = self.start_radius_dir.absolute_angle();
        let end = self.end_radius_dir.absolute_angle();
        let sweep = match self.direction {
            Direction::Left => (end - start).rem_euclid(TAU),
            Direction::Right => (start - end).rem_euclid(TAU),
        };
        if sweep >= TAU - FULL_TURN_SNAP {
            0.0
        } else {
            sweep
        }
    }

    pub fn arc_length(&self) -> f64 {
        self.sweep() * self.radius
    }

    pub fn arc(&self) -> Arc {
        let sweep = match self.direction {
            Direction::Left => self.sweep(),
            Direction::Right => -self.sweep(),
        };
        Arc::new(
            self.center,
            self.radius,
            self.start_radius_dir.absolute_angle(),
            sweep,
        )
    }

    /// Outcome of the last [`calculate`](Self::calculate), if any.
    pub fn outcome(&self) -> Option<RadiusOutcome> {
        self.outcome
    }

    /// Radius outcome succeeded and no pairwise check failed.
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    pub(crate) fn set_correct(&mut self, correct: bool) {
        self.is_correct = correct;
    }

    /// Resolve the radius, place edge circles and classify the result.
    ///
    /// `default_radius` is the solver's value for an edge circle without a
    /// pinned radius; free circles ignore it. Neighbours are not touched.
    pub fn calculate(&mut self, default_radius: Option<f64>, config: &ConnectionConfig) -> RadiusOutcome {
        let source = match self.kind {
            CircleKind::Free => self.own_radius(),
            CircleKind::Edge(_) => self.pinned_radius.or(default_radius),
        };

        let outcome = match source {
            Some(radius) if radius.is_finite() && radius > 0.0 => {
                self.radius = radius;
                if let CircleKind::Edge(anchor) = &self.kind {
                    let (center, radius_dir) = anchor.placement(self.direction, radius);
                    self.center = center;
                    match anchor.end {
                        EdgeEnd::First => self.start_radius_dir = radius_dir,
                        EdgeEnd::Last => self.end_radius_dir = radius_dir,
                    }
                }
                classify(radius, config)
            }
            _ => {
                self.radius = 0.0;
                RadiusOutcome::Degenerate
            }
        };

        log::trace!(
            "circle {:?} {:?}: radius {:.3} -> {:?}",
            self.direction,
            self.edge_anchor().map(|a| a.end),
            self.radius,
            outcome
        );

        self.outcome = Some(outcome);
        self.is_correct = outcome.success();
        outcome
    }
}

fn classify(radius: f64, config: &ConnectionConfig) -> RadiusOutcome {
    if radius > config.max_radius {
        RadiusOutcome::BigRadius
    } else if radius < config.min_radius {
        RadiusOutcome::SmallRadius
    } else {
        RadiusOutcome::Calculated
    }
}

/// Signed radius offset of the tangent between `a` and `b`.
///
/// Its magnitude is the radius difference for equal directions and the
/// radius sum for opposite ones.
pub(crate) fn radius_offset(a: &Circle, b: &Circle) -> f64 {
    b.direction.sign() * b.radius - a.direction.sign() * a.radius
}

/// Whether a tangent can link `a` to `b`. Symmetric in its arguments.
pub fn check_radii(a: &Circle, b: &Circle, tolerance: &Tolerance) -> bool {
    let valid = |r: f64| r.is_finite() && r > 0.0;
    if !valid(a.radius) || !valid(b.radius) {
        return false;
    }
    let distance = a.center.flat_distance(b.center);
    let q = radius_offset(a, b);
    distance >= q.abs() - tolerance.scaled(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmt_math::{cross_xz, DVec3, Trajectory};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn config() -> ConnectionConfig {
        ConnectionConfig::default()
    }

    #[test]
    fn test_free_circle_classification() {
        let cfg = config();
        let mut c = Circle::free(DVec3::ZERO, 50.0, Direction::Left);
        assert_eq!(c.calculate(None, &cfg), RadiusOutcome::Calculated);
        assert!(c.is_correct());

        c.set_pinned_radius(Some(2000.0));
        assert_eq!(c.calculate(None, &cfg), RadiusOutcome::BigRadius);
        assert!(!c.is_correct());

        c.set_pinned_radius(Some(3.0));
        assert_eq!(c.calculate(None, &cfg), RadiusOutcome::SmallRadius);

        c.set_pinned_radius(None);
        assert_eq!(c.radius(), 3.0);
    }

    #[test]
    fn test_degenerate_radius() {
        let cfg = config();
        let anchor = EdgeAnchor::new(EdgeEnd::First, Trajectory::ray(DVec3::ZERO, DVec3::X)).unwrap();
        let mut c = Circle::edge(anchor);
        assert_eq!(c.calculate(None, &cfg), RadiusOutcome::Degenerate);
        assert_eq!(c.calculate(Some(f64::INFINITY), &cfg), RadiusOutcome::Degenerate);
        assert_eq!(c.calculate(Some(-4.0), &cfg), RadiusOutcome::Degenerate);
        assert!(!c.is_correct());
    }

    #[test]
    fn test_degenerate_drops_previous_radius() {
        let cfg = config();
        let anchor = EdgeAnchor::new(EdgeEnd::First, Trajectory::ray(DVec3::ZERO, DVec3::X)).unwrap();
        let mut c = Circle::edge(anchor);
        assert_eq!(c.calculate(Some(60.0), &cfg), RadiusOutcome::Calculated);
        assert_eq!(c.radius(), 60.0);
        assert_eq!(c.calculate(None, &cfg), RadiusOutcome::Degenerate);
        assert_eq!(c.radius(), 0.0);
    }

    #[test]
    fn test_pinned_overrides_default() {
        let cfg = config();
        let anchor = EdgeAnchor::new(EdgeEnd::First, Trajectory::ray(DVec3::ZERO, DVec3::X)).unwrap();
        let mut c = Circle::edge(anchor);
        c.set_pinned_radius(Some(40.0));
        assert_eq!(c.calculate(Some(900.0), &cfg), RadiusOutcome::Calculated);
        assert_eq!(c.radius(), 40.0);
    }

    #[test]
    fn test_sweep_by_direction() {
        let mut left = Circle::free(DVec3::ZERO, 10.0, Direction::Left);
        left.set_start_radius_dir(-DVec3::Z);
        left.set_end_radius_dir(DVec3::X);
        assert!((left.sweep() - FRAC_PI_2).abs() < 1e-12);
        assert!((left.arc_length() - 5.0 * PI).abs() < 1e-9);

        let mut right = left.clone();
        right.set_direction(Direction::Right);
        assert!((right.sweep() - 3.0 * FRAC_PI_2).abs() < 1e-12);

        left.set_end_radius_dir(-DVec3::Z);
        assert_eq!(left.sweep(), 0.0);
    }

    #[test]
    fn test_tangent_direction_matches_turn() {
        let mut c = Circle::free(DVec3::ZERO, 10.0, Direction::Right);
        c.set_start_radius_dir(DVec3::Z);
        // Travelling +X with the centre on the right (-Z side)
        assert!((c.start_dir() - DVec3::X).length() < 1e-12);
        assert!(cross_xz(c.start_dir(), c.center() - c.start_pos()) > 0.0);
    }

    #[test]
    fn test_check_radii_symmetric() {
        let tol = Tolerance::default();
        let a = Circle::free(DVec3::ZERO, 30.0, Direction::Left);
        let b = Circle::free(DVec3::new(50.0, 0.0, 0.0), 30.0, Direction::Right);
        // Opposite directions need the radius sum
        assert!(!check_radii(&a, &b, &tol));
        assert!(!check_radii(&b, &a, &tol));

        let c = Circle::free(DVec3::new(50.0, 0.0, 0.0), 30.0, Direction::Left);
        assert!(check_radii(&a, &c, &tol));
        assert!(check_radii(&c, &a, &tol));

        let touching = Circle::free(DVec3::new(60.0, 0.0, 0.0), 30.0, Direction::Right);
        assert!(check_radii(&a, &touching, &tol));
        assert!(check_radii(&touching, &a, &tol));
    }

    #[test]
    fn test_check_radii_rejects_zero_radius() {
        let tol = Tolerance::default();
        let a = Circle::free(DVec3::ZERO, 0.0, Direction::Left);
        let b = Circle::free(DVec3::new(500.0, 0.0, 0.0), 10.0, Direction::Left);
        assert!(!check_radii(&a, &b, &tol));
    }
}
