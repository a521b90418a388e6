//! The connection builder.

use nmt_core::{ConnectionConfig, Highlight, Modifiers, NmtError, Result, Validate};
use nmt_math::{dot_xz, round_to_nearest, FlatExt, OverlayItem, Point3, Trajectory};
use serde::{Deserialize, Serialize};

use crate::circle::{check_radii, Circle, Direction, RadiusOutcome};
use crate::edge::{default_edge_radius, get_sides, EdgeAnchor, EdgeEnd};
use crate::parts::Parts;
use crate::straight::{tangent_link, Straight};

/// Radius of the centre marker drawn for circles of a failed solve.
const CENTER_MARKER_RADIUS: f64 = 1.0;

/// Aggregate result of the last solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SolveState {
    /// Nothing solved yet.
    #[default]
    None,
    Calculated,
    BigRadius,
    SmallRadius,
    /// A radius could not be determined or two neighbouring circles overlap.
    WrongShape,
}

impl SolveState {
    pub fn is_calculated(self) -> bool {
        self == Self::Calculated
    }

    pub fn is_failed(self) -> bool {
        matches!(self, Self::BigRadius | Self::SmallRadius | Self::WrongShape)
    }
}

/// Chain of circles and straights joining two segment ends.
///
/// Invariant once initialised: `circles[0]` is the first edge circle,
/// `circles[n - 1]` the last one, every circle in between is free, and
/// `straights.len() == circles.len() + 1`. `straights[i]` leads into
/// `circles[i]`.
///
/// Edits only change parameters; call [`calculate`](Self::calculate) to
/// refresh the geometry.
#[derive(Debug, Clone)]
pub struct Connection {
    config: ConnectionConfig,
    circles: Vec<Circle>,
    straights: Vec<Option<Straight>>,
    state: SolveState,
}

impl Connection {
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            circles: Vec::new(),
            straights: Vec::new(),
            state: SolveState::None,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn state(&self) -> SolveState {
        self.state
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn circle(&self, index: usize) -> Option<&Circle> {
        self.circles.get(index)
    }

    pub fn straights(&self) -> &[Option<Straight>] {
        &self.straights
    }

    pub fn is_initialized(&self) -> bool {
        self.circles.len() >= 2
    }

    /// Start a new connection between two guides, each beginning at an
    /// existing segment end and pointing into the connection.
    pub fn init(&mut self, first: Trajectory, last: Trajectory) -> Result<()> {
        self.reset();

        let mut first = Circle::edge(EdgeAnchor::new(EdgeEnd::First, first)?);
        let mut last = Circle::edge(EdgeAnchor::new(EdgeEnd::Last, last)?);
        let (first_dir, last_dir) = get_sides(&first, &last);
        first.set_direction(first_dir);
        last.set_direction(last_dir);

        self.circles = vec![first, last];
        self.straights = vec![None, None, None];
        Ok(())
    }

    /// Drop all circles and straights.
    pub fn reset(&mut self) {
        self.circles.clear();
        self.straights.clear();
        self.state = SolveState::None;
    }

    /// Solve every circle and straight, then return the resulting parts.
    ///
    /// Deterministic for the same parameters; repeated calls give the same
    /// result.
    pub fn calculate(&mut self) -> Parts<'_> {
        if !self.is_initialized() {
            self.state = SolveState::None;
            return Parts::empty();
        }

        let defaults = self.default_radii();
        for (circle, default) in self.circles.iter_mut().zip(defaults) {
            circle.calculate(default, &self.config);
        }

        let tolerance = self.config.tolerance;
        let mut pair_failed = false;
        for i in 1..self.circles.len() {
            if !check_radii(&self.circles[i - 1], &self.circles[i], &tolerance) {
                self.circles[i - 1].set_correct(false);
                self.circles[i].set_correct(false);
                pair_failed = true;
            }
        }

        let last_index = self.straights.len() - 1;
        for i in 0..self.straights.len() {
            let straight = if i == 0 {
                first_straight(&self.circles[0])
            } else if i == last_index {
                last_straight(&self.circles[self.circles.len() - 1])
            } else {
                let (before, after) = self.circles.split_at_mut(i);
                Some(tangent_link(&mut before[i - 1], &mut after[0], &tolerance))
            };
            self.straights[i] = straight;
        }

        self.state = aggregate(&self.circles, pair_failed);
        log::debug!(
            "connection solved: {:?} with {} circles",
            self.state,
            self.circles.len()
        );
        self.parts()
    }

    /// Parts of the last solve; empty before the first one.
    pub fn parts(&self) -> Parts<'_> {
        if self.state == SolveState::None {
            return Parts::empty();
        }
        Parts::new(
            &self.circles,
            &self.straights,
            self.config.min_straight_length,
            self.config.part_length,
        )
    }

    fn default_radii(&self) -> Vec<Option<f64>> {
        let n = self.circles.len();
        let pair = match (self.circles[0].edge_anchor(), self.circles[n - 1].edge_anchor()) {
            (Some(first), Some(last)) if n == 2 => default_edge_radius(
                first,
                self.circles[0].direction(),
                last,
                self.circles[1].direction(),
                &self.config,
            ),
            _ => None,
        };

        self.circles
            .iter()
            .enumerate()
            .map(|(i, circle)| {
                if !circle.is_edge() {
                    return None;
                }
                let neighbour = if i == 0 { 1 } else { i - 1 };
                self.circles[neighbour].own_radius().or(pair)
            })
            .collect()
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(NmtError::InvalidOperation(
                "connection is not initialised".into(),
            ))
        }
    }

    fn circle_mut(&mut self, index: usize) -> Result<&mut Circle> {
        self.ensure_initialized()?;
        let len = self.circles.len();
        self.circles
            .get_mut(index)
            .ok_or_else(|| NmtError::NotFound(format!("circle {index} of {len}")))
    }

    /// Insert a free circle before `circles[index]`. Only interior positions
    /// are allowed, so the edge circles stay at both ends.
    pub fn insert_circle(
        &mut self,
        index: usize,
        center: Point3,
        radius: f64,
        direction: Direction,
    ) -> Result<()> {
        self.ensure_initialized()?;
        if index == 0 || index >= self.circles.len() {
            return Err(NmtError::InvalidOperation(format!(
                "circles can only be inserted between the edge circles, got index {index}"
            )));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(NmtError::Geometry(format!(
                "free circle radius must be positive, got {radius}"
            )));
        }
        self.circles
            .insert(index, Circle::free(center, radius, direction));
        self.straights.insert(index, None);
        Ok(())
    }

    /// Remove the free circle at `index` and return it.
    pub fn remove_circle(&mut self, index: usize) -> Result<Circle> {
        if self.circle_mut(index)?.is_edge() {
            return Err(NmtError::InvalidOperation(format!(
                "circle {index} is an edge circle and cannot be removed"
            )));
        }
        self.straights.remove(index);
        Ok(self.circles.remove(index))
    }

    /// Set the anchor offset of the edge circle at `index`.
    pub fn set_offset(&mut self, index: usize, offset: f64) -> Result<()> {
        let anchor = self
            .circle_mut(index)?
            .edge_anchor_mut()
            .ok_or_else(|| {
                NmtError::InvalidOperation(format!("circle {index} has no offset"))
            })?;
        anchor.set_offset(offset);
        Ok(())
    }

    /// Move a circle toward `point`.
    ///
    /// Free circles take `point` as their centre; edge circles slide along
    /// their guide.
    pub fn move_circle_center(&mut self, index: usize, point: Point3) -> Result<()> {
        let max_offset = self.config.max_offset;
        let circle = self.circle_mut(index)?;
        match circle.edge_anchor_mut() {
            Some(anchor) => anchor.set_center(point, max_offset),
            None => circle.set_free_center(point),
        }
        Ok(())
    }

    /// Pin the radius of a circle, or return it to the solved default.
    pub fn set_radius(&mut self, index: usize, radius: Option<f64>) -> Result<()> {
        if let Some(r) = radius {
            if !(r.is_finite() && r > 0.0) {
                return Err(NmtError::Geometry(format!(
                    "radius must be positive, got {r}"
                )));
            }
        }
        self.circle_mut(index)?.set_pinned_radius(radius);
        Ok(())
    }

    /// Pin the radius so the circle passes through `pointer`.
    ///
    /// Edge circles measure along their centre line. The radius snaps to the
    /// modifier step (shift 10, ctrl 1, alt 0.1). Returns the pinned radius.
    pub fn drag_radius(&mut self, index: usize, pointer: Point3, modifiers: Modifiers) -> Result<f64> {
        let circle = self.circle_mut(index)?;
        let raw = match circle.edge_anchor() {
            Some(anchor) => dot_xz(pointer - anchor.position(), anchor.side(circle.direction())).abs(),
            None => circle.center().flat_distance(pointer),
        };
        let radius = modifiers
            .radius_step()
            .map_or(raw, |step| round_to_nearest(raw, step));
        if !(radius.is_finite() && radius > 0.0) {
            return Err(NmtError::Geometry(format!(
                "dragged radius must be positive, got {radius}"
            )));
        }
        circle.set_pinned_radius(Some(radius));
        Ok(radius)
    }

    pub fn flip_direction(&mut self, index: usize) -> Result<()> {
        let circle = self.circle_mut(index)?;
        circle.set_direction(circle.direction().flipped());
        Ok(())
    }

    /// Overlay of the last solve.
    ///
    /// A calculated solve shows its arcs and straights; a failed one shows
    /// each circle with its centre, marked by whether it is correct.
    pub fn overlay(&self) -> Vec<OverlayItem> {
        let mut items = Vec::new();
        if self.state.is_calculated() {
            for circle in &self.circles {
                let arc = circle.arc();
                items.push(OverlayItem::Arc {
                    center: arc.center,
                    radius: arc.radius,
                    start_angle: arc.start_angle,
                    sweep: arc.sweep,
                    highlight: Highlight::Neutral,
                });
            }
            for straight in self.straights.iter().flatten() {
                items.push(OverlayItem::Line {
                    start: straight.start,
                    end: straight.end,
                    highlight: Highlight::Neutral,
                });
            }
        } else if self.state.is_failed() {
            for circle in self
                .circles
                .iter()
                .filter(|c| c.radius().is_finite() && c.radius() > 0.0)
            {
                let highlight = Highlight::validity(circle.is_correct());
                items.push(OverlayItem::Circle {
                    center: circle.center(),
                    radius: circle.radius(),
                    highlight,
                });
                items.push(OverlayItem::Ring {
                    center: circle.center(),
                    outer: CENTER_MARKER_RADIUS,
                    inner: 0.0,
                    highlight,
                });
            }
        }
        items
    }
}

fn first_straight(first: &Circle) -> Option<Straight> {
    let anchor = first.edge_anchor()?;
    Some(Straight::new(anchor.guide().start, first.start_pos(), first.start_dir()))
}

fn last_straight(last: &Circle) -> Option<Straight> {
    let anchor = last.edge_anchor()?;
    Some(Straight::new(last.end_pos(), anchor.guide().start, last.end_dir()))
}

fn aggregate(circles: &[Circle], pair_failed: bool) -> SolveState {
    if circles.is_empty() {
        return SolveState::None;
    }
    let any = |outcome: RadiusOutcome| circles.iter().any(|c| c.outcome() == Some(outcome));
    if any(RadiusOutcome::BigRadius) {
        SolveState::BigRadius
    } else if any(RadiusOutcome::SmallRadius) {
        SolveState::SmallRadius
    } else if pair_failed || circles.iter().any(|c| !c.is_correct()) {
        SolveState::WrongShape
    } else {
        SolveState::Calculated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmt_math::DVec3;

    fn corner() -> Connection {
        let mut c = Connection::new(ConnectionConfig::default()).unwrap();
        c.init(
            Trajectory::ray(DVec3::ZERO, DVec3::X),
            Trajectory::ray(DVec3::new(100.0, 0.0, 100.0), -DVec3::Z),
        )
        .unwrap();
        c
    }

    #[test]
    fn test_new_validates_config() {
        let cfg = ConnectionConfig {
            min_radius: -1.0,
            ..Default::default()
        };
        assert!(matches!(Connection::new(cfg), Err(NmtError::InvalidConfig(_))));
    }

    #[test]
    fn test_init_layout() {
        let c = corner();
        assert_eq!(c.circles().len(), 2);
        assert_eq!(c.straights().len(), 3);
        assert_eq!(c.state(), SolveState::None);
        assert_eq!(c.parts().count(), 0);
    }

    #[test]
    fn test_uninitialised_operations() {
        let mut c = Connection::new(ConnectionConfig::default()).unwrap();
        assert_eq!(c.calculate().count(), 0);
        assert_eq!(c.state(), SolveState::None);
        assert!(matches!(c.flip_direction(0), Err(NmtError::InvalidOperation(_))));
        assert!(c.overlay().is_empty());
    }

    #[test]
    fn test_insert_and_remove_keep_layout() {
        let mut c = corner();
        assert!(c.insert_circle(0, DVec3::ZERO, 20.0, Direction::Left).is_err());
        assert!(c.insert_circle(2, DVec3::ZERO, 20.0, Direction::Left).is_err());

        c.insert_circle(1, DVec3::new(50.0, 0.0, 50.0), 20.0, Direction::Left)
            .unwrap();
        assert_eq!(c.circles().len(), 3);
        assert_eq!(c.straights().len(), 4);
        assert!(!c.circles()[1].is_edge());

        assert!(matches!(c.remove_circle(0), Err(NmtError::InvalidOperation(_))));
        assert!(matches!(c.remove_circle(7), Err(NmtError::NotFound(_))));
        let removed = c.remove_circle(1).unwrap();
        assert_eq!(removed.radius(), 20.0);
        assert_eq!(c.straights().len(), 3);
    }

    #[test]
    fn test_set_offset_only_on_edges() {
        let mut c = corner();
        c.set_offset(0, 25.0).unwrap();
        assert_eq!(c.circles()[0].edge_anchor().unwrap().offset(), 25.0);
        c.insert_circle(1, DVec3::new(50.0, 0.0, 50.0), 20.0, Direction::Left)
            .unwrap();
        assert!(c.set_offset(1, 5.0).is_err());
    }

    #[test]
    fn test_drag_radius_snaps() {
        let mut c = corner();
        c.insert_circle(1, DVec3::new(50.0, 0.0, 50.0), 20.0, Direction::Left)
            .unwrap();
        let r = c
            .drag_radius(1, DVec3::new(50.0, 0.0, 84.0), Modifiers::SHIFT)
            .unwrap();
        assert_eq!(r, 30.0);
        assert_eq!(c.circles()[1].pinned_radius(), Some(30.0));

        let r = c
            .drag_radius(0, DVec3::new(10.0, 0.0, 42.4), Modifiers::CTRL)
            .unwrap();
        assert_eq!(r, 42.0);
    }

    #[test]
    fn test_head_on_overlay_skips_unsolved_circles() {
        let mut c = Connection::new(ConnectionConfig::default()).unwrap();
        c.init(
            Trajectory::ray(DVec3::ZERO, DVec3::X),
            Trajectory::ray(DVec3::new(100.0, 0.0, 0.0), -DVec3::X),
        )
        .unwrap();
        let _ = c.calculate().count();
        assert_eq!(c.state(), SolveState::WrongShape);
        assert!(c.circles().iter().all(|circle| circle.radius() == 0.0));
        assert!(c.overlay().is_empty());
    }

    #[test]
    fn test_reset_drops_state() {
        let mut c = corner();
        let _ = c.calculate().count();
        assert_eq!(c.state(), SolveState::Calculated);
        c.reset();
        assert_eq!(c.state(), SolveState::None);
        assert!(c.circles().is_empty());
    }
}
