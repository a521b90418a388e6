//! Arrangement of a node ring on a circle.

use std::f64::consts::TAU;

use nmt_core::{ArrangeConfig, Highlight, NmtError, NodeId, Result, SegmentId, Validate};
use nmt_math::{normalized_cross_xz, FlatExt, Point3, Rect, Vector3};

use crate::enclosing::min_enclosing_circle;
use crate::network::{Network, SegmentEnd};
use crate::point::CirclePoint;

/// Nodes of a ring projected onto a circle.
///
/// `points` keeps the input order, which is the adjacency order of the
/// ring: `points[i]` is linked to `points[i + 1]` and the last point to the
/// first. The order check compares this with the angular order.
#[derive(Debug, Clone)]
pub struct Arrangement {
    config: ArrangeConfig,
    points: Vec<CirclePoint>,
    origins: Vec<Point3>,
    center: Point3,
    radius: f64,
    default_center: Point3,
    valid: Vec<bool>,
    big_delta: bool,
}

impl Arrangement {
    /// Fit the minimum enclosing circle to `nodes` and project each onto it.
    pub fn calculate<I>(nodes: I, config: ArrangeConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (NodeId, Point3)>,
    {
        config.validate()?;
        let (ids, origins): (Vec<NodeId>, Vec<Point3>) = nodes.into_iter().unzip();
        if ids.is_empty() {
            return Err(NmtError::Geometry("no nodes to arrange".into()));
        }
        let circle = min_enclosing_circle(&origins, config.initial_radius, &config.tolerance)
            .ok_or_else(|| {
                NmtError::Geometry(format!(
                    "nodes do not fit in a circle of radius {}",
                    config.initial_radius
                ))
            })?;

        let mut arrangement = Self {
            config,
            points: Vec::with_capacity(ids.len()),
            origins,
            center: circle.center,
            radius: circle.radius,
            default_center: circle.center,
            valid: Vec::new(),
            big_delta: false,
        };
        arrangement.points = ids
            .iter()
            .zip(&arrangement.origins)
            .map(|(&node, &position)| project(circle.center, node, position))
            .collect();
        arrangement.update();

        log::debug!(
            "arranged {} nodes: center ({:.2}, {:.2}), radius {:.2}",
            arrangement.points.len(),
            arrangement.center.x,
            arrangement.center.z,
            arrangement.radius
        );
        Ok(arrangement)
    }

    /// [`calculate`](Self::calculate) with positions read from `network`.
    pub fn from_network<N: Network + ?Sized>(
        nodes: &[NodeId],
        network: &N,
        config: ArrangeConfig,
    ) -> Result<Self> {
        let located = nodes
            .iter()
            .map(|&node| Ok((node, node_position(network, node)?)))
            .collect::<Result<Vec<_>>>()?;
        Self::calculate(located, config)
    }

    pub fn config(&self) -> &ArrangeConfig {
        &self.config
    }

    pub fn points(&self) -> &[CirclePoint] {
        &self.points
    }

    /// Node positions as last read, in input order.
    pub fn origins(&self) -> &[Point3] {
        &self.origins
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn default_center(&self) -> Point3 {
        self.default_center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.valid.get(index).copied().unwrap_or(false)
    }

    pub fn invalid_count(&self) -> usize {
        count_invalid(&self.valid)
    }

    pub fn is_wrong_order(&self) -> bool {
        self.invalid_count() > 0
    }

    /// Some pair of angularly adjacent points is further apart than
    /// `big_delta_angle`.
    pub fn is_big_delta(&self) -> bool {
        self.big_delta
    }

    /// Target position of each point, in input order.
    pub fn positions(&self) -> Vec<Point3> {
        self.points
            .iter()
            .map(|p| p.position(self.center, self.radius))
            .collect()
    }

    pub fn position(&self, index: usize) -> Option<Point3> {
        self.points
            .get(index)
            .map(|p| p.position(self.center, self.radius))
    }

    /// Recompute the order flags and the big-delta flag from the current
    /// angles.
    ///
    /// A point is in order when, walking by increasing angle, its angular
    /// predecessor is its input predecessor or its angular successor is its
    /// input successor.
    pub fn update(&mut self) {
        let n = self.points.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| self.points[a].angle().total_cmp(&self.points[b].angle()));

        self.valid = order_validity(&order);

        let limit = self.config.big_delta_angle + self.config.tolerance.angular;
        self.big_delta = (0..n).any(|pos| {
            let k = (pos + 1) % n;
            let wrap = if k == 0 { TAU } else { 0.0 };
            self.points[order[k]].angle() + wrap - self.points[order[pos]].angle() > limit
        });
    }

    /// Shift the centre horizontally by `delta`.
    pub fn move_center(&mut self, delta: Vector3) {
        self.center += delta.make_flat();
    }

    /// Move the centre to `point` in plan, keeping its height.
    pub fn set_center(&mut self, point: Point3) {
        self.center = Point3::new(point.x, self.center.y, point.z);
    }

    /// Set the radius, never below `min_radius`.
    pub fn set_radius(&mut self, radius: f64, min_radius: f64) {
        self.radius = radius.max(min_radius);
    }

    pub fn reset_center(&mut self) {
        self.center = self.default_center;
    }

    pub fn turn_point(&mut self, index: usize, delta: f64) -> Result<()> {
        let len = self.points.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or_else(|| NmtError::NotFound(format!("point {index} of {len}")))?;
        *point = point.turn(delta);
        self.update();
        Ok(())
    }

    pub fn turn_all(&mut self, delta: f64) {
        for point in &mut self.points {
            *point = point.turn(delta);
        }
        self.update();
    }

    /// Re-project one point from its node's current position, as seen from
    /// the default centre.
    pub fn reset_point<N: Network + ?Sized>(&mut self, index: usize, network: &N) -> Result<()> {
        let len = self.points.len();
        let node = self
            .points
            .get(index)
            .ok_or_else(|| NmtError::NotFound(format!("point {index} of {len}")))?
            .node;
        let position = node_position(network, node)?;
        self.points[index] = project(self.default_center, node, position);
        self.origins[index] = position;
        self.update();
        Ok(())
    }

    /// Start over from the nodes' current positions.
    pub fn recalculate<N: Network + ?Sized>(&mut self, network: &N) -> Result<()> {
        let nodes: Vec<NodeId> = self.points.iter().map(|p| p.node).collect();
        *self = Self::from_network(&nodes, network, self.config)?;
        Ok(())
    }

    /// Segments linking each point to the next one around the ring.
    pub fn ring_segments<N: Network + ?Sized>(&self, network: &N) -> Result<Vec<SegmentId>> {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let a = self.points[i].node;
                let b = self.points[(i + 1) % n].node;
                network
                    .common_segment(a, b)
                    .ok_or_else(|| NmtError::NotFound(format!("no segment between {a} and {b}")))
            })
            .collect()
    }

    /// Smallest radius that keeps the ring's widest segment drawable.
    pub fn min_radius<N: Network + ?Sized>(&self, network: &N) -> f64 {
        let n = self.points.len();
        (0..n)
            .filter_map(|i| network.common_segment(self.points[i].node, self.points[(i + 1) % n].node))
            .filter_map(|segment| network.segment_half_width(segment))
            .map(|half| half * 2.0)
            .fold(0.0, f64::max)
    }

    /// Move every node onto the circle and turn the ring segments tangent
    /// to it.
    ///
    /// Refused with [`NmtError::WrongOrder`] while any point is out of
    /// order. Ring segments and their ends are resolved before anything is
    /// changed.
    pub fn apply<N: Network + ?Sized>(&self, network: &mut N) -> Result<()> {
        let invalid = self.invalid_count();
        if invalid > 0 {
            log::warn!("refusing to arrange: {invalid} point(s) out of order");
            return Err(NmtError::WrongOrder { invalid });
        }

        let n = self.points.len();
        let segments = self.ring_segments(network)?;
        let links = self.ring_links(network, &segments)?;
        let terrain = Rect::merge_all(segments.iter().filter_map(|&s| network.segment_bounds(s)));
        let targets = self.positions();

        for (point, &target) in self.points.iter().zip(&targets) {
            network.move_node(point.node, target)?;
        }
        for (i, node_links) in links.iter().enumerate() {
            for link in node_links {
                let direction = self.tangent_toward(targets[i], targets[link.neighbor]);
                network.set_segment_direction(link.segment, link.end, direction)?;
            }
        }
        for point in &self.points {
            network.update_node(point.node);
        }
        if let Some(bounds) = terrain {
            network.update_terrain(bounds);
        }

        log::debug!("applied arrangement of {n} nodes");
        Ok(())
    }

    /// For each point, its links to the next and the previous point.
    fn ring_links<N: Network + ?Sized>(
        &self,
        network: &N,
        segments: &[SegmentId],
    ) -> Result<Vec<[RingLink; 2]>> {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let node = self.points[i].node;
                let link = |segment: SegmentId, neighbor: usize| {
                    network
                        .segment_end(segment, node)
                        .map(|end| RingLink {
                            segment,
                            end,
                            neighbor,
                        })
                        .ok_or_else(|| {
                            NmtError::NotFound(format!("{node} is not an end of {segment}"))
                        })
                };
                let prev = (i + n - 1) % n;
                Ok([link(segments[i], (i + 1) % n)?, link(segments[prev], prev)?])
            })
            .collect()
    }

    /// Tangent of the circle at `from`, facing the side `to` lies on.
    fn tangent_toward(&self, from: Point3, to: Point3) -> Vector3 {
        let radial = (from - self.center).make_flat_normalized();
        radial.turn90(normalized_cross_xz(radial, to - from) >= 0.0)
    }

    /// Incorrect while out of order, a warning for a big gap, else correct.
    pub fn circle_highlight(&self) -> Highlight {
        if self.is_wrong_order() {
            Highlight::Incorrect
        } else if self.big_delta {
            Highlight::Warning
        } else {
            Highlight::Correct
        }
    }

    pub fn point_highlight(&self, index: usize) -> Highlight {
        if self.is_valid(index) {
            Highlight::Neutral
        } else {
            Highlight::Incorrect
        }
    }
}

/// Point for `node` at the heading of `position` seen from `center`.
fn project(center: Point3, node: NodeId, position: Point3) -> CirclePoint {
    let direction = (position - center).make_flat_normalized();
    CirclePoint::new(node, direction.absolute_angle())
}

/// One end of a ring segment, seen from the node it is attached to.
#[derive(Debug, Clone, Copy)]
struct RingLink {
    segment: SegmentId,
    end: SegmentEnd,
    neighbor: usize,
}

fn node_position<N: Network + ?Sized>(network: &N, node: NodeId) -> Result<Point3> {
    network
        .node_position(node)
        .ok_or_else(|| NmtError::NotFound(format!("{node} has no position")))
}

fn count_invalid(valid: &[bool]) -> usize {
    valid.iter().filter(|ok| !**ok).count()
}

/// Order flags for input indices laid out in increasing-angle `order`.
fn order_validity(order: &[usize]) -> Vec<bool> {
    let n = order.len();
    let follows = |a: usize, b: usize| b == (a + 1) % n;
    let mut valid = vec![false; n];
    for (pos, &j) in order.iter().enumerate() {
        let i = order[(pos + n - 1) % n];
        let k = order[(pos + 1) % n];
        valid[j] = follows(i, j) || follows(j, k);
    }
    valid
}
