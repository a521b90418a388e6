use nmt_core::{NodeId, Result, SegmentId};
use nmt_math::{Point3, Rect, Vector3};
use serde::{Deserialize, Serialize};

/// End of a segment a node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentEnd {
    Start,
    End,
}

/// The host's node and segment graph.
///
/// The arranger reads through the query methods at any time and mutates only
/// inside [`Arrangement::apply`](crate::Arrangement::apply).
pub trait Network {
    fn node_position(&self, node: NodeId) -> Option<Point3>;

    /// Segment joining `a` and `b` directly, if any.
    fn common_segment(&self, a: NodeId, b: NodeId) -> Option<SegmentId>;

    /// Which end of `segment` is attached to `node`.
    fn segment_end(&self, segment: SegmentId, node: NodeId) -> Option<SegmentEnd>;

    fn segment_half_width(&self, segment: SegmentId) -> Option<f64>;

    /// Horizontal bounds of `segment`, used to scope terrain updates.
    fn segment_bounds(&self, segment: SegmentId) -> Option<Rect>;

    fn move_node(&mut self, node: NodeId, position: Point3) -> Result<()>;

    /// Set the direction of `segment` where it leaves the node at `end`.
    fn set_segment_direction(
        &mut self,
        segment: SegmentId,
        end: SegmentEnd,
        direction: Vector3,
    ) -> Result<()>;

    /// Called once per moved node after all directions are set.
    fn update_node(&mut self, _node: NodeId) {}

    fn update_terrain(&mut self, bounds: Rect);
}
