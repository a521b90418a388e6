//! Tangent-arc connection builder.
//!
//! A connection joins two segment ends with a chain of circular arcs linked
//! by straight tangents: `straight, circle, straight, circle, ..., straight`.
//! The two outer circles are anchored to the guide trajectories of the
//! segment ends; any circles in between are free.

pub mod circle;
pub mod connection;
pub mod curve;
pub mod edge;
pub mod parts;
pub mod straight;

pub use circle::{check_radii, Circle, CircleKind, Direction, RadiusOutcome};
pub use connection::{Connection, SolveState};
pub use curve::{Arc, Curve, Line};
pub use edge::{get_sides, EdgeAnchor, EdgeEnd};
pub use parts::{Parts, PathPoint, Samples, Segment};
pub use straight::{tangent_link, Straight};
