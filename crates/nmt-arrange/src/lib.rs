//! Arrange a ring of network nodes on a common circle.
//!
//! The circle starts as the minimum enclosing circle of the nodes. Each node
//! is projected onto it and can then be rotated, while the centre and radius
//! stay editable. Committing moves the nodes through a [`Network`]
//! collaborator and turns the ring segments tangent to the circle.

pub mod arrangement;
pub mod enclosing;
pub mod network;
pub mod point;
pub mod session;

pub use arrangement::Arrangement;
pub use enclosing::{min_enclosing_circle, EnclosingCircle};
pub use network::{Network, SegmentEnd};
pub use point::CirclePoint;
pub use session::{ArrangeSession, Flow, Hover, SessionState};
