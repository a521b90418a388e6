//! Planar math for network tools.
//!
//! Positions are 3D with Y as the vertical axis. Height is carried through
//! but every geometric decision is made on the horizontal (X, Z) plane.

pub mod flat;
pub mod overlay;
pub mod rect;
pub mod trajectory;

pub use glam::{DVec2, DVec3};
pub use flat::{
    angle_between_xz, cross_xz, direction_from_angle, dot_xz, normalize_angle,
    normalized_cross_xz, round_to_nearest, FlatExt,
};
pub use overlay::OverlayItem;
pub use rect::Rect;
pub use trajectory::Trajectory;

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
