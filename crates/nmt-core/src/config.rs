//! Solver configuration supplied by the host.
//!
//! Both structs deserialize with every field optional; missing fields fall
//! back to [`Default`]. Call [`Validate::validate`] before handing a config to
//! a solver.

use serde::{Deserialize, Serialize};

use crate::error::{NmtError, Result};
use crate::tolerance::Tolerance;
use crate::traits::Validate;

/// Parameters of the tangent-arc connection builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Smallest radius an arc may have (usually derived from the road width).
    pub min_radius: f64,
    /// Largest radius an arc may have.
    pub max_radius: f64,
    /// Straights shorter than this are elided from the part sequence.
    pub min_straight_length: f64,
    /// Upper clamp for edge-circle offsets along their guide.
    pub max_offset: f64,
    /// Maximum distance between consecutive samples along an arc or straight.
    pub part_length: f64,
    /// Fraction of the tightest straight-less S-curve radius used by default.
    pub reverse_curve_ratio: f64,
    pub tolerance: Tolerance,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            min_radius: 16.0,
            max_radius: 1000.0,
            min_straight_length: 8.0,
            max_offset: 500.0,
            part_length: 20.0,
            reverse_curve_ratio: 0.5,
            tolerance: Tolerance::default(),
        }
    }
}

impl Validate for ConnectionConfig {
    fn validate(&self) -> Result<()> {
        if !(self.min_radius > 0.0) {
            return Err(NmtError::InvalidConfig(format!(
                "min_radius must be positive, got {}",
                self.min_radius
            )));
        }
        if !(self.max_radius > self.min_radius) {
            return Err(NmtError::InvalidConfig(format!(
                "max_radius ({}) must exceed min_radius ({})",
                self.max_radius, self.min_radius
            )));
        }
        if !(self.part_length > 0.0) {
            return Err(NmtError::InvalidConfig(format!(
                "part_length must be positive, got {}",
                self.part_length
            )));
        }
        if self.min_straight_length < 0.0 || self.max_offset < 0.0 {
            return Err(NmtError::InvalidConfig(
                "min_straight_length and max_offset must not be negative".into(),
            ));
        }
        if !(self.reverse_curve_ratio > 0.0 && self.reverse_curve_ratio <= 1.0) {
            return Err(NmtError::InvalidConfig(format!(
                "reverse_curve_ratio must be in (0, 1], got {}",
                self.reverse_curve_ratio
            )));
        }
        self.tolerance.validate()
    }
}

/// Parameters of the circle arranger and its interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangeConfig {
    /// Starting radius of the enclosing-circle search.
    pub initial_radius: f64,
    /// Angular gap above which an arrangement is flagged as a big delta.
    pub big_delta_angle: f64,
    /// Pointer distance within which the centre counts as hovered.
    pub hover_center_distance: f64,
    /// Half width of the band around the circle that counts as hovered.
    pub hover_circle_width: f64,
    /// Pointer distance within which a projected point counts as hovered.
    pub hover_point_distance: f64,
    /// Nodes moving less than this get no move line in the overlay.
    pub min_move_distance: f64,
    pub tolerance: Tolerance,
}

impl Default for ArrangeConfig {
    fn default() -> Self {
        Self {
            initial_radius: f64::MAX,
            big_delta_angle: std::f64::consts::FRAC_PI_2,
            hover_center_distance: 5.0,
            hover_circle_width: 5.0,
            hover_point_distance: 2.0,
            min_move_distance: 1.0,
            tolerance: Tolerance::default(),
        }
    }
}

impl Validate for ArrangeConfig {
    fn validate(&self) -> Result<()> {
        if !(self.initial_radius > 0.0) {
            return Err(NmtError::InvalidConfig(format!(
                "initial_radius must be positive, got {}",
                self.initial_radius
            )));
        }
        if !(self.big_delta_angle > 0.0 && self.big_delta_angle < std::f64::consts::TAU) {
            return Err(NmtError::InvalidConfig(format!(
                "big_delta_angle must be in (0, 2π), got {}",
                self.big_delta_angle
            )));
        }
        if self.hover_center_distance < 0.0
            || self.hover_circle_width < 0.0
            || self.hover_point_distance < 0.0
        {
            return Err(NmtError::InvalidConfig(
                "hover distances must not be negative".into(),
            ));
        }
        self.tolerance.validate()
    }
}
