use serde::{Deserialize, Serialize};

use crate::error::{NmtError, Result};
use crate::traits::Validate;

/// Comparison slack for the planar solvers.
///
/// Coordinates are world units with magnitudes up to a few thousand, so the
/// defaults sit well above machine precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Distance slack in world units.
    pub linear: f64,
    /// Angle slack in radians.
    pub angular: f64,
}

impl Tolerance {
    pub const DEFAULT: Self = Self::new(1e-6, 1e-9);
    pub const LOOSE: Self = Self::new(1e-3, 1e-6);
    pub const TIGHT: Self = Self::new(1e-9, 1e-12);

    pub const fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }

    /// Linear slack grown with the magnitude of `reference`, never below
    /// `linear` itself.
    pub fn scaled(self, reference: f64) -> f64 {
        self.linear * reference.abs().max(1.0)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Validate for Tolerance {
    fn validate(&self) -> Result<()> {
        if self.linear > 0.0 && self.angular > 0.0 {
            Ok(())
        } else {
            Err(NmtError::InvalidConfig(format!(
                "tolerances must be positive, got linear {} angular {}",
                self.linear, self.angular
            )))
        }
    }
}
