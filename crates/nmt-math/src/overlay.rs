use nmt_core::Highlight;
use serde::{Deserialize, Serialize};

use crate::Point3;

/// Renderer-neutral primitive emitted by the tools for their overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OverlayItem {
    Circle {
        center: Point3,
        radius: f64,
        highlight: Highlight,
    },
    /// Filled annulus, used for point and centre markers.
    Ring {
        center: Point3,
        outer: f64,
        inner: f64,
        highlight: Highlight,
    },
    Line {
        start: Point3,
        end: Point3,
        highlight: Highlight,
    },
    /// Arc starting at heading `start_angle`; positive `sweep` increases the heading.
    Arc {
        center: Point3,
        radius: f64,
        start_angle: f64,
        sweep: f64,
        highlight: Highlight,
    },
}

impl OverlayItem {
    pub fn highlight(&self) -> Highlight {
        match *self {
            Self::Circle { highlight, .. }
            | Self::Ring { highlight, .. }
            | Self::Line { highlight, .. }
            | Self::Arc { highlight, .. } => highlight,
        }
    }
}
