use serde::{Deserialize, Serialize};

use crate::flat::FlatExt;
use crate::Point3;
use glam::DVec2;

/// Axis-aligned rectangle on the horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = first.xz();
        let mut max = min;
        for p in rest {
            min = min.min(p.xz());
            max = max.max(p.xz());
        }
        Some(Self { min, max })
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn contains_point(&self, p: Point3) -> bool {
        let p = p.xz();
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Union of all rectangles yielded by `rects`; `None` when empty.
    pub fn merge_all<I: IntoIterator<Item = Rect>>(rects: I) -> Option<Self> {
        rects.into_iter().reduce(|acc, r| acc.merge(&r))
    }

    pub fn expand(&self, amount: f64) -> Self {
        let offset = DVec2::splat(amount);
        Self {
            min: self.min - offset,
            max: self.max + offset,
        }
    }
}
