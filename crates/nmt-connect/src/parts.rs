//! Lazy sampling of a solved connection into path points.
//!
//! Each arc and straight contributes evenly spaced interior samples no more
//! than `part_length` apart. Straights shorter than `min_straight_length`
//! are collapsed to their midpoint, and a straight whose flanking circles
//! both failed becomes a [`PathPoint::Gap`].

use std::iter::FusedIterator;

use nmt_math::{FlatExt, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::circle::Circle;
use crate::curve::{Arc, Curve, Line};
use crate::straight::Straight;

/// A single element of the generated path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathPoint {
    Sample { position: Point3, direction: Vector3 },
    /// Break where neither neighbouring arc is usable.
    Gap,
}

impl PathPoint {
    pub fn sample(position: Point3, direction: Vector3) -> Self {
        Self::Sample {
            position,
            direction,
        }
    }

    pub fn position(&self) -> Option<Point3> {
        match self {
            Self::Sample { position, .. } => Some(*position),
            Self::Gap => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Self::Gap)
    }
}

/// A sampled piece of the connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Arc(Arc),
    Line(Line),
}

impl Curve for Segment {
    fn point_at(&self, t: f64) -> Point3 {
        match self {
            Self::Arc(arc) => arc.point_at(t),
            Self::Line(line) => line.point_at(t),
        }
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        match self {
            Self::Arc(arc) => arc.tangent_at(t),
            Self::Line(line) => line.tangent_at(t),
        }
    }

    fn domain(&self) -> (f64, f64) {
        match self {
            Self::Arc(arc) => arc.domain(),
            Self::Line(line) => line.domain(),
        }
    }

    fn length(&self) -> f64 {
        match self {
            Self::Arc(arc) => arc.length(),
            Self::Line(line) => line.length(),
        }
    }
}

/// Interior samples of a segment, excluding both ends.
#[derive(Debug, Clone)]
pub struct Samples {
    segment: Segment,
    index: usize,
    count: usize,
}

impl Samples {
    pub fn new(segment: Segment, part_length: f64) -> Self {
        let divisions = (segment.length() / part_length).ceil();
        let count = if divisions.is_finite() && divisions >= 1.0 {
            divisions as usize
        } else {
            1
        };
        Self {
            segment,
            index: 1,
            count,
        }
    }

    /// Number of parts the segment is divided into.
    pub fn divisions(&self) -> usize {
        self.count
    }
}

impl Iterator for Samples {
    type Item = PathPoint;

    fn next(&mut self) -> Option<PathPoint> {
        if self.index >= self.count {
            return None;
        }
        let (t0, t1) = self.segment.domain();
        let t = t0 + (t1 - t0) * self.index as f64 / self.count as f64;
        self.index += 1;
        Some(PathPoint::sample(
            self.segment.point_at(t),
            self.segment.tangent_at(t).make_flat_normalized(),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count.saturating_sub(self.index);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Samples {}

/// Points contributed by one slot of the connection.
#[derive(Debug, Clone, Default)]
struct Slot {
    head: Option<PathPoint>,
    body: Option<Samples>,
    tail: Option<PathPoint>,
}

impl Slot {
    fn single(point: PathPoint) -> Self {
        Self {
            head: Some(point),
            ..Self::default()
        }
    }
}

impl Iterator for Slot {
    type Item = PathPoint;

    fn next(&mut self) -> Option<PathPoint> {
        if let Some(p) = self.head.take() {
            return Some(p);
        }
        if let Some(p) = self.body.as_mut().and_then(Iterator::next) {
            return Some(p);
        }
        self.tail.take()
    }
}

/// Lazy, restartable sequence of path points for a connection.
///
/// The layout is `first straight, circle, straight, ..., circle, last
/// straight`. Failed circles contribute nothing.
#[derive(Debug, Clone)]
pub struct Parts<'a> {
    circles: &'a [Circle],
    straights: &'a [Option<Straight>],
    min_straight_length: f64,
    part_length: f64,
    slot: usize,
    current: Slot,
}

impl<'a> Parts<'a> {
    pub(crate) fn new(
        circles: &'a [Circle],
        straights: &'a [Option<Straight>],
        min_straight_length: f64,
        part_length: f64,
    ) -> Self {
        Self {
            circles,
            straights,
            min_straight_length,
            part_length,
            slot: 0,
            current: Slot::default(),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new(&[], &[], 0.0, 1.0)
    }

    fn slot_count(&self) -> usize {
        if self.circles.is_empty() || self.straights.len() != self.circles.len() + 1 {
            return 0;
        }
        self.circles.len() + self.straights.len()
    }

    fn straight_samples(&self, straight: &Straight) -> Samples {
        Samples::new(Segment::Line(straight.line()), self.part_length)
    }

    fn point(position: Point3, straight: &Straight) -> PathPoint {
        PathPoint::sample(position, straight.direction)
    }

    fn build_slot(&self, slot: usize, count: usize) -> Slot {
        if slot == 0 || slot == count - 1 {
            let is_first = slot == 0;
            let straight = match self.straights[if is_first { 0 } else { self.straights.len() - 1 }] {
                Some(s) if s.length() >= self.min_straight_length => s,
                _ => return Slot::default(),
            };
            let body = Some(self.straight_samples(&straight));
            return if is_first {
                Slot {
                    head: None,
                    body,
                    tail: Some(Self::point(straight.end, &straight)),
                }
            } else {
                Slot {
                    head: Some(Self::point(straight.start, &straight)),
                    body,
                    tail: None,
                }
            };
        }

        let i = slot - 1;
        if i % 2 == 0 {
            let circle = &self.circles[i / 2];
            if !circle.is_correct() {
                return Slot::default();
            }
            return Slot {
                body: Some(Samples::new(Segment::Arc(circle.arc()), self.part_length)),
                ..Slot::default()
            };
        }

        let j = i / 2 + 1;
        if !self.circles[j - 1].is_correct() && !self.circles[j].is_correct() {
            return Slot::single(PathPoint::Gap);
        }
        let Some(straight) = self.straights[j] else {
            return Slot::default();
        };
        if straight.length() >= self.min_straight_length {
            Slot {
                head: Some(Self::point(straight.start, &straight)),
                body: Some(self.straight_samples(&straight)),
                tail: Some(Self::point(straight.end, &straight)),
            }
        } else {
            Slot::single(Self::point(straight.position(0.5), &straight))
        }
    }
}

impl Iterator for Parts<'_> {
    type Item = PathPoint;

    fn next(&mut self) -> Option<PathPoint> {
        let count = self.slot_count();
        loop {
            if let Some(p) = self.current.next() {
                return Some(p);
            }
            if self.slot >= count {
                return None;
            }
            self.current = self.build_slot(self.slot, count);
            self.slot += 1;
        }
    }
}

impl FusedIterator for Parts<'_> {}
