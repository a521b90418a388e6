//! Interactive editing of an arrangement.
//!
//! The session receives decoded pointer and key events. A press followed by
//! a drag enters one of the edit sub-states depending on what was under the
//! pointer; releasing returns to [`SessionState::Idle`].

use nmt_core::{Highlight, Modifiers, Result};
use nmt_math::{angle_between_xz, round_to_nearest, FlatExt, OverlayItem, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::arrangement::Arrangement;
use crate::network::Network;

const CENTER_MARKER: (f64, f64) = (5.0, 0.0);
const CENTER_HOVER_MARKER: (f64, f64) = (7.0, 5.0);
const POINT_MARKER: (f64, f64) = (2.0, 0.0);
const POINT_HOVER_MARKER: (f64, f64) = (4.0, 2.0);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    MoveCenter {
        prev: Point3,
    },
    Radius {
        min: f64,
    },
    MovePoint {
        edit: Option<usize>,
        prev_dir: Vector3,
    },
}

/// What lies under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hover {
    pub center: bool,
    pub circle: bool,
    pub point: Option<usize>,
}

/// Whether the host should keep the session open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone)]
pub struct ArrangeSession {
    arrangement: Arrangement,
    state: SessionState,
    hover: Hover,
    pressed: Hover,
    min_radius: f64,
}

impl ArrangeSession {
    pub fn new<N: Network + ?Sized>(arrangement: Arrangement, network: &N) -> Self {
        let min_radius = arrangement.min_radius(network);
        Self {
            arrangement,
            state: SessionState::Idle,
            hover: Hover::default(),
            pressed: Hover::default(),
            min_radius,
        }
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn hover(&self) -> Hover {
        self.hover
    }

    /// Lower radius bound: the widest ring segment.
    pub fn min_radius(&self) -> f64 {
        self.min_radius
    }

    /// Hit test at `pointer` and remember the result.
    pub fn hover_at(&mut self, pointer: Point3) -> Hover {
        let cfg = self.arrangement.config();
        let a = &self.arrangement;
        let distance = a.center().flat_distance(pointer);
        self.hover = Hover {
            center: distance <= cfg.hover_center_distance,
            circle: (distance - a.radius()).abs() <= cfg.hover_circle_width,
            point: a
                .positions()
                .iter()
                .position(|p| p.flat_distance(pointer) <= cfg.hover_point_distance),
        };
        self.hover
    }

    pub fn pointer_down(&mut self) {
        self.pressed = self.hover;
    }

    /// The first drag after a press picks the sub-state; later drags edit.
    pub fn pointer_drag(&mut self, pointer: Point3, modifiers: Modifiers) {
        let center = self.arrangement.center();
        match self.state {
            SessionState::Idle => {
                if self.pressed.center {
                    self.state = SessionState::MoveCenter { prev: pointer };
                } else if let Some(index) = self.pressed.point {
                    self.state = SessionState::MovePoint {
                        edit: Some(index),
                        prev_dir: (pointer - center).make_flat(),
                    };
                } else if self.pressed.circle {
                    self.state = SessionState::Radius {
                        min: self.min_radius,
                    };
                }
            }
            SessionState::MoveCenter { prev } => {
                let delta = (pointer - prev).make_flat() * modifiers.move_scale();
                self.arrangement.move_center(delta);
                self.state = SessionState::MoveCenter { prev: pointer };
            }
            SessionState::Radius { min } => {
                let raw = center.flat_distance(pointer);
                let radius = modifiers
                    .radius_step()
                    .map_or(raw, |step| round_to_nearest(raw, step));
                self.arrangement.set_radius(radius, min);
            }
            SessionState::MovePoint { edit, prev_dir } => {
                let dir = (pointer - center).make_flat();
                let delta = angle_between_xz(prev_dir, dir);
                if modifiers.only_shift() {
                    self.arrangement.turn_all(delta);
                } else if let Some(index) = edit {
                    if let Err(err) = self.arrangement.turn_point(index, delta) {
                        log::warn!("cannot rotate point {index}: {err}");
                    }
                }
                self.state = SessionState::MovePoint {
                    edit,
                    prev_dir: dir,
                };
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.state = SessionState::Idle;
        self.pressed = Hover::default();
    }

    /// Reset the hovered centre or point to its computed default.
    pub fn double_click<N: Network + ?Sized>(&mut self, network: &N) -> Result<()> {
        if self.hover.center {
            self.arrangement.reset_center();
        } else if let Some(index) = self.hover.point {
            self.arrangement.reset_point(index, network)?;
        }
        Ok(())
    }

    pub fn secondary_click(&mut self) -> Flow {
        self.escape()
    }

    /// Leave the current edit, or the whole session when idle.
    pub fn escape(&mut self) -> Flow {
        if self.state == SessionState::Idle {
            Flow::Exit
        } else {
            self.pointer_up();
            Flow::Continue
        }
    }

    /// Fit a fresh circle to the nodes' current positions.
    pub fn recalculate<N: Network + ?Sized>(&mut self, network: &N) -> Result<()> {
        self.arrangement.recalculate(network)?;
        self.min_radius = self.arrangement.min_radius(network);
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Apply the arrangement; the session ends on success.
    pub fn commit<N: Network + ?Sized>(&mut self, network: &mut N) -> Result<Flow> {
        self.arrangement.apply(network)?;
        Ok(Flow::Exit)
    }

    pub fn overlay(&self) -> Vec<OverlayItem> {
        let a = &self.arrangement;
        let cfg = a.config();
        let circle_highlight = a.circle_highlight();
        let mut items = Vec::new();

        let idle = self.state == SessionState::Idle;
        let circle_hovered =
            idle && self.hover.circle && !self.hover.center && self.hover.point.is_none();
        items.push(OverlayItem::Circle {
            center: a.center(),
            radius: a.radius(),
            highlight: if circle_hovered {
                Highlight::Hover
            } else {
                circle_highlight
            },
        });

        let hovered_point = match self.state {
            SessionState::Idle if !self.hover.center => self.hover.point,
            SessionState::MovePoint { edit, .. } => edit,
            _ => None,
        };
        for (i, target) in a.positions().into_iter().enumerate() {
            let highlight = a.point_highlight(i);
            if let Some(origin) = a.origins().get(i) {
                let current = Point3::new(origin.x, a.center().y, origin.z);
                if current.flat_distance(target) > cfg.min_move_distance {
                    items.push(OverlayItem::Line {
                        start: current,
                        end: target,
                        highlight,
                    });
                }
            }
            if hovered_point == Some(i) {
                items.push(ring(
                    target,
                    POINT_HOVER_MARKER,
                    if a.is_valid(i) {
                        Highlight::Hover
                    } else {
                        Highlight::Neutral
                    },
                ));
            }
            items.push(ring(target, POINT_MARKER, highlight));
        }

        let center_hovered = matches!(self.state, SessionState::MoveCenter { .. })
            || (idle && self.hover.center);
        if center_hovered {
            items.push(ring(a.center(), CENTER_HOVER_MARKER, Highlight::Neutral));
        }
        items.push(ring(a.center(), CENTER_MARKER, circle_highlight));
        items
    }
}

fn ring(center: Point3, (outer, inner): (f64, f64), highlight: Highlight) -> OverlayItem {
    OverlayItem::Ring {
        center,
        outer,
        inner,
        highlight,
    }
}
