use serde::{Deserialize, Serialize};

/// Modifier key state of an already decoded input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };

    pub fn only_shift(self) -> bool {
        self.shift && !self.ctrl && !self.alt
    }

    pub fn only_ctrl(self) -> bool {
        self.ctrl && !self.shift && !self.alt
    }

    pub fn only_alt(self) -> bool {
        self.alt && !self.shift && !self.ctrl
    }

    /// Rounding step for interactive radius edits: shift 10, ctrl 1, alt 0.1.
    pub fn radius_step(self) -> Option<f64> {
        if self.only_shift() {
            Some(10.0)
        } else if self.only_ctrl() {
            Some(1.0)
        } else if self.only_alt() {
            Some(0.1)
        } else {
            None
        }
    }

    /// Scale applied to drag deltas for fine movement: ctrl 0.1, alt 0.01.
    pub fn move_scale(self) -> f64 {
        if self.only_ctrl() {
            0.1
        } else if self.only_alt() {
            0.01
        } else {
            1.0
        }
    }
}
