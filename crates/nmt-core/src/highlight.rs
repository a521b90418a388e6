use serde::{Deserialize, Serialize};

/// Display category handed to the overlay renderer.
///
/// The core only classifies; mapping a category to an actual colour is left
/// to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Highlight {
    /// Plain geometry of a successful solve (white).
    Neutral,
    /// Element satisfies its constraints (green).
    Correct,
    /// Element violates its constraints (red).
    Incorrect,
    /// Valid but worth attention, e.g. a large angular gap (orange).
    Warning,
    /// Element under the pointer (blue).
    Hover,
}

impl Highlight {
    /// `Correct` when `ok`, `Incorrect` otherwise.
    pub fn validity(ok: bool) -> Self {
        if ok {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }
}
