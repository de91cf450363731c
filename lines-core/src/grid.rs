//! Rectangular grid coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinates: `x` selects the column, `y` the row, top-left origin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i16,
    pub y: i16,
}

impl Pos {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Position one (dx, dy) step away
    pub fn offset(self, dx: i16, dy: i16) -> Pos {
        Pos::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Step vectors (dx, dy) for path search (4-neighborhood)
/// Index: 0=up, 1=right, 2=down, 3=left
pub const ORTHO_STEPS: [(i16, i16); 4] = [
    (0, -1),  // up
    (1, 0),   // right
    (0, 1),   // down
    (-1, 0),  // left
];

/// Scan axes (dx, dy) for run detection; each axis is walked both ways
pub const LINE_AXES: [(i16, i16); 4] = [
    (1, 0),   // horizontal
    (0, 1),   // vertical
    (1, 1),   // diagonal
    (1, -1),  // anti-diagonal
];
