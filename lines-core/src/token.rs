//! Colored playing tokens

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Token color identifier; 0 is the uninitialized sentinel, playable
/// colors start at 1
pub type ColorId = u8;

/// A colored token occupying one board cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token(ColorId);

impl Token {
    pub const fn new(color: ColorId) -> Self {
        Self(color)
    }

    pub fn color(&self) -> ColorId {
        self.0
    }

    pub fn set_color(&mut self, color: ColorId) {
        self.0 = color;
    }

    /// Token with a color drawn uniformly from [1, max_color]
    pub fn random<R: Rng>(rng: &mut R, max_color: ColorId) -> Self {
        Self(rng.gen_range(1..=max_color))
    }

    /// Redraw the color uniformly from [1, max_color]
    pub fn set_random_color<R: Rng>(&mut self, rng: &mut R, max_color: ColorId) {
        self.0 = rng.gen_range(1..=max_color);
    }
}
