//! Saved-game shape and validation
//!
//! The serializable snapshot of a board. Byte encoding is the storage
//! gateway's business; this module owns the shape and the checks a
//! snapshot must pass before it becomes a live board again.

use crate::board::{Board, BoardConfig};
use crate::grid::Pos;
use crate::token::{ColorId, Token};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Snapshot validation failures
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SavedGameError {
    #[error("invalid board dimensions {width}x{height}")]
    BadDimensions { width: i16, height: i16 },

    #[error("grid has {found} rows, expected {expected}")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("grid row {row} has {found} cells, expected {expected}")]
    RowWidthMismatch { row: usize, expected: usize, found: usize },

    #[error("token color {color} at {pos} is outside the palette 1..={palette}")]
    ColorOutOfRange { pos: Pos, color: ColorId, palette: ColorId },

    #[error("pending queue holds {found} tokens, expected {expected}")]
    PendingLenMismatch { expected: usize, found: usize },

    #[error("pending token color {color} is outside the palette 1..={palette}")]
    PendingColorOutOfRange { color: ColorId, palette: ColorId },
}

/// Everything a saved game carries
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub width: i16,
    pub height: i16,
    pub player_name: String,
    pub score: u32,
    /// Cell colors, addressed grid[y][x]; empty cells are null
    pub grid: Vec<Vec<Option<Token>>>,
    pub pending_tokens: Vec<Token>,
}

impl SavedGame {
    /// Snapshot a live board
    pub fn capture(board: &Board) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            player_name: board.player().to_string(),
            score: board.score(),
            grid: board.rows().to_vec(),
            pending_tokens: board.pending().to_vec(),
        }
    }

    /// Rebuild a board from the snapshot, recomputing free-cell
    /// bookkeeping from the grid
    pub fn restore(self, config: BoardConfig, rng: ChaCha8Rng) -> Result<Board, SavedGameError> {
        self.validate(config)?;
        Ok(Board::from_parts(
            self.width,
            self.height,
            self.player_name,
            self.score,
            self.grid,
            self.pending_tokens,
            config,
            rng,
        ))
    }

    fn validate(&self, config: BoardConfig) -> Result<(), SavedGameError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SavedGameError::BadDimensions {
                width: self.width,
                height: self.height,
            });
        }

        if self.grid.len() != self.height as usize {
            return Err(SavedGameError::RowCountMismatch {
                expected: self.height as usize,
                found: self.grid.len(),
            });
        }

        for (y, row) in self.grid.iter().enumerate() {
            if row.len() != self.width as usize {
                return Err(SavedGameError::RowWidthMismatch {
                    row: y,
                    expected: self.width as usize,
                    found: row.len(),
                });
            }
            for (x, cell) in row.iter().enumerate() {
                if let Some(token) = cell {
                    let color = token.color();
                    if color < 1 || color > config.palette_size {
                        return Err(SavedGameError::ColorOutOfRange {
                            pos: Pos::new(x as i16, y as i16),
                            color,
                            palette: config.palette_size,
                        });
                    }
                }
            }
        }

        if self.pending_tokens.len() != config.queue_len {
            return Err(SavedGameError::PendingLenMismatch {
                expected: config.queue_len,
                found: self.pending_tokens.len(),
            });
        }
        for token in &self.pending_tokens {
            let color = token.color();
            if color < 1 || color > config.palette_size {
                return Err(SavedGameError::PendingColorOutOfRange {
                    color,
                    palette: config.palette_size,
                });
            }
        }

        Ok(())
    }
}
