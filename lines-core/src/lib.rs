//! Lines Core - Board engine for the Lines puzzle
//!
//! This crate provides the rules of the game:
//! - Grid coordinates and direction tables
//! - Colored tokens and the pending-token queue
//! - Board state with free-cell bookkeeping
//! - Path reachability, run detection, clearing and scoring
//! - The turn protocol and the saved-game shape

pub mod grid;
pub mod token;
pub mod board;
pub mod save;

// Re-exports for convenient access
pub use grid::{Pos, ORTHO_STEPS, LINE_AXES};
pub use token::{Token, ColorId};
pub use board::{Board, BoardConfig, BoardError, TurnReport};
pub use save::{SavedGame, SavedGameError};
