//! Lines Store - On-disk gateways
//!
//! JSON persistence for the two things a game session leaves behind:
//! - Saved games (full board snapshots)
//! - The record table (player name to best score)
//!
//! Every failure here is recoverable; the frontend reports it and keeps
//! the in-memory game intact.

pub mod saves;
pub mod records;

pub use saves::{save_game, load_game, SaveError, LoadError};
pub use records::{RecordsStore, RecordsError};
