//! Saved-game files

use lines_core::{SavedGame, SavedGameError};
use std::fs;
use std::path::Path;

/// Error types for writing a save file
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to write save file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode save file: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Error types for reading a save file back
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read save file: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("save file failed validation: {0}")]
    Invalid(#[from] SavedGameError),
}

/// Write a snapshot as pretty JSON
pub fn save_game(saved: &SavedGame, path: &Path) -> Result<(), SaveError> {
    let content = serde_json::to_string_pretty(saved)?;
    fs::write(path, content)?;
    Ok(())
}

/// Read a snapshot back; validation happens when the snapshot is
/// restored into a board
pub fn load_game(path: &Path) -> Result<SavedGame, LoadError> {
    let content = fs::read_to_string(path)?;
    let saved = serde_json::from_str(&content)?;
    Ok(saved)
}
