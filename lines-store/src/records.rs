//! Record table storage

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Error types for record-table access
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    #[error("failed to access records file: {0}")]
    Io(#[from] std::io::Error),

    #[error("records file holds invalid data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Player name to best score, backed by a JSON file.
/// A missing file reads as an empty table.
pub struct RecordsStore {
    path: PathBuf,
}

impl RecordsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Insert `name`, or raise its stored score if `score` beats it
    pub fn add_record(&self, name: &str, score: u32) -> Result<(), RecordsError> {
        let mut table = self.read_table()?;

        let best = table.entry(name.to_string()).or_insert(0);
        if score > *best {
            *best = score;
        }

        let content = serde_json::to_string_pretty(&table)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Every record, best score first, names breaking ties
    pub fn records(&self) -> Result<Vec<(String, u32)>, RecordsError> {
        let table = self.read_table()?;
        let mut rows: Vec<(String, u32)> = table.into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(rows)
    }

    fn read_table(&self) -> Result<BTreeMap<String, u32>, RecordsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        let table = serde_json::from_str(&content)?;
        Ok(table)
    }
}
