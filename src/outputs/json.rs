//! JSON output of the flat dataset.
//!
//! Rows are written as a pretty-printed array in pipeline order:
//!
//! ```text
//! [
//!   { "year": "2023", "start": "2023-01-07T10:00:00+00:00", "place": 120 },
//!   ...
//! ]
//! ```

use crate::error::Result;
use crate::models::FlatRow;
use crate::outputs::Render;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Writes the rows to a JSON file. An empty dataset produces `[]`.
#[derive(Debug, Clone)]
pub struct JsonDataset {
    pub path: PathBuf,
}

impl JsonDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Render for JsonDataset {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), rows = rows.len()))]
    async fn render(&self, rows: &[FlatRow]) -> Result<()> {
        let json = serde_json::to_string_pretty(rows)?;
        fs::write(&self.path, json).await?;
        info!("Wrote JSON dataset");
        Ok(())
    }
}
