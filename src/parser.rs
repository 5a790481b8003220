//! Scene file parsing.
//!
//! A scene is a dump of everything the encoder consumes from a renderer:
//! grid dimensions, per-pixel ids, the id -> key table, per-key attributes and
//! the ordered field list. Scenes are read as JSON5, so plain JSON works too
//! and hand-written scenes may use comments, trailing commas and unquoted keys.
//!
//! ```json5
//! {
//!   width: 4, height: 2,
//!   fields: ["name"],
//!   keys: { "1": "k1" },
//!   features: { k1: { name: "Alice" } },
//!   rows: [[1, 1, null, null], [1, 1, null, 7]],  // null = background
//! }
//! ```

use crate::grid::{FeatureId, GridBuffer, BASE_ID};
use crate::models::FeatureRecord;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Error type for scene loading failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SceneError {
    /// File I/O error
    #[error("Failed to read scene: {0}")]
    Io(#[from] std::io::Error),
    /// JSON5 syntax or shape error
    #[error("Failed to parse scene: {0}")]
    Parse(String),
    /// Row data does not match the declared size
    #[error("Scene dimensions mismatch: {0}")]
    Dimensions(String),
    /// A key-table entry is not an integer id, or is the background id
    #[error("Invalid feature id '{0}' in keys table")]
    InvalidId(String),
}

/// Raw scene document as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub keys: HashMap<String, String>,
    #[serde(default)]
    pub features: HashMap<String, FeatureRecord>,
    pub rows: Vec<Vec<Option<FeatureId>>>,
}

impl Scene {
    /// Build the owned grid this scene describes.
    ///
    /// Dimensions are checked against the row data before anything is
    /// allocated, so the buffer never exceeds what the scene actually holds.
    pub fn into_grid(self) -> Result<GridBuffer, SceneError> {
        if self.rows.len() != self.height {
            return Err(SceneError::Dimensions(format!(
                "expected {} rows, found {}",
                self.height,
                self.rows.len()
            )));
        }
        if let Some((y, row)) = self.rows.iter().enumerate().find(|(_, row)| row.len() != self.width) {
            return Err(SceneError::Dimensions(format!(
                "row {} has {} entries, expected {}",
                y,
                row.len(),
                self.width
            )));
        }

        let mut grid = GridBuffer::try_new(self.width, self.height).ok_or_else(|| {
            SceneError::Dimensions(format!("{}x{} grid is too large", self.width, self.height))
        })?;
        grid.set_fields(self.fields);

        for (id, key) in self.keys {
            let parsed: FeatureId = match id.trim().parse() {
                Ok(parsed) if parsed != BASE_ID => parsed,
                _ => return Err(SceneError::InvalidId(id)),
            };
            grid.add_key(parsed, key);
        }
        for (key, record) in self.features {
            grid.add_feature(key, record);
        }

        let mut ids = Vec::with_capacity(self.width);
        for (y, row) in self.rows.iter().enumerate() {
            ids.clear();
            ids.extend(row.iter().map(|id| id.unwrap_or(BASE_ID)));
            grid.set_row(y, &ids);
        }

        Ok(grid)
    }
}

/// Parse a scene from a JSON or JSON5 string.
pub fn parse_scene(content: &str) -> Result<GridBuffer, SceneError> {
    let scene: Scene = json5::from_str(content).map_err(|e| SceneError::Parse(e.to_string()))?;
    scene.into_grid()
}

/// Load a scene file.
pub fn load_scene(path: &Path) -> Result<GridBuffer, SceneError> {
    let content = std::fs::read_to_string(path)?;
    parse_scene(&content)
}
