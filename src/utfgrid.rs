//! The interactive grid document.
//!
//! # Output Format
//!
//! ```json
//! {"keys":["","lake"],"data":{"lake":{"name":"Tahoe"}},"grid":["  !!","  !!"]}
//! ```
//!
//! - `keys`: key text per allocated codepoint, `""` for the background
//! - `data`: attribute object per feature key, background excluded
//! - `grid`: one string per sampled row, one character per resolvable sample
//!
//! Besides serialization, [`UtfGrid`] can answer hit-test queries the way a
//! map client would: decode the character under a cell back into its key.

use crate::codepoint::index_for_codepoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for reading grid documents
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document is not valid JSON or lacks a member
    #[error("invalid grid document: {0}")]
    Parse(#[from] serde_json::Error),
    /// A row holds a character that no key could have been assigned
    #[error("row {row} column {column}: character U+{codepoint:04X} is not a key codepoint")]
    InvalidCodepoint { row: usize, column: usize, codepoint: u32 },
    /// A row references a key index past the end of `keys`
    #[error("row {row} column {column}: key index {index} out of range ({len} keys)")]
    KeyOutOfRange { row: usize, column: usize, index: usize, len: usize },
}

/// An encoded interactive grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtfGrid {
    pub keys: Vec<String>,
    pub data: serde_json::Map<String, serde_json::Value>,
    pub grid: Vec<String>,
}

/// Result of a hit-test.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'a> {
    /// Key under the cell, `""` for background
    pub key: &'a str,
    /// Attributes of the feature, if it has any
    pub data: Option<&'a serde_json::Value>,
}

impl Hit<'_> {
    pub fn is_background(&self) -> bool {
        self.key.is_empty()
    }
}

impl UtfGrid {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a grid document.
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of encoded rows.
    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    /// Hit-test the cell at `column` of encoded row `row`.
    ///
    /// Returns `None` outside the grid or when the character does not map to
    /// a key. Columns count characters, so they line up with pixels only when
    /// every sample in the row resolved to a key.
    pub fn lookup(&self, column: usize, row: usize) -> Option<Hit<'_>> {
        let ch = self.grid.get(row)?.chars().nth(column)?;
        let key = self.keys.get(index_for_codepoint(ch)?)?.as_str();
        Some(Hit { key, data: self.data.get(key) })
    }

    /// Hit-test pixel `(x, y)` of a grid encoded at `resolution`.
    pub fn lookup_pixel(&self, x: u32, y: u32, resolution: u32) -> Option<Hit<'_>> {
        if resolution == 0 {
            return None;
        }
        self.lookup((x / resolution) as usize, (y / resolution) as usize)
    }

    /// Check that every character in every row decodes to a listed key.
    pub fn validate(&self) -> Result<(), DecodeError> {
        let len = self.keys.len();
        for (row, line) in self.grid.iter().enumerate() {
            for (column, ch) in line.chars().enumerate() {
                let index = index_for_codepoint(ch).ok_or(DecodeError::InvalidCodepoint {
                    row,
                    column,
                    codepoint: ch as u32,
                })?;
                if index >= len {
                    return Err(DecodeError::KeyOutOfRange { row, column, index, len });
                }
            }
        }
        Ok(())
    }
}
