//! Configuration schema types for `utfgrid.toml`
//!
//! Defines the structure and validation rules for encoder configuration.

use crate::codepoint::MAX_KEYS;
use crate::encoder::{EncodeOptions, DEFAULT_RESOLUTION};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Encoding settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// Sampling stride applied to both axes
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Maximum number of distinct keys per grid
    #[serde(default = "default_max_keys")]
    pub max_keys: usize,
    /// Replaces the field list of every input when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            max_keys: default_max_keys(),
            fields: None,
        }
    }
}

impl EncodeConfig {
    /// Encoder options derived from this section.
    pub fn options(&self) -> EncodeOptions {
        EncodeOptions { resolution: self.resolution, max_keys: self.max_keys }
    }
}

fn default_resolution() -> u32 {
    DEFAULT_RESOLUTION
}

fn default_max_keys() -> usize {
    MAX_KEYS
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Indent written documents
    #[serde(default)]
    pub pretty: bool,
    /// Directory for written grids; next to each input when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,
}

/// Complete `utfgrid.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub encode: EncodeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// A single validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "encode.resolution")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "utfgrid.toml: '{}' {}", self.field, self.message)
    }
}

impl GridConfig {
    /// Validate the configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.encode.resolution == 0 {
            errors.push(ConfigValidationError {
                field: "encode.resolution".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.encode.max_keys == 0 || self.encode.max_keys > MAX_KEYS {
            errors.push(ConfigValidationError {
                field: "encode.max_keys".to_string(),
                message: format!("must be between 1 and {}", MAX_KEYS),
            });
        }

        if let Some(fields) = &self.encode.fields {
            if fields.iter().any(|f| f.is_empty()) {
                errors.push(ConfigValidationError {
                    field: "encode.fields".to_string(),
                    message: "must not contain empty names".to_string(),
                });
            }
        }

        errors
    }

    /// Check if the configuration is valid
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
