//! Writing grid documents to disk.

use crate::utfgrid::UtfGrid;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension appended to the input stem for written grids.
pub const GRID_EXTENSION: &str = "grid.json";

/// Error type for export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error during file writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Options for export operations.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Pretty print output (with indentation)
    pub pretty: bool,
}

/// Render a grid as a JSON string according to `options`.
pub fn export_to_string(grid: &UtfGrid, options: &ExportOptions) -> Result<String, ExportError> {
    let json = if options.pretty { grid.to_json_pretty()? } else { grid.to_json()? };
    Ok(json)
}

/// Write a grid to `output_path`, creating parent directories as needed.
pub fn export_grid(grid: &UtfGrid, output_path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(output_path)?);
    if options.pretty {
        serde_json::to_writer_pretty(&mut writer, grid)?;
    } else {
        serde_json::to_writer(&mut writer, grid)?;
    }
    writer.flush()?;
    Ok(())
}

/// Output path for an input file: `{out_dir}/{stem}.grid.json`.
///
/// | Input | `out_dir` | Output |
/// |-------|-----------|--------|
/// | `tiles/a.json5` | `None` | `tiles/a.grid.json` |
/// | `tiles/a.png` | `Some("out")` | `out/a.grid.json` |
pub fn output_path_for(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("grid");
    let name = format!("{}.{}", stem, GRID_EXTENSION);
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}
