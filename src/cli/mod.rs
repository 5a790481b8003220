//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod encode;
mod query;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, GridConfig};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Input formats the encoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// JSON or JSON5 scene dump
    Scene,
    /// PNG label image
    LabelImage,
}

/// Classify a path by extension. Previously written grids are not inputs.
pub fn input_kind(path: &Path) -> Option<InputKind> {
    let name = path.file_name().and_then(|n| n.to_str())?;
    if name.ends_with(".grid.json") {
        return None;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") | Some("json5") => Some(InputKind::Scene),
        Some("png") => Some(InputKind::LabelImage),
        _ => None,
    }
}

/// Find all encodable files in a directory (recursively), sorted.
pub fn find_input_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let dir_str = dir.display().to_string();

    for ext in ["json", "json5", "png"] {
        if let Ok(paths) = glob(&format!("{}/**/*.{}", dir_str, ext)) {
            files.extend(paths.filter_map(Result::ok).filter(|p| input_kind(p).is_some()));
        }
    }

    files.sort();
    files
}

/// utfgrid - Encode feature-id rasters as interactive grids
#[derive(Parser)]
#[command(name = "utfgrid")]
#[command(about = "utfgrid - Encode feature-id rasters as interactive UTF-8 grids")]
#[command(version)]
pub struct Cli {
    /// Path to a utfgrid.toml (default: search upwards from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode scene files (.json, .json5) or label images (.png) to grid JSON
    Encode {
        /// Input files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (single input) or directory.
        /// If omitted with a single input: print to stdout.
        /// If omitted with several inputs: {input_dir}/{stem}.grid.json
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sampling stride for both axes (default: 4)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        resolution: Option<u32>,

        /// Maximum number of distinct keys per grid
        #[arg(long)]
        max_keys: Option<usize>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Hit-test a pixel of an encoded grid
    Query {
        /// Grid JSON file
        grid: PathBuf,

        /// Pixel column
        x: u32,

        /// Pixel row
        y: u32,

        /// Resolution the grid was encoded at (default: from config)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        resolution: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarise and validate an encoded grid
    Info {
        /// Grid JSON file
        grid: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Load the configuration and apply command-line overrides.
pub(crate) fn resolve_config(
    path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<GridConfig, ExitCode> {
    match load_config(path) {
        Ok(mut config) => {
            merge_cli_overrides(&mut config, overrides);
            let errors = config.validate();
            if errors.is_empty() {
                Ok(config)
            } else {
                for e in errors {
                    eprintln!("Error: {}", e);
                }
                Err(ExitCode::from(EXIT_INVALID_ARGS))
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(ExitCode::from(EXIT_ERROR))
        }
    }
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Encode { inputs, output, resolution, max_keys, pretty } => {
            let overrides = CliOverrides {
                resolution,
                max_keys,
                pretty: pretty.then_some(true),
                out: None,
            };
            let config = match resolve_config(config_path, &overrides) {
                Ok(c) => c,
                Err(code) => return code,
            };
            encode::run_encode(&inputs, output.as_deref(), &config)
        }
        Commands::Query { grid, x, y, resolution, json } => {
            let overrides = CliOverrides { resolution, ..Default::default() };
            let config = match resolve_config(config_path, &overrides) {
                Ok(c) => c,
                Err(code) => return code,
            };
            query::run_query(&grid, x, y, config.encode.resolution, json)
        }
        Commands::Info { grid, json } => query::run_info(&grid, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind() {
        assert_eq!(input_kind(Path::new("tile.json")), Some(InputKind::Scene));
        assert_eq!(input_kind(Path::new("a/tile.json5")), Some(InputKind::Scene));
        assert_eq!(input_kind(Path::new("labels.png")), Some(InputKind::LabelImage));
        assert_eq!(input_kind(Path::new("tile.grid.json")), None);
        assert_eq!(input_kind(Path::new("tile.txt")), None);
        assert_eq!(input_kind(Path::new("json")), None);
    }

    #[test]
    fn test_find_input_files() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path();

        fs::write(dir_path.join("a.json"), "{}").unwrap();
        fs::write(dir_path.join("b.json5"), "{}").unwrap();
        fs::write(dir_path.join("a.grid.json"), "{}").unwrap();
        fs::write(dir_path.join("notes.txt"), "ignored").unwrap();

        let sub_dir = dir_path.join("z12");
        fs::create_dir(&sub_dir).unwrap();
        fs::write(sub_dir.join("labels.png"), "not decoded here").unwrap();

        let files = find_input_files(dir_path);
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| input_kind(f).is_some()));
    }

    #[test]
    fn test_cli_parses_encode() {
        let cli = Cli::try_parse_from(["utfgrid", "encode", "a.json", "b.png", "-r", "2", "--pretty"])
            .unwrap();
        match cli.command {
            Commands::Encode { inputs, resolution, pretty, .. } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(resolution, Some(2));
                assert!(pretty);
            }
            _ => panic!("expected encode"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_resolution() {
        assert!(Cli::try_parse_from(["utfgrid", "encode", "a.json", "-r", "0"]).is_err());
    }
}
