//! Encode command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rayon::prelude::*;
use thiserror::Error;

use crate::config::GridConfig;
use crate::encoder::{encode, EncodeError};
use crate::export::{export_grid, export_to_string, output_path_for, ExportError, ExportOptions};
use crate::grid::GridBuffer;
use crate::import::{import_png, ImportError};
use crate::parser::{load_scene, SceneError};
use crate::utfgrid::UtfGrid;

use super::{find_input_files, input_kind, InputKind, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Failure while turning one input file into a grid document.
#[derive(Debug, Error)]
enum EncodeFileError {
    #[error("unsupported input '{0}' (expected .json, .json5 or .png)")]
    Unsupported(PathBuf),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Load an input file as a grid, applying the configured field override.
fn load_input(path: &Path, config: &GridConfig) -> Result<GridBuffer, EncodeFileError> {
    let mut grid = match input_kind(path) {
        Some(InputKind::Scene) => load_scene(path)?,
        Some(InputKind::LabelImage) => import_png(path)?,
        None => return Err(EncodeFileError::Unsupported(path.to_path_buf())),
    };
    if let Some(fields) = &config.encode.fields {
        grid.set_fields(fields.clone());
    }
    Ok(grid)
}

fn encode_file(path: &Path, config: &GridConfig) -> Result<UtfGrid, EncodeFileError> {
    let grid = load_input(path, config)?;
    Ok(encode(&grid.view(), &config.encode.options())?)
}

/// Expand directories into the encodable files they contain.
fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = find_input_files(input);
            if found.is_empty() {
                log::warn!("no encodable files in {}", input.display());
            }
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Where a single input's grid goes when `-o` is given.
fn single_output_path(input: &Path, output: &Path) -> PathBuf {
    let is_dir = output.is_dir() || output.to_string_lossy().ends_with('/');
    if is_dir {
        output_path_for(input, Some(output))
    } else {
        output.to_path_buf()
    }
}

/// Execute the encode command
pub fn run_encode(inputs: &[PathBuf], output: Option<&Path>, config: &GridConfig) -> ExitCode {
    let files = expand_inputs(inputs);
    if files.is_empty() {
        eprintln!("Error: no input files");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let export_options = ExportOptions { pretty: config.output.pretty };
    let out_dir = output.or(config.output.out.as_deref());

    // One file, nowhere to write: print the document
    if files.len() == 1 && out_dir.is_none() {
        let rendered = encode_file(&files[0], config)
            .and_then(|grid| export_to_string(&grid, &export_options).map_err(EncodeFileError::from));
        return match rendered {
            Ok(json) => {
                println!("{}", json);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}: {}", files[0].display(), e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    let targets: Vec<(PathBuf, PathBuf)> = files
        .iter()
        .map(|file| {
            let target = match (files.len(), output) {
                (1, Some(out)) => single_output_path(file, out),
                _ => output_path_for(file, out_dir),
            };
            (file.clone(), target)
        })
        .collect();

    let results: Vec<Result<(), EncodeFileError>> = targets
        .par_iter()
        .map(|(input, target)| -> Result<(), EncodeFileError> {
            let grid = encode_file(input, config)?;
            export_grid(&grid, target, &export_options)?;
            Ok(())
        })
        .collect();

    let mut failed = 0;
    for ((input, target), result) in targets.iter().zip(results) {
        match result {
            Ok(()) => println!("{} -> {}", input.display(), target.display()),
            Err(e) => {
                eprintln!("Error: {}: {}", input.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("{} of {} inputs failed", failed, targets.len());
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
