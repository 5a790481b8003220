//! Query and info command implementations
//!
//! Both commands read an already encoded grid document: `query` hit-tests a
//! pixel the way a map client would, `info` summarises and validates it.

use std::path::Path;
use std::process::ExitCode;

use crate::utfgrid::UtfGrid;

use super::{EXIT_ERROR, EXIT_SUCCESS};

fn read_grid(path: &Path) -> Result<UtfGrid, ExitCode> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", path.display(), e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    UtfGrid::from_json(&content).map_err(|e| {
        eprintln!("Error: {}: {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Execute the query command
pub fn run_query(path: &Path, x: u32, y: u32, resolution: u32, json: bool) -> ExitCode {
    let grid = match read_grid(path) {
        Ok(g) => g,
        Err(code) => return code,
    };

    let Some(hit) = grid.lookup_pixel(x, y, resolution) else {
        if json {
            let output = serde_json::json!({ "x": x, "y": y, "hit": false });
            println!("{}", output);
        } else {
            println!("({}, {}): no feature", x, y);
        }
        return ExitCode::from(EXIT_SUCCESS);
    };

    if json {
        let output = serde_json::json!({
            "x": x,
            "y": y,
            "hit": true,
            "key": hit.key,
            "background": hit.is_background(),
            "data": hit.data,
        });
        println!("{}", output);
    } else if hit.is_background() {
        println!("({}, {}): background", x, y);
    } else {
        println!("({}, {}): {}", x, y, hit.key);
        if let Some(serde_json::Value::Object(fields)) = hit.data {
            for (name, value) in fields {
                println!("  {} = {}", name, value);
            }
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the info command
pub fn run_info(path: &Path, json: bool) -> ExitCode {
    let grid = match read_grid(path) {
        Ok(g) => g,
        Err(code) => return code,
    };

    let widest = grid.grid.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    let ragged = grid.grid.iter().any(|row| row.chars().count() != widest);
    let validation = grid.validate();

    if json {
        let output = serde_json::json!({
            "rows": grid.rows(),
            "columns": widest,
            "ragged": ragged,
            "keys": grid.keys.len(),
            "features": grid.data.len(),
            "valid": validation.is_ok(),
            "error": validation.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", output);
    } else {
        println!("Grid: {}", path.display());
        println!("  Rows:     {}", grid.rows());
        println!("  Columns:  {}{}", widest, if ragged { " (ragged)" } else { "" });
        println!("  Keys:     {}", grid.keys.len());
        println!("  Features: {}", grid.data.len());
        if let Err(e) = &validation {
            println!("  Invalid:  {}", e);
        }
    }

    if validation.is_ok() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
