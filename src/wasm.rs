//! WASM API module for browser/JS interop
//!
//! Provides WebAssembly bindings for encoding scenes and hit-testing grids.

use wasm_bindgen::prelude::*;

use crate::encoder::grid_to_json;
use crate::parser::parse_scene;
use crate::utfgrid::UtfGrid;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Encode a JSON/JSON5 scene at `resolution`.
///
/// Returns `undefined` if the scene cannot be parsed, the resolution is 0,
/// or the scene has too many distinct keys.
#[wasm_bindgen]
pub fn encode_scene(scene: &str, resolution: u32) -> Option<String> {
    let grid = parse_scene(scene).ok()?;
    grid_to_json(Some(&grid.view()), resolution)
}

/// Key under pixel `(x, y)` of an encoded grid.
///
/// Returns `""` for background and `undefined` when nothing is there.
#[wasm_bindgen]
pub fn lookup_key(grid_json: &str, x: u32, y: u32, resolution: u32) -> Option<String> {
    let grid = UtfGrid::from_json(grid_json).ok()?;
    grid.lookup_pixel(x, y, resolution).map(|hit| hit.key.to_string())
}

/// Attribute JSON of the feature under pixel `(x, y)`, if any.
#[wasm_bindgen]
pub fn lookup_data(grid_json: &str, x: u32, y: u32, resolution: u32) -> Option<String> {
    let grid = UtfGrid::from_json(grid_json).ok()?;
    let hit = grid.lookup_pixel(x, y, resolution)?;
    hit.data.map(|data| data.to_string())
}

/// Validate a grid document, returning the problem found (empty if valid).
#[wasm_bindgen]
pub fn validate_grid(grid_json: &str) -> String {
    match UtfGrid::from_json(grid_json).and_then(|grid| grid.validate()) {
        Ok(()) => String::new(),
        Err(e) => e.to_string(),
    }
}
