//! utfgrid - Interactive grid encoding for pixel-level feature hit-testing
//!
//! This library provides functionality to:
//! - Encode a raster of feature-reference ids into a compact UTF-8 grid plus
//!   a deduplicated feature attribute table, packaged as one JSON document
//! - Load grid snapshots from JSON/JSON5 scene files and PNG label images
//! - Hit-test encoded grids the way a map client does

pub mod cli;
pub mod codepoint;
pub mod config;
pub mod encoder;
pub mod export;
pub mod grid;
pub mod import;
pub mod models;
pub mod parser;
pub mod utfgrid;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use encoder::{encode, grid_to_json, EncodeError, EncodeOptions};
pub use grid::{GridBuffer, GridView, ResolvedKey, BASE_ID};
pub use utfgrid::UtfGrid;
