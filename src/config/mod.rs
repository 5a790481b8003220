//! Configuration module for the grid encoder
//!
//! Provides types and parsing for `utfgrid.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
