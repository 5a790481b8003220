//! Locating and reading `utfgrid.toml`.
//!
//! The nearest `utfgrid.toml` at or above the working directory wins, so a
//! tile tree can carry its own encoding settings. Without one, the per-user
//! file in `$XDG_CONFIG_HOME/utfgrid/` applies, and without that the built-in
//! defaults do.

use super::schema::GridConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "utfgrid.toml";

/// Directory under the user config home holding [`CONFIG_FILE`].
pub const CONFIG_DIR: &str = "utfgrid";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    /// The file is not valid TOML or has mistyped values
    #[error("{}: {source}", .path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
    /// The file parsed but holds out-of-range values
    #[error("{}:\n{}", .path.display(), .problems.iter().map(|p| format!("  - {}", p)).collect::<Vec<_>>().join("\n"))]
    Validation { path: PathBuf, problems: Vec<String> },
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override sampling resolution
    pub resolution: Option<u32>,
    /// Override key ceiling
    pub max_keys: Option<usize>,
    /// Override pretty printing
    pub pretty: Option<bool>,
    /// Override output directory
    pub out: Option<PathBuf>,
}

/// Per-user config directory: `$XDG_CONFIG_HOME/utfgrid`, else `~/.config/utfgrid`.
pub fn user_config_dir() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|base| base.join(CONFIG_DIR))
}

/// Nearest [`CONFIG_FILE`] in `start` or one of its ancestors.
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join(CONFIG_FILE)).find(|path| path.is_file())
}

/// Config file for the current directory, falling back to the per-user one.
pub fn find_config() -> Option<PathBuf> {
    let local = env::current_dir().ok().and_then(|cwd| find_config_from(&cwd));
    local.or_else(|| {
        user_config_dir().map(|dir| dir.join(CONFIG_FILE)).filter(|path| path.is_file())
    })
}

/// Load the configuration.
///
/// An explicit `path` must exist. Otherwise the discovered file is used, or
/// the defaults when there is none.
pub fn load_config(path: Option<&Path>) -> Result<GridConfig, ConfigError> {
    let Some(path) = path.map(Path::to_path_buf).or_else(find_config) else {
        return Ok(GridConfig::default());
    };
    log::debug!("loading config from {}", path.display());

    let contents = fs::read_to_string(&path)
        .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
    let config: GridConfig = toml::from_str(&contents)
        .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

    let problems: Vec<String> = config.validate().iter().map(|e| e.to_string()).collect();
    if !problems.is_empty() {
        return Err(ConfigError::Validation { path, problems });
    }
    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut GridConfig, overrides: &CliOverrides) {
    if let Some(resolution) = overrides.resolution {
        config.encode.resolution = resolution;
    }
    if let Some(max_keys) = overrides.max_keys {
        config.encode.max_keys = max_keys;
    }
    if let Some(pretty) = overrides.pretty {
        config.output.pretty = pretty;
    }
    if let Some(ref out) = overrides.out {
        config.output.out = Some(out.clone());
    }
}
