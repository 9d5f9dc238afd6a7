// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{CocoError, Result};

/// File name looked up during discovery.
pub const CONFIG_FILE_NAME: &str = "coco.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that `[command].command` exists and that a trigger mode can be
///   decided.
///
/// Validation messages name the offending file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    ConfigFile::try_from(raw_config).map_err(|e| match e {
        CocoError::ConfigError(msg) => {
            CocoError::ConfigError(format!("{msg} in config file {}", path.display()))
        }
        other => other,
    })
}

/// Helper to resolve a default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Find `coco.toml`, first in the current directory, then in each of
/// `search_dirs` in order.
pub fn discover_config(search_dirs: &[PathBuf]) -> Result<PathBuf> {
    let candidates = std::iter::once(default_config_path())
        .chain(search_dirs.iter().map(|d| d.join(CONFIG_FILE_NAME)));

    for candidate in candidates {
        debug!(path = ?candidate, "looking for config file");
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(CocoError::ConfigError(format!(
        "no {CONFIG_FILE_NAME} found in the current directory or {:?}",
        search_dirs
    )))
}
