// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CocoError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A `KEY=VALUE` override did not contain exactly one `=`.
    #[error("Poorly formatted environment item: {0}")]
    EnvironmentFormat(String),

    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Init command exited with code {0}")]
    InitFailed(i32),

    #[error("File watcher error: {0}")]
    Watcher(#[from] notify::Error),

    #[error("Runner error: {0}")]
    Runner(String),

    #[error("Unsupported trigger mode: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CocoError>;
