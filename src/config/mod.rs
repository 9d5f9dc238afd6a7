// src/config/mod.rs

//! Configuration loading and validation for coco.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Discover and load a config file from disk (`loader.rs`).
//! - Validate required fields and the trigger mode (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, discover_config, load_and_validate, load_from_path};
pub use model::{
    CommandSection, ConfigFile, DisplaySection, RawConfigFile, RunOnSection, DEFAULT_DIR,
    DEFAULT_INTERVAL_SECS,
};
