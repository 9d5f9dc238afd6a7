// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `coco`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "coco",
    version,
    about = "Re-run a build command on a timer or on file changes and show its diagnostics.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `coco.toml` is looked up in the current directory and then
    /// in each `--search-dir`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Extra directory to search for `coco.toml` (repeatable).
    #[arg(long = "search-dir", value_name = "DIR")]
    pub search_dirs: Vec<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `COCO_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the resolved configuration, but don't run
    /// anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
