// src/lib.rs

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod sink;
pub mod types;
pub mod watch;

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{discover_config, load_and_validate, ConfigFile};
use crate::diagnostics::DiagnosticParser;
use crate::engine::{Runner, Signaller};
use crate::errors::Result;
use crate::exec::run_init;
use crate::fs::{FileSystem, RealFileSystem};
use crate::sink::{Sink, TerminalSink};
use crate::types::RunnerSignal;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config discovery and loading
/// - working directories and the optional init command
/// - the runner selected by `[run_on]`
/// - Ctrl-C (quit) and stdin (forced rebuild) handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = match args.config {
        Some(path) => path,
        None => discover_config(&args.search_dirs)?,
    };
    info!(path = ?config_path, "using config file");

    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&config_path, &cfg);
        return Ok(());
    }

    prepare_dirs(&RealFileSystem, &cfg)?;

    if let Some(init) = cfg.init_command() {
        run_init(&init.to_command_def()?).await?;
    }

    let command = cfg.command.to_command_def()?;
    let parser = DiagnosticParser::new(&cfg.display.root)?;
    let sink: Arc<dyn Sink> = Arc::new(TerminalSink::new(parser));

    let mut runner = Runner::from_config(&cfg.run_on, command, sink)?;
    runner.start()?;

    let signaller = runner.signaller()?;
    spawn_ctrl_c_handler(signaller.clone());
    spawn_stdin_rebuild(signaller);

    runner.wait().await?;
    info!("coco exiting");
    Ok(())
}

/// Create the working directories the commands run in.
pub fn prepare_dirs(fs: &dyn FileSystem, cfg: &ConfigFile) -> Result<()> {
    if let Some(init) = cfg.init_command() {
        fs.create_dir_all(&init.dir)?;
    }
    if cfg.init_command().map(|init| init.dir.as_path()) != Some(cfg.command.dir.as_path()) {
        fs.create_dir_all(&cfg.command.dir)?;
    }
    Ok(())
}

/// Ctrl-C → `Quit`. A second Ctrl-C exits without waiting for the running
/// command.
fn spawn_ctrl_c_handler(signaller: Signaller) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        info!("Ctrl+C received; stopping after the current run");
        if signaller.signal(RunnerSignal::Quit).await.is_err() {
            return;
        }

        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("second Ctrl+C received; exiting immediately");
            std::process::exit(130);
        }
    });
}

/// Every line on stdin → `ForceUpdate`.
///
/// Uses a plain thread with blocking reads so a pending read never holds the
/// process open at exit.
fn spawn_stdin_rebuild(signaller: Signaller) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            if line.is_err() {
                break;
            }
            debug!("rebuild requested from stdin");
            if signaller.blocking_signal(RunnerSignal::ForceUpdate).is_err() {
                break;
            }
        }
        debug!("stdin closed; manual rebuilds disabled");
    });
}

/// Simple dry-run output: print the resolved configuration.
fn print_dry_run(path: &Path, cfg: &ConfigFile) {
    println!("coco dry-run");
    println!("  config file = {}", path.display());
    println!();

    if let Some(init) = cfg.init_command() {
        println!("init:");
        println!("    command: {}", init.command.as_deref().unwrap_or_default());
        if !init.args.is_empty() {
            println!("    args: {:?}", init.args);
        }
        println!("    dir: {}", init.dir.display());
        if !init.env.is_empty() {
            println!("    env: {:?}", init.env);
        }
    }

    println!("command:");
    println!(
        "    command: {}",
        cfg.command.command.as_deref().unwrap_or_default()
    );
    if !cfg.command.args.is_empty() {
        println!("    args: {:?}", cfg.command.args);
    }
    println!("    dir: {}", cfg.command.dir.display());
    if !cfg.command.env.is_empty() {
        println!("    env: {:?}", cfg.command.env);
    }

    println!("run_on:");
    println!("    mode: {:?}", cfg.run_on.trigger_mode());
    println!("    time: {}s", cfg.run_on.time);
    if let Some(ref root) = cfg.run_on.fs_root {
        println!("    fs_root: {}", root.display());
    }
    if !cfg.run_on.extensions.is_empty() {
        println!("    extensions: {:?}", cfg.run_on.extensions);
    }
    if !cfg.display.root.is_empty() {
        println!("display.root: {}", cfg.display.root);
    }

    debug!("dry-run complete (no execution)");
}
