// src/exec/command.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

/// Immutable description of the command to run on every trigger.
///
/// Built once from configuration and shared (behind an `Arc`) by the trigger
/// strategy for every execution. `env` holds complete `KEY=VALUE` entries;
/// when it is empty the child inherits the host environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDef {
    name: String,
    dir: PathBuf,
    args: Vec<String>,
    env: Vec<String>,
}

impl CommandDef {
    pub fn new(
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
        args: Vec<String>,
        env: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            args,
            env,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &[String] {
        &self.env
    }

    /// Produce a fresh launch descriptor for one execution.
    ///
    /// Descriptors are consumed when launched, so every submission needs its
    /// own.
    pub fn make_runnable(&self) -> Runnable {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.name.clone());
        argv.extend(self.args.iter().cloned());

        Runnable {
            program: self.name.clone(),
            argv,
            dir: self.dir.clone(),
            env: self.env.clone(),
        }
    }
}

impl fmt::Display for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Single-use process launch descriptor produced by
/// [`CommandDef::make_runnable`].
#[derive(Debug, PartialEq, Eq)]
pub struct Runnable {
    program: String,
    argv: Vec<String>,
    dir: PathBuf,
    env: Vec<String>,
}

impl Runnable {
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector, program name first.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn env(&self) -> &[String] {
        &self.env
    }

    /// Turn the descriptor into a `tokio` command with piped output.
    pub(crate) fn into_command(self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.argv.iter().skip(1));

        if !self.dir.as_os_str().is_empty() {
            cmd.current_dir(&self.dir);
        }

        if !self.env.is_empty() {
            cmd.env_clear();
            for entry in &self.env {
                if let Some((key, value)) = entry.split_once('=') {
                    cmd.env(key, value);
                }
            }
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}
