// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use crate::errors::{CocoError, Result};
use crate::exec::{make_environment, CommandDef};
use crate::types::{ModeName, TriggerMode};

/// Working directory used when a command section does not name one.
pub const DEFAULT_DIR: &str = "/tmp/coco";

/// Interval used by time mode when `[run_on].time` is absent.
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;

/// Configuration as deserialized from TOML, before validation.
///
/// ```toml
/// [init]
/// command = "cmake"
/// args = ["-GNinja", ".."]
/// dir = "/tmp/build"
///
/// [command]
/// command = "ninja"
/// dir = "/tmp/build"
/// env = ["PATH=$PATH:/opt/bin"]
///
/// [run_on]
/// mode = "fs"
/// fs_root = "src"
/// extensions = ["c", "h"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Optional one-shot setup command.
    #[serde(default)]
    pub init: Option<CommandSection>,

    /// The command run on every trigger.
    #[serde(default)]
    pub command: Option<CommandSection>,

    #[serde(default)]
    pub run_on: RunOnSection,

    #[serde(default)]
    pub display: DisplaySection,
}

/// Validated configuration. Construct through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub init: Option<CommandSection>,
    pub command: CommandSection,
    pub run_on: RunOnSection,
    pub display: DisplaySection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        init: Option<CommandSection>,
        command: CommandSection,
        run_on: RunOnSection,
        display: DisplaySection,
    ) -> Self {
        Self {
            init,
            command,
            run_on,
            display,
        }
    }

    /// The init section, if it actually names a command.
    pub fn init_command(&self) -> Option<&CommandSection> {
        self.init.as_ref().filter(|s| s.has_command())
    }
}

/// `[init]` and `[command]` sections.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSection {
    /// Program to run. Required for `[command]`.
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory, created at startup if missing.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// `KEY=VALUE` overrides added on top of the host environment.
    #[serde(default)]
    pub env: Vec<String>,
}

fn default_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DIR)
}

impl Default for CommandSection {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            dir: default_dir(),
            env: Vec::new(),
        }
    }
}

impl CommandSection {
    pub fn has_command(&self) -> bool {
        self.command.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// Build the immutable command definition, expanding `env` overrides
    /// against the current process environment.
    pub fn to_command_def(&self) -> Result<CommandDef> {
        let name = self
            .command
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CocoError::ConfigError("command section has no `command`".to_string()))?;

        let env = if self.env.is_empty() {
            Vec::new()
        } else {
            make_environment(&self.env)?
        };

        Ok(CommandDef::new(name, &self.dir, self.args.clone(), env))
    }
}

/// `[run_on]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunOnSection {
    /// `"time"`, `"fs"` or `"signal"`. Inferred when absent.
    #[serde(default)]
    pub mode: Option<String>,

    /// Interval in seconds for time mode.
    #[serde(default = "default_interval")]
    pub time: f64,

    /// Root of the watched tree for fs mode.
    #[serde(default)]
    pub fs_root: Option<PathBuf>,

    /// Extension allow-list for fs mode, without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,
}

fn default_interval() -> f64 {
    DEFAULT_INTERVAL_SECS
}

impl Default for RunOnSection {
    fn default() -> Self {
        Self {
            mode: None,
            time: default_interval(),
            fs_root: None,
            extensions: Vec::new(),
        }
    }
}

impl RunOnSection {
    /// Resolve the trigger mode.
    ///
    /// - explicit `time` needs a positive, finite interval;
    /// - explicit `fs` needs a non-empty `fs_root`;
    /// - without `mode`, a set `fs_root` selects fs, otherwise time;
    /// - anything else is [`TriggerMode::Invalid`].
    pub fn trigger_mode(&self) -> TriggerMode {
        let has_root = self
            .fs_root
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty());

        let mode = match self.mode.as_deref() {
            None if has_root => ModeName::Fs,
            None => ModeName::Time,
            Some(raw) => match raw.parse::<ModeName>() {
                Ok(mode) => mode,
                Err(e) => {
                    warn!("{e}");
                    return TriggerMode::Invalid;
                }
            },
        };

        match mode {
            ModeName::Time if self.time.is_finite() && self.time > 0.0 => TriggerMode::Time,
            ModeName::Fs if has_root => TriggerMode::Fs,
            ModeName::Signal => TriggerMode::Signal,
            _ => TriggerMode::Invalid,
        }
    }
}

/// `[display]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplaySection {
    /// Only paths starting with this prefix are recognised as diagnostics.
    #[serde(default)]
    pub root: String,
}
