#![allow(dead_code)]

use std::path::PathBuf;

use coco::config::{CommandSection, ConfigFile, RawConfigFile};
use coco::errors::Result;

/// Builder for `RawConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_command(mut self, command: CommandSection) -> Self {
        self.config.command = Some(command);
        self
    }

    pub fn with_init(mut self, init: CommandSection) -> Self {
        self.config.init = Some(init);
        self
    }

    pub fn mode(mut self, mode: &str) -> Self {
        self.config.run_on.mode = Some(mode.to_string());
        self
    }

    pub fn time(mut self, secs: f64) -> Self {
        self.config.run_on.time = secs;
        self
    }

    pub fn fs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.run_on.fs_root = Some(root.into());
        self
    }

    pub fn extension(mut self, ext: &str) -> Self {
        self.config.run_on.extensions.push(ext.to_string());
        self
    }

    pub fn display_root(mut self, root: &str) -> Self {
        self.config.display.root = root.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `CommandSection`.
pub struct CommandSectionBuilder {
    section: CommandSection,
}

impl CommandSectionBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            section: CommandSection {
                command: Some(command.to_string()),
                ..CommandSection::default()
            },
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.section.args.push(arg.to_string());
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.section.dir = dir.into();
        self
    }

    pub fn env(mut self, entry: &str) -> Self {
        self.section.env.push(entry.to_string());
        self
    }

    pub fn build(self) -> CommandSection {
        self.section
    }
}
