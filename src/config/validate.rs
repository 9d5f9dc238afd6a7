// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{CocoError, Result};
use crate::types::TriggerMode;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::CocoError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let command = raw.command.unwrap_or_default();
        Ok(ConfigFile::new_unchecked(raw.init, command, raw.run_on, raw.display))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_command(cfg)?;
    validate_run_on(cfg)?;
    validate_extensions(cfg)?;
    Ok(())
}

fn ensure_has_command(cfg: &RawConfigFile) -> Result<()> {
    match cfg.command.as_ref() {
        Some(section) if section.has_command() => Ok(()),
        _ => Err(CocoError::ConfigError(
            "did not find required field command.command".to_string(),
        )),
    }
}

fn validate_run_on(cfg: &RawConfigFile) -> Result<()> {
    if cfg.run_on.trigger_mode() == TriggerMode::Invalid {
        return Err(CocoError::ConfigError(format!(
            "cannot decide trigger mode from [run_on] (mode = {:?}, time = {}, fs_root = {:?})",
            cfg.run_on.mode, cfg.run_on.time, cfg.run_on.fs_root
        )));
    }
    if cfg.run_on.trigger_mode() == TriggerMode::Time
        && Duration::try_from_secs_f64(cfg.run_on.time).is_err()
    {
        return Err(CocoError::ConfigError(format!(
            "[run_on].time = {} is too large for an interval",
            cfg.run_on.time
        )));
    }
    Ok(())
}

fn validate_extensions(cfg: &RawConfigFile) -> Result<()> {
    for ext in &cfg.run_on.extensions {
        if ext.trim().is_empty() {
            return Err(CocoError::ConfigError(
                "[run_on].extensions must not contain empty entries".to_string(),
            ));
        }
    }
    Ok(())
}
