// src/exec/init.rs

//! One-shot setup command run before the trigger loop starts.

use tracing::{debug, error, info};

use crate::errors::{CocoError, Result};
use crate::exec::command::CommandDef;
use crate::exec::routine::{RoutineOut, run_routine};

/// Run the init command to completion.
///
/// Unlike the watched command, any failure here aborts startup: a launch
/// error is returned as-is and a non-zero exit becomes
/// [`CocoError::InitFailed`].
pub async fn run_init(command: &CommandDef) -> Result<()> {
    info!(command = %command, dir = ?command.dir(), "running init command");

    let out = run_routine(command.make_runnable()).await;
    init_result(command, out)
}

/// Map the init command's outcome onto startup success or failure.
pub fn init_result(command: &CommandDef, out: RoutineOut) -> Result<()> {
    match out {
        RoutineOut::Success(output) => {
            debug!(%output, "init command output");
            info!(command = %command, "init command finished");
            Ok(())
        }
        RoutineOut::Failure { code, output } => {
            error!(command = %command, exit_code = code, %output, "init command failed");
            Err(CocoError::InitFailed(code))
        }
        RoutineOut::LaunchError(err) => Err(err),
        RoutineOut::Cancelled => Err(CocoError::Runner(format!(
            "init command `{command}` was cancelled before it ran"
        ))),
    }
}
