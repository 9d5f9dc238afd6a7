// src/engine/report.rs

//! The send phase shared by every runner.

use tracing::{debug, info, warn};

use crate::errors::{CocoError, Result};
use crate::exec::{CommandDef, Routine, RoutineOut};
use crate::sink::Sink;
use crate::types::Operation;

/// Wait for the result of an already-submitted command and forward it.
///
/// - success and non-zero exit reach the display through `show_output`;
/// - a launch error is only logged.
pub async fn await_result(routine: &mut Routine, command: &CommandDef, sink: &dyn Sink) -> Result<()> {
    sink.log(&format!("Run command: {command}"));
    sink.set_operation(Operation::Executing);

    let out = routine
        .next_result()
        .await
        .ok_or_else(|| CocoError::Runner("executor routine exited mid-run".to_string()));

    let res = out.map(|out| forward(out, sink));
    sink.set_operation(Operation::Idle);
    res
}

/// Classify one result and hand it to the sink.
pub fn forward(out: RoutineOut, sink: &dyn Sink) {
    match out {
        RoutineOut::Success(output) => {
            info!(exit_code = 0, "command succeeded");
            sink.log("Command exited: 0");
            sink.show_output(&output, 0);
        }
        RoutineOut::Failure { code, output } => {
            info!(exit_code = code, "command failed");
            sink.log(&format!("Command exited: {code}"));
            sink.show_output(&output, code);
        }
        RoutineOut::LaunchError(err) => {
            warn!(error = %err, "command could not be run");
            sink.log(&err.to_string());
        }
        RoutineOut::Cancelled => {
            debug!("shutdown sentinel received in send phase");
        }
    }
}
