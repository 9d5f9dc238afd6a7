use std::fmt;
use std::str::FromStr;

/// Signals an external controller can send into a running trigger strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerSignal {
    /// Shut the strategy down at its next wait point.
    Quit,
    /// Run the command now, out of schedule.
    ForceUpdate,
}

/// Operation label forwarded to the sink around each execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Executing,
    Idle,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Executing => f.write_str("EXECUTING"),
            Operation::Idle => f.write_str("IDLE"),
        }
    }
}

/// Which trigger strategy a configuration selects.
///
/// `Invalid` is never started; it exists so mode resolution can report a
/// single, explicit "undecidable" outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    Time,
    Fs,
    Signal,
    Invalid,
}

/// The `mode = "..."` value from `[run_on]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeName {
    Time,
    Fs,
    Signal,
}

impl FromStr for ModeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" => Ok(ModeName::Time),
            "fs" => Ok(ModeName::Fs),
            "signal" => Ok(ModeName::Signal),
            other => Err(format!(
                "invalid run_on.mode: {other} (expected \"time\", \"fs\" or \"signal\")"
            )),
        }
    }
}
