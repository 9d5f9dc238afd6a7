// src/engine/mod.rs

//! Trigger strategies.
//!
//! A runner owns one single-flight executor and decides *when* to hand it the
//! command:
//! - [`TimeRunner`] on a fixed interval (or on `ForceUpdate`),
//! - [`FsRunner`] on filesystem changes under a watched tree,
//! - [`SignalRunner`] is reserved and refuses to start.
//!
//! Every runner has the same two-phase loop: a *wait* phase that listens for
//! signals and triggers, and a *send* phase ([`report`]) that waits for the
//! single result and forwards it to the sink. Signals are only read during the
//! wait phase, so `Quit` takes effect after the running command finishes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::RunOnSection;
use crate::errors::{CocoError, Result};
use crate::exec::CommandDef;
use crate::sink::Sink;
use crate::types::{RunnerSignal, TriggerMode};

pub mod fs_runner;
pub mod report;
pub mod time_runner;

pub use fs_runner::FsRunner;
pub use time_runner::TimeRunner;

/// Cloneable sender for [`RunnerSignal`]s.
#[derive(Debug, Clone)]
pub struct Signaller {
    tx: mpsc::Sender<RunnerSignal>,
}

impl Signaller {
    /// Deliver a signal. Waits while a previous signal is still unread.
    pub async fn signal(&self, sig: RunnerSignal) -> Result<()> {
        self.tx
            .send(sig)
            .await
            .map_err(|_| CocoError::Runner("runner has stopped".to_string()))
    }

    /// [`Signaller::signal`] for plain threads outside the Tokio runtime.
    pub fn blocking_signal(&self, sig: RunnerSignal) -> Result<()> {
        self.tx
            .blocking_send(sig)
            .map_err(|_| CocoError::Runner("runner has stopped".to_string()))
    }
}

/// Start/stop bookkeeping shared by the concrete runners.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    sig_tx: mpsc::Sender<RunnerSignal>,
    sig_rx: Option<mpsc::Receiver<RunnerSignal>>,
    handle: Option<JoinHandle<Result<()>>>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        let (sig_tx, sig_rx) = mpsc::channel::<RunnerSignal>(1);
        Self {
            sig_tx,
            sig_rx: Some(sig_rx),
            handle: None,
        }
    }

    /// Hand out the signal receiver exactly once.
    pub(crate) fn take_signals(&mut self) -> Result<mpsc::Receiver<RunnerSignal>> {
        self.sig_rx
            .take()
            .ok_or_else(|| CocoError::Runner("runner already started".to_string()))
    }

    pub(crate) fn attach(&mut self, handle: JoinHandle<Result<()>>) {
        self.handle = Some(handle);
    }

    pub(crate) fn signaller(&self) -> Signaller {
        Signaller {
            tx: self.sig_tx.clone(),
        }
    }

    pub(crate) async fn signal(&self, sig: RunnerSignal) -> Result<()> {
        self.signaller().signal(sig).await
    }

    /// Wait for the loop task to end and return its result.
    pub(crate) async fn wait(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Err(CocoError::Runner("runner was not started".to_string()));
        };
        match handle.await {
            Ok(res) => res,
            Err(e) => Err(CocoError::Runner(format!("runner loop panicked: {e}"))),
        }
    }
}

/// Placeholder for the reserved signal-driven mode.
#[derive(Debug, Default)]
pub struct SignalRunner;

impl SignalRunner {
    pub fn start(&mut self) -> Result<()> {
        Err(CocoError::Unsupported("signal".to_string()))
    }

    pub async fn signal(&self, _sig: RunnerSignal) -> Result<()> {
        Err(CocoError::Unsupported("signal".to_string()))
    }
}

/// The closed set of trigger strategies.
#[derive(Debug)]
pub enum Runner {
    Time(TimeRunner),
    Fs(FsRunner),
    Signal(SignalRunner),
}

impl Runner {
    /// Build the runner selected by `[run_on]`.
    ///
    /// Filesystem runners register their watches here, before `start`.
    pub fn from_config(
        run_on: &RunOnSection,
        command: CommandDef,
        sink: Arc<dyn Sink>,
    ) -> Result<Self> {
        let command = Arc::new(command);
        let mode = run_on.trigger_mode();
        debug!(?mode, "building runner");

        match mode {
            TriggerMode::Time => {
                let interval = Duration::try_from_secs_f64(run_on.time).map_err(|e| {
                    CocoError::ConfigError(format!(
                        "[run_on].time = {} is not a usable interval: {e}",
                        run_on.time
                    ))
                })?;
                Ok(Runner::Time(TimeRunner::new(interval, command, sink)))
            }
            TriggerMode::Fs => {
                let root = run_on.fs_root.clone().unwrap_or_default();
                Ok(Runner::Fs(FsRunner::new(
                    root,
                    &run_on.extensions,
                    command,
                    sink,
                )?))
            }
            TriggerMode::Signal => Ok(Runner::Signal(SignalRunner)),
            TriggerMode::Invalid => Err(CocoError::ConfigError(
                "could not decide trigger mode from [run_on]".to_string(),
            )),
        }
    }

    pub fn start(&mut self) -> Result<()> {
        match self {
            Runner::Time(r) => r.start(),
            Runner::Fs(r) => r.start(),
            Runner::Signal(r) => r.start(),
        }
    }

    pub async fn signal(&self, sig: RunnerSignal) -> Result<()> {
        match self {
            Runner::Time(r) => r.signal(sig).await,
            Runner::Fs(r) => r.signal(sig).await,
            Runner::Signal(r) => r.signal(sig).await,
        }
    }

    /// A detached sender, for controllers living in other tasks.
    pub fn signaller(&self) -> Result<Signaller> {
        match self {
            Runner::Time(r) => Ok(r.signaller()),
            Runner::Fs(r) => Ok(r.signaller()),
            Runner::Signal(_) => Err(CocoError::Unsupported("signal".to_string())),
        }
    }

    /// Wait until the runner loop has ended.
    pub async fn wait(&mut self) -> Result<()> {
        match self {
            Runner::Time(r) => r.wait().await,
            Runner::Fs(r) => r.wait().await,
            Runner::Signal(_) => Err(CocoError::Unsupported("signal".to_string())),
        }
    }
}
