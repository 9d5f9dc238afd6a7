// src/engine/time_runner.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::report::await_result;
use crate::engine::{Lifecycle, Signaller};
use crate::errors::Result;
use crate::exec::{spawn_routine, CommandDef, Routine};
use crate::sink::Sink;
use crate::types::RunnerSignal;

/// Runs the command every `interval`, or immediately on `ForceUpdate`.
///
/// The interval is measured from the end of the previous run: a fresh timer
/// is armed each time the loop goes back to waiting.
pub struct TimeRunner {
    interval: Duration,
    command: Arc<CommandDef>,
    sink: Arc<dyn Sink>,
    lifecycle: Lifecycle,
}

impl std::fmt::Debug for TimeRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeRunner")
            .field("interval", &self.interval)
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl TimeRunner {
    pub fn new(interval: Duration, command: Arc<CommandDef>, sink: Arc<dyn Sink>) -> Self {
        Self {
            interval,
            command,
            sink,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the executor and the wait/send loop. Fails if already started.
    pub fn start(&mut self) -> Result<()> {
        let signals = self.lifecycle.take_signals()?;
        let time_loop = TimeLoop {
            interval: self.interval,
            command: Arc::clone(&self.command),
            sink: Arc::clone(&self.sink),
            signals,
            routine: spawn_routine(),
        };
        self.lifecycle.attach(tokio::spawn(time_loop.run()));
        Ok(())
    }

    pub async fn signal(&self, sig: RunnerSignal) -> Result<()> {
        self.lifecycle.signal(sig).await
    }

    pub fn signaller(&self) -> Signaller {
        self.lifecycle.signaller()
    }

    pub async fn wait(&mut self) -> Result<()> {
        self.lifecycle.wait().await
    }
}

enum Wake {
    Timeout,
    Force,
    Quit,
}

struct TimeLoop {
    interval: Duration,
    command: Arc<CommandDef>,
    sink: Arc<dyn Sink>,
    signals: mpsc::Receiver<RunnerSignal>,
    routine: Routine,
}

impl TimeLoop {
    async fn run(mut self) -> Result<()> {
        info!(interval = ?self.interval, command = %self.command, "time runner started");

        loop {
            match self.wait().await {
                Wake::Quit => break,
                Wake::Timeout | Wake::Force => {
                    self.routine.submit(self.command.make_runnable()).await?;
                    await_result(&mut self.routine, &self.command, self.sink.as_ref()).await?;
                }
            }
        }

        self.sink.log("Quit requested; stopping time runner");
        self.routine.shutdown().await?;
        info!("time runner stopped");
        Ok(())
    }

    /// Block until a signal arrives or the interval elapses.
    async fn wait(&mut self) -> Wake {
        tokio::select! {
            sig = self.signals.recv() => match sig {
                Some(RunnerSignal::ForceUpdate) => {
                    debug!("forced update");
                    Wake::Force
                }
                Some(RunnerSignal::Quit) | None => Wake::Quit,
            },
            _ = tokio::time::sleep(self.interval) => {
                debug!("interval elapsed");
                Wake::Timeout
            }
        }
    }
}
