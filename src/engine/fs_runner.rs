// src/engine/fs_runner.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::report::await_result;
use crate::engine::{Lifecycle, Signaller};
use crate::errors::{CocoError, Result};
use crate::exec::{spawn_routine, CommandDef, Routine};
use crate::sink::Sink;
use crate::types::RunnerSignal;
use crate::watch::{classify_event, spawn_watcher, ExtensionFilter, FsStatus, WatchEvents, WatcherHandle};

/// Runs the command once at start-up and then on every qualifying change
/// under `root`.
///
/// A watcher error (or the watcher going away) ends the runner with an
/// error; there is no attempt to re-establish watching.
pub struct FsRunner {
    root: PathBuf,
    filter: ExtensionFilter,
    command: Arc<CommandDef>,
    sink: Arc<dyn Sink>,
    watcher: Option<WatcherHandle>,
    events: Option<WatchEvents>,
    lifecycle: Lifecycle,
}

impl std::fmt::Debug for FsRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsRunner")
            .field("root", &self.root)
            .field("filter", &self.filter)
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl FsRunner {
    /// Register every directory under `root` with a watcher.
    ///
    /// Changes made from here on are buffered until the runner starts.
    pub fn new<S: AsRef<str>>(
        root: impl Into<PathBuf>,
        extensions: &[S],
        command: Arc<CommandDef>,
        sink: Arc<dyn Sink>,
    ) -> Result<Self> {
        let root = root.into();
        let (handle, events) = spawn_watcher(&root)?;
        let mut runner = Self::from_events(root, extensions, command, sink, events);
        runner.watcher = Some(handle);
        Ok(runner)
    }

    /// Build a runner fed by an existing notification stream instead of its
    /// own watcher.
    pub fn from_events<S: AsRef<str>>(
        root: impl Into<PathBuf>,
        extensions: &[S],
        command: Arc<CommandDef>,
        sink: Arc<dyn Sink>,
        events: WatchEvents,
    ) -> Self {
        Self {
            root: root.into(),
            filter: ExtensionFilter::new(extensions),
            command,
            sink,
            watcher: None,
            events: Some(events),
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directories registered at construction time (empty once started).
    pub fn watched_dirs(&self) -> &[PathBuf] {
        self.watcher.as_ref().map(|h| h.dirs()).unwrap_or(&[])
    }

    /// Spawn the executor and the send/wait loop. Fails if already started.
    pub fn start(&mut self) -> Result<()> {
        let signals = self.lifecycle.take_signals()?;
        let events = self
            .events
            .take()
            .ok_or_else(|| CocoError::Runner("runner already started".to_string()))?;

        let fs_loop = FsLoop {
            filter: self.filter.clone(),
            command: Arc::clone(&self.command),
            sink: Arc::clone(&self.sink),
            signals,
            events,
            _watcher: self.watcher.take(),
            routine: spawn_routine(),
        };
        self.lifecycle.attach(tokio::spawn(fs_loop.run()));
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

struct FsLoop {
    filter: ExtensionFilter,
    command: Arc<CommandDef>,
    sink: Arc<dyn Sink>,
    signals: mpsc::Receiver<RunnerSignal>,
    events: WatchEvents,
    _watcher: Option<WatcherHandle>,
    routine: Routine,
}

impl FsLoop {
    async fn run(mut self) -> Result<()> {
        info!(command = %self.command, filter = ?self.filter, "filesystem runner started");

        // The first build always runs.
        let mut status = FsStatus::Send;

        let outcome = loop {
            match status {
                FsStatus::Send => {
                    if let Err(e) = self.send().await {
                        break Err(e);
                    }
                }
                FsStatus::Quit => break Ok(()),
                FsStatus::Continue => {}
            }

            status = match self.wait().await {
                Ok(next) => next,
                Err(e) => break Err(e),
            };
        };

        if outcome.is_ok() {
            self.sink.log("Quit requested; stopping filesystem runner");
        }
        if let Err(e) = self.routine.shutdown().await {
            error!(error = %e, "executor routine did not shut down cleanly");
        }
        info!("filesystem runner stopped");
        outcome
    }

    async fn send(&mut self) -> Result<()> {
        self.routine.submit(self.command.make_runnable()).await?;
        await_result(&mut self.routine, &self.command, self.sink.as_ref()).await
    }

    async fn wait(&mut self) -> Result<FsStatus> {
        tokio::select! {
            sig = self.signals.recv() => match sig {
                Some(RunnerSignal::ForceUpdate) => {
                    debug!("forced update");
                    Ok(FsStatus::Send)
                }
                Some(RunnerSignal::Quit) | None => Ok(FsStatus::Quit),
            },
            event = self.events.recv() => match event {
                Some(Ok(event)) => {
                    let status = classify_event(&event, &self.filter);
                    debug!(kind = ?event.kind, paths = ?event.paths, ?status, "filesystem event");
                    Ok(status)
                }
                Some(Err(err)) => {
                    error!(error = %err, "file watcher error; stopping");
                    self.sink.log(&format!("File watcher error: {err}"));
                    Err(CocoError::Watcher(err))
                }
                None => {
                    error!("file watcher event stream closed; stopping");
                    self.sink.log("File watcher stopped");
                    Err(CocoError::Runner("file watcher event stream closed".to_string()))
                }
            },
        }
    }
}
