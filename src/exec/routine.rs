// src/exec/routine.rs

//! Single-flight executor.
//!
//! One background Tokio task owns the command inbox, the result outbox and the
//! shutdown channel. It runs **at most one process at a time**: a command is
//! launched, awaited to completion, and its [`RoutineOut`] is delivered before
//! the next command is taken from the inbox.
//!
//! Shutdown is cooperative. The worker only looks at the shutdown channel
//! between commands, so a process already running is always allowed to
//! finish.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{CocoError, Result};
use crate::exec::command::Runnable;

/// Result of one submitted command, or the shutdown sentinel.
#[derive(Debug)]
pub enum RoutineOut {
    /// The process exited with status 0.
    Success(String),
    /// The process ran and exited non-zero. `code` is -1 when the process was
    /// terminated by a signal.
    Failure { code: i32, output: String },
    /// The process could not be launched or awaited.
    LaunchError(CocoError),
    /// The executor honoured a shutdown request and stopped.
    Cancelled,
}

impl RoutineOut {
    /// Exit code for display, if the process actually ran.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RoutineOut::Success(_) => Some(0),
            RoutineOut::Failure { code, .. } => Some(*code),
            RoutineOut::LaunchError(_) | RoutineOut::Cancelled => None,
        }
    }
}

/// Handle to a running single-flight executor.
///
/// Dropping the handle closes every channel and lets the worker exit on its
/// own without emitting the sentinel.
pub struct Routine {
    command_tx: mpsc::Sender<Runnable>,
    result_rx: mpsc::Receiver<RoutineOut>,
    quit_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl std::fmt::Debug for Routine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Routine")
            .field("shutdown_requested", &self.quit_tx.is_none())
            .finish_non_exhaustive()
    }
}

/// Spawn the executor worker and return its handle.
pub fn spawn_routine() -> Routine {
    let (command_tx, command_rx) = mpsc::channel::<Runnable>(1);
    let (result_tx, result_rx) = mpsc::channel::<RoutineOut>(1);
    let (quit_tx, quit_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(continual_routine(command_rx, result_tx, quit_rx));

    Routine {
        command_tx,
        result_rx,
        quit_tx: Some(quit_tx),
        handle,
    }
}

impl Routine {
    /// Hand a command to the worker.
    pub async fn submit(&self, runnable: Runnable) -> Result<()> {
        self.command_tx
            .send(runnable)
            .await
            .map_err(|_| CocoError::Runner("executor routine has stopped".to_string()))
    }

    /// Wait for the next result. `None` once the worker has exited.
    pub async fn next_result(&mut self) -> Option<RoutineOut> {
        self.result_rx.recv().await
    }

    /// Submit and wait for that command's result.
    pub async fn execute(&mut self, runnable: Runnable) -> Result<RoutineOut> {
        self.submit(runnable).await?;
        self.next_result()
            .await
            .ok_or_else(|| CocoError::Runner("executor routine exited mid-run".to_string()))
    }

    /// Ask the worker to stop. Returns `false` if a request was already sent.
    pub fn request_shutdown(&mut self) -> bool {
        match self.quit_tx.take() {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Request shutdown and wait for the sentinel and the worker task.
    pub async fn shutdown(mut self) -> Result<()> {
        self.request_shutdown();

        loop {
            match self.result_rx.recv().await {
                Some(RoutineOut::Cancelled) => {
                    debug!("executor routine acknowledged shutdown");
                    break;
                }
                Some(other) => {
                    warn!(?other, "discarding result received during shutdown");
                }
                None => {
                    debug!("executor routine exited without a shutdown sentinel");
                    break;
                }
            }
        }

        self.handle
            .await
            .map_err(|e| CocoError::Runner(format!("executor routine panicked: {e}")))
    }
}

async fn continual_routine(
    mut command_rx: mpsc::Receiver<Runnable>,
    result_tx: mpsc::Sender<RoutineOut>,
    mut quit_rx: oneshot::Receiver<()>,
) {
    info!("executor routine started");

    loop {
        tokio::select! {
            // Shutdown wins over commands that have not started yet.
            biased;

            quit = &mut quit_rx => {
                if quit.is_ok() {
                    let _ = result_tx.send(RoutineOut::Cancelled).await;
                }
                break;
            }

            next = command_rx.recv() => {
                let Some(runnable) = next else {
                    break;
                };
                let out = run_routine(runnable).await;
                if result_tx.send(out).await.is_err() {
                    debug!("result receiver dropped; stopping executor routine");
                    break;
                }
            }
        }
    }

    info!("executor routine finished");
}

/// Launch one process and wait for it, capturing stdout and stderr into a
/// single string in the order the chunks arrive.
pub async fn run_routine(runnable: Runnable) -> RoutineOut {
    let program = runnable.program().to_string();
    info!(program = %program, argv = ?runnable.argv(), dir = ?runnable.dir(), "starting process");

    let mut child = match runnable.into_command().spawn() {
        Ok(child) => child,
        Err(source) => return RoutineOut::LaunchError(CocoError::Launch { program, source }),
    };

    let (chunk_tx, mut chunk_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    forward_chunks(child.stdout.take(), chunk_tx.clone());
    forward_chunks(child.stderr.take(), chunk_tx);

    let status = match child.wait().await {
        Ok(status) => status,
        Err(e) => return RoutineOut::LaunchError(CocoError::IoError(e)),
    };

    let mut raw = Vec::new();
    while let Some(chunk) = chunk_rx.recv().await {
        raw.extend_from_slice(&chunk);
    }
    let output = String::from_utf8_lossy(&raw).into_owned();

    let code = status.code().unwrap_or(-1);
    info!(program = %program, exit_code = code, success = status.success(), "process exited");

    if status.success() {
        RoutineOut::Success(output)
    } else {
        RoutineOut::Failure { code, output }
    }
}

fn forward_chunks<R>(reader: Option<R>, tx: mpsc::UnboundedSender<Vec<u8>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let Some(mut reader) = reader else {
        return;
    };

    tokio::spawn(async move {
        let mut buf = vec![0u8; 8 * 1024];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "error reading process output");
                    break;
                }
            }
        }
    });
}
