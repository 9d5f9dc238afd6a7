// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{CocoError, Result};
use crate::fs::{collect_dirs, RealFileSystem};

/// Raw notifications (events and watcher errors) bridged into Tokio.
pub type WatchEvents = mpsc::UnboundedReceiver<notify::Result<Event>>;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    root: PathBuf,
    dirs: Vec<PathBuf>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .field("dirs", &self.dirs.len())
            .finish()
    }
}

impl WatcherHandle {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directories registered with the watcher.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

/// Start watching every directory under `root`.
///
/// Directories are registered one by one (non-recursively) as they exist
/// right now; directories created later are not picked up. Failing to watch
/// `root` itself is an error, failing on a subdirectory only logs a warning.
pub fn spawn_watcher(root: impl Into<PathBuf>) -> Result<(WatcherHandle, WatchEvents)> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if event_tx.send(res).is_err() {
                debug!("watch event receiver dropped; discarding notification");
            }
        },
        Config::default(),
    )?;

    let dirs = collect_dirs(&RealFileSystem, &root).map_err(CocoError::Other)?;

    let mut watched = Vec::with_capacity(dirs.len());
    for dir in dirs {
        match watcher.watch(&dir, RecursiveMode::NonRecursive) {
            Ok(()) => watched.push(dir),
            Err(e) if dir == root => return Err(CocoError::Watcher(e)),
            Err(e) => warn!(dir = ?dir, error = %e, "failed to watch directory; skipping"),
        }
    }

    info!(root = ?root, dirs = watched.len(), "file watcher started");

    Ok((
        WatcherHandle {
            _inner: watcher,
            root,
            dirs: watched,
        },
        event_rx,
    ))
}
