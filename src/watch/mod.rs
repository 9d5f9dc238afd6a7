// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Registering every directory of a tree with a cross-platform filesystem
//!   watcher (`notify`).
//! - Deciding which notifications count as a trigger (extension allow-list,
//!   metadata-only changes ignored).
//!
//! It does **not** run anything; the filesystem runner consumes the event
//! stream and decides when to submit the command.

pub mod filter;
pub mod watcher;

pub use filter::{classify_event, is_content_change, ExtensionFilter, FsStatus};
pub use watcher::{spawn_watcher, WatchEvents, WatcherHandle};
