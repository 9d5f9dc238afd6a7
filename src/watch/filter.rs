// src/watch/filter.rs

//! Deciding whether a filesystem notification should trigger a run.

use std::path::Path;

use notify::event::ModifyKind;
use notify::{Event, EventKind};

/// Decision produced for each wait-phase wake-up of the filesystem runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsStatus {
    /// Run the command.
    Send,
    /// Ignore and keep waiting.
    Continue,
    /// Stop the runner.
    Quit,
}

/// Optional allow-list of file extensions (stored as `.ext` suffixes).
///
/// An empty filter accepts every path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
}

impl ExtensionFilter {
    /// Extensions are given without the leading dot; one is tolerated.
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        let suffixes = extensions
            .iter()
            .map(|e| e.as_ref().trim())
            .filter(|e| !e.is_empty())
            .map(|e| format!(".{}", e.trim_start_matches('.')))
            .collect();
        Self { suffixes }
    }

    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// True if the filter is empty or the path ends with any configured
    /// suffix.
    pub fn matches(&self, path: &Path) -> bool {
        if self.is_empty() {
            return true;
        }
        let path = path.to_string_lossy();
        self.suffixes.iter().any(|suffix| path.ends_with(suffix.as_str()))
    }
}

/// Whether a notification describes an actual change.
///
/// Permission/mode (metadata) updates and plain access (open, read, close)
/// are not changes.
pub fn is_content_change(kind: &EventKind) -> bool {
    !matches!(
        kind,
        EventKind::Access(_) | EventKind::Modify(ModifyKind::Metadata(_))
    )
}

/// Classify one notification against the filter.
///
/// An event with several paths (e.g. both sides of a rename) triggers if any
/// of them matches.
pub fn classify_event(event: &Event, filter: &ExtensionFilter) -> FsStatus {
    if !is_content_change(&event.kind) {
        return FsStatus::Continue;
    }
    if filter.is_empty() || event.paths.iter().any(|p| filter.matches(p)) {
        FsStatus::Send
    } else {
        FsStatus::Continue
    }
}
