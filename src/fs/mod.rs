// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn is_dir(&self, path: &Path) -> bool;

    /// True if `path` itself is a symbolic link (not followed).
    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("creating dir {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}

/// Every directory under `root`, `root` first, parents before children.
///
/// Symlinked children are not descended into, so link cycles and links to
/// outside trees are never registered. `root` itself may be a link.
/// Unreadable subdirectories are skipped rather than failing the walk; only
/// a missing or non-directory `root` is an error.
pub fn collect_dirs(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    if !fs.is_dir(root) {
        anyhow::bail!("watch root {:?} is not a directory", root);
    }

    let mut dirs = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let children = match fs.read_dir(&dir) {
            Ok(children) => children,
            Err(e) => {
                tracing::debug!(dir = ?dir, error = %e, "skipping unreadable directory");
                dirs.push(dir);
                continue;
            }
        };
        let mut subdirs: Vec<PathBuf> = children
            .into_iter()
            .filter(|p| fs.is_dir(p) && !fs.is_symlink(p))
            .collect();
        subdirs.sort();
        // Reverse so the stack pops them in sorted order.
        pending.extend(subdirs.into_iter().rev());
        dirs.push(dir);
    }

    Ok(dirs)
}
