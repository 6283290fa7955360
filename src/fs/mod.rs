// src/fs/mod.rs

//! Filesystem access for scans, routing and settings resolution.

use std::fmt::Debug;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

pub mod mock;

/// Byte stream over one container file.
pub type ContainerReader = Box<dyn Read + Send>;

/// The handful of filesystem operations the indexer needs.
///
/// Scans, change replays and settings resolution all go through this
/// trait, so they run unchanged against [`mock::MockFileSystem`].
pub trait FileSystem: Send + Sync + Debug {
    /// Open a container for streaming reads.
    fn open_read(&self, path: &Path) -> Result<ContainerReader>;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// True if `path` itself is a symbolic link, whatever it points at.
    fn is_symlink(&self, path: &Path) -> bool;

    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Full paths of the entries directly under `path`.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn open_read(&self, path: &Path) -> Result<ContainerReader> {
        let file = fs::File::open(path).with_context(|| format!("opening container {:?}", path))?;
        Ok(Box::new(file))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("canonicalizing {:?}", path))
    }

    /// Unreadable entries are skipped so one bad file does not abort a
    /// whole scan.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let iter = fs::read_dir(path).with_context(|| format!("listing directory {:?}", path))?;
        let entries = iter
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(err) => {
                    warn!(dir = ?path, error = %err, "skipping unreadable directory entry");
                    None
                }
            })
            .collect();
        Ok(entries)
    }
}
