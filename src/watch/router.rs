// src/watch/router.rs

//! Turn raw `notify` events into container changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use tracing::trace;

use crate::engine::BuildCoordinator;
use crate::fs::FileSystem;
use crate::types::FileChange;
use crate::watch::path_utils::{normalize, relative_str};
use crate::watch::patterns::ContainerPatterns;

/// Filters and classifies filesystem events for one container root.
///
/// - create / modify → [`FileChange::changed`]
/// - remove → [`FileChange::deleted`]
/// - rename → deleted for the old name, changed for the new one
///
/// Paths outside the root or not matching the container patterns are
/// dropped. Multiple events for the same path are not coalesced here; the
/// pending set does that while a build runs.
#[derive(Debug, Clone)]
pub struct ChangeRouter {
    root: PathBuf,
    patterns: ContainerPatterns,
    fs: Arc<dyn FileSystem>,
}

impl ChangeRouter {
    pub fn new(root: impl Into<PathBuf>, patterns: ContainerPatterns, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            patterns,
            fs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if `path` is a container under the root.
    pub fn accepts(&self, path: &Path) -> bool {
        match relative_str(&self.root, path) {
            Some(rel) => self.patterns.matches(&rel),
            None => false,
        }
    }

    /// Classify one event into zero or more container changes.
    pub fn classify(&self, event: &Event) -> Vec<FileChange> {
        let changes: Vec<FileChange> = match &event.kind {
            EventKind::Create(_) => event.paths.iter().map(FileChange::changed).collect(),
            EventKind::Remove(_) => event.paths.iter().map(FileChange::deleted).collect(),
            EventKind::Modify(ModifyKind::Name(mode)) => self.classify_rename(*mode, &event.paths),
            EventKind::Modify(_) => event.paths.iter().map(FileChange::changed).collect(),
            EventKind::Any | EventKind::Other => {
                event.paths.iter().map(|p| self.by_existence(p)).collect()
            }
            EventKind::Access(_) => Vec::new(),
        };

        changes
            .into_iter()
            .map(|c| FileChange {
                path: normalize(&c.path),
                kind: c.kind,
            })
            .filter(|c| {
                let keep = self.accepts(&c.path);
                if !keep {
                    trace!(path = ?c.path, "ignoring non-container path");
                }
                keep
            })
            .collect()
    }

    /// Classify `event` and apply the result to `coordinator`.
    ///
    /// Returns how many container changes were forwarded.
    pub fn route(&self, event: &Event, coordinator: &mut BuildCoordinator) -> usize {
        let changes = self.classify(event);
        let count = changes.len();
        for change in changes {
            coordinator.apply(change);
        }
        count
    }

    fn classify_rename(&self, mode: RenameMode, paths: &[PathBuf]) -> Vec<FileChange> {
        match mode {
            RenameMode::From => paths.iter().map(FileChange::deleted).collect(),
            RenameMode::To => paths.iter().map(FileChange::changed).collect(),
            RenameMode::Both => {
                let mut out = Vec::with_capacity(2);
                if let Some(from) = paths.first() {
                    out.push(FileChange::deleted(from));
                }
                if let Some(to) = paths.get(1) {
                    out.push(FileChange::changed(to));
                }
                out
            }
            RenameMode::Any | RenameMode::Other => {
                paths.iter().map(|p| self.by_existence(p)).collect()
            }
        }
    }

    fn by_existence(&self, path: &Path) -> FileChange {
        if self.fs.is_file(path) {
            FileChange::changed(path)
        } else {
            FileChange::deleted(path)
        }
    }
}
