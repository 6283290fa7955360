// src/types.rs

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Token naming a script asset: no extension, no directory.
pub type ScriptId = String;

/// Normalized absolute path of one scene or prefab file.
pub type ContainerPath = PathBuf;

/// Identifiers referenced by a single container.
pub type ScriptSet = BTreeSet<ScriptId>;

/// Containers referencing a single identifier.
pub type ContainerSet = BTreeSet<ContainerPath>;

/// Lifecycle of the index.
///
/// - `NotBuilt`: nothing scanned yet (or the index was reset).
/// - `Building`: a full scan is in progress; live changes are queued.
/// - `Built`: the index reflects the container root; changes apply directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    NotBuilt,
    Building,
    Built,
}

impl BuildState {
    /// Transition taken when a full scan starts.
    ///
    /// `None` while a scan is already running: only one build at a time.
    pub fn begin_build(self) -> Option<BuildState> {
        match self {
            BuildState::Building => None,
            BuildState::NotBuilt | BuildState::Built => Some(BuildState::Building),
        }
    }

    /// Transition taken when a full scan completes.
    ///
    /// `None` unless a scan is running.
    pub fn finish_build(self) -> Option<BuildState> {
        match self {
            BuildState::Building => Some(BuildState::Built),
            BuildState::NotBuilt | BuildState::Built => None,
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuildState::NotBuilt => "not built",
            BuildState::Building => "building",
            BuildState::Built => "built",
        };
        f.write_str(s)
    }
}

/// Kind of a routed file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Created or modified; the container must be re-extracted.
    Changed,
    /// Removed from disk.
    Deleted,
}

/// A filesystem change for one container, after routing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileChange {
    pub path: ContainerPath,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn changed(path: impl Into<ContainerPath>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Changed,
        }
    }

    pub fn deleted(path: impl Into<ContainerPath>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Deleted,
        }
    }
}
