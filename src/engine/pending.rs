// src/engine/pending.rs

use std::collections::HashSet;

use tracing::debug;

use crate::types::{ChangeKind, ContainerPath, FileChange};

/// Container changes that arrived while a full build was running.
///
/// Semantics:
/// - A path is in at most one of the two sets; the most recent change for
///   a path decides which. Changed, then deleted, then changed again ends
///   up in `changed`.
/// - Repeated changes to the same path collapse to one entry.
/// - [`drain`](Self::drain) hands everything over once and leaves the set
///   empty.
#[derive(Debug, Default, Clone)]
pub struct PendingChanges {
    changed: HashSet<ContainerPath>,
    deleted: HashSet<ContainerPath>,
}

/// Pending changes taken out for replay, in replay order per kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrainedChanges {
    /// Created or modified containers; re-extracted on replay.
    pub changed: Vec<ContainerPath>,
    /// Removed containers; replayed after every changed path.
    pub deleted: Vec<ContainerPath>,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.deleted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changed.len() + self.deleted.len()
    }

    pub fn is_changed(&self, path: &ContainerPath) -> bool {
        self.changed.contains(path)
    }

    pub fn is_deleted(&self, path: &ContainerPath) -> bool {
        self.deleted.contains(path)
    }

    pub fn record(&mut self, change: FileChange) {
        match change.kind {
            ChangeKind::Changed => {
                let superseded = self.deleted.remove(&change.path);
                debug!(path = ?change.path, superseded, "queued container change");
                self.changed.insert(change.path);
            }
            ChangeKind::Deleted => {
                let superseded = self.changed.remove(&change.path);
                debug!(path = ?change.path, superseded, "queued container delete");
                self.deleted.insert(change.path);
            }
        }
    }

    /// Take all queued changes, sorted by path within each kind.
    pub fn drain(&mut self) -> DrainedChanges {
        let mut changed: Vec<ContainerPath> = self.changed.drain().collect();
        let mut deleted: Vec<ContainerPath> = self.deleted.drain().collect();
        changed.sort();
        deleted.sort();

        debug!(
            changed = changed.len(),
            deleted = deleted.len(),
            "drained pending container changes"
        );
        DrainedChanges { changed, deleted }
    }

    pub fn clear(&mut self) {
        self.changed.clear();
        self.deleted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn later_delete_supersedes_change() {
        let mut pending = PendingChanges::new();
        pending.record(FileChange::changed("/a.prefab"));
        pending.record(FileChange::deleted("/a.prefab"));

        assert!(!pending.is_changed(&PathBuf::from("/a.prefab")));
        assert!(pending.is_deleted(&PathBuf::from("/a.prefab")));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn change_delete_change_ends_as_change() {
        let mut pending = PendingChanges::new();
        pending.record(FileChange::changed("/a.prefab"));
        pending.record(FileChange::deleted("/a.prefab"));
        pending.record(FileChange::changed("/a.prefab"));

        let drained = pending.drain();
        assert_eq!(drained.changed, vec![PathBuf::from("/a.prefab")]);
        assert!(drained.deleted.is_empty());
    }

    #[test]
    fn repeated_changes_collapse() {
        let mut pending = PendingChanges::new();
        for _ in 0..3 {
            pending.record(FileChange::changed("/a.prefab"));
        }
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn drain_empties_the_set() {
        let mut pending = PendingChanges::new();
        pending.record(FileChange::changed("/b.prefab"));
        pending.record(FileChange::changed("/a.prefab"));
        pending.record(FileChange::deleted("/c.prefab"));

        let drained = pending.drain();
        assert_eq!(
            drained.changed,
            vec![PathBuf::from("/a.prefab"), PathBuf::from("/b.prefab")]
        );
        assert_eq!(drained.deleted, vec![PathBuf::from("/c.prefab")]);
        assert!(pending.is_empty());
        assert_eq!(pending.drain(), DrainedChanges::default());
    }
}
