// src/index/script_index.rs

//! Bidirectional script ↔ container index.
//!
//! Two maps are kept as exact inverses of each other:
//!
//! - forward: script id → containers referencing it (used by lookups)
//! - reverse: container → script ids it references (used to diff updates)
//!
//! Neither map ever holds a key with an empty set. Every public mutator
//! leaves both maps consistent before it returns; callers serialize access
//! (the runtime owns the index on a single task).

use std::collections::HashMap;
use std::path::Path;

use tracing::trace;

use crate::index::delta::{diff, Delta};
use crate::types::{ContainerPath, ContainerSet, ScriptId, ScriptSet};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptIndex {
    forward: HashMap<ScriptId, ContainerSet>,
    reverse: HashMap<ContainerPath, ScriptSet>,
}

impl ScriptIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the recorded script set of `path` with `scripts`.
    ///
    /// Only the identifiers that actually changed touch the forward map. An
    /// empty `scripts` removes the container entirely.
    pub fn record_container(&mut self, path: &Path, scripts: ScriptSet) -> Delta<ScriptId> {
        let previous = self.reverse.get(path).cloned().unwrap_or_default();
        let delta = diff(&previous, &scripts);

        for script in &delta.deleted {
            self.unlink(script, path);
        }
        for script in &delta.added {
            self.forward
                .entry(script.clone())
                .or_default()
                .insert(path.to_path_buf());
        }

        if scripts.is_empty() {
            self.reverse.remove(path);
        } else {
            self.reverse.insert(path.to_path_buf(), scripts);
        }

        if !delta.is_empty() {
            trace!(?path, added = ?delta.added, deleted = ?delta.deleted, "recorded container");
        }
        delta
    }

    /// Forget `path`. Returns the identifiers it referenced, if any.
    pub fn remove_container(&mut self, path: &Path) -> Option<ScriptSet> {
        let scripts = self.reverse.remove(path)?;
        for script in &scripts {
            self.unlink(script, path);
        }
        trace!(?path, count = scripts.len(), "removed container");
        Some(scripts)
    }

    /// Containers referencing `script`; empty if the id is unknown.
    pub fn lookup(&self, script: &str) -> ContainerSet {
        self.forward.get(script).cloned().unwrap_or_default()
    }

    /// Identifiers recorded for `path`, if it references any.
    pub fn scripts_of(&self, path: &Path) -> Option<&ScriptSet> {
        self.reverse.get(path)
    }

    pub fn contains_container(&self, path: &Path) -> bool {
        self.reverse.contains_key(path)
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    /// Number of containers that reference at least one script.
    pub fn container_count(&self) -> usize {
        self.reverse.len()
    }

    /// Number of distinct referenced scripts.
    pub fn script_count(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// Check that both maps are exact inverses and hold no empty sets.
    ///
    /// Returns a description of the first violation found.
    pub fn verify(&self) -> Result<(), String> {
        for (script, containers) in &self.forward {
            if containers.is_empty() {
                return Err(format!("script {script:?} maps to an empty set"));
            }
            for path in containers {
                let back = self.reverse.get(path).is_some_and(|s| s.contains(script));
                if !back {
                    return Err(format!("{path:?} listed for {script:?} but not reverse-linked"));
                }
            }
        }

        for (path, scripts) in &self.reverse {
            if scripts.is_empty() {
                return Err(format!("container {path:?} maps to an empty set"));
            }
            for script in scripts {
                let fwd = self.forward.get(script).is_some_and(|c| c.contains(path));
                if !fwd {
                    return Err(format!("{script:?} listed for {path:?} but not forward-linked"));
                }
            }
        }

        Ok(())
    }

    fn unlink(&mut self, script: &str, path: &Path) {
        if let Some(containers) = self.forward.get_mut(script) {
            containers.remove(path);
            if containers.is_empty() {
                self.forward.remove(script);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ids(items: &[&str]) -> ScriptSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn re_recording_moves_references() {
        let mut index = ScriptIndex::new();
        let path = p("/proj/Hero.prefab");

        index.record_container(&path, ids(&["A", "B"]));
        let delta = index.record_container(&path, ids(&["B", "C"]));

        assert_eq!(delta.deleted, vec!["A".to_string()]);
        assert_eq!(delta.added, vec!["C".to_string()]);
        assert!(!index.lookup("A").contains(&path));
        assert!(index.lookup("B").contains(&path));
        assert!(index.lookup("C").contains(&path));
        assert_eq!(index.script_count(), 2);
        index.verify().unwrap();
    }

    #[test]
    fn recording_same_set_twice_is_idempotent() {
        let mut once = ScriptIndex::new();
        once.record_container(&p("/a.prefab"), ids(&["A", "B"]));

        let mut twice = once.clone();
        let delta = twice.record_container(&p("/a.prefab"), ids(&["A", "B"]));

        assert!(delta.is_empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn remove_then_lookup_is_empty() {
        let mut index = ScriptIndex::new();
        let path = p("/a.prefab");
        index.record_container(&path, ids(&["A"]));

        assert_eq!(index.remove_container(&path), Some(ids(&["A"])));
        assert!(index.lookup("A").is_empty());
        assert!(index.is_empty());
        assert_eq!(index.script_count(), 0);
    }

    #[test]
    fn removing_unknown_container_is_a_no_op() {
        let mut index = ScriptIndex::new();
        index.record_container(&p("/a.prefab"), ids(&["A"]));
        assert_eq!(index.remove_container(&p("/b.prefab")), None);
        assert_eq!(index.lookup("A").len(), 1);
    }

    #[test]
    fn empty_set_drops_the_container_key() {
        let mut index = ScriptIndex::new();
        let path = p("/a.unity");
        index.record_container(&path, ids(&["A"]));
        index.record_container(&path, ScriptSet::new());

        assert!(!index.contains_container(&path));
        assert!(index.lookup("A").is_empty());
        index.verify().unwrap();
    }

    #[test]
    fn shared_script_survives_one_container_leaving() {
        let mut index = ScriptIndex::new();
        index.record_container(&p("/a.prefab"), ids(&["Shared"]));
        index.record_container(&p("/b.prefab"), ids(&["Shared", "Own"]));

        index.remove_container(&p("/b.prefab"));

        assert_eq!(index.lookup("Shared").len(), 1);
        assert!(index.lookup("Own").is_empty());
        index.verify().unwrap();
    }

    #[test]
    fn clear_empties_both_directions() {
        let mut index = ScriptIndex::new();
        index.record_container(&p("/a.prefab"), ids(&["A"]));
        index.clear();
        assert!(index.is_empty());
        assert!(index.lookup("A").is_empty());
    }
}
