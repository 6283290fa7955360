// src/index/delta.rs

use std::collections::BTreeSet;

/// Result of comparing two sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta<T> {
    /// In the new set but not the old one.
    pub added: Vec<T>,
    /// In the old set but not the new one.
    pub deleted: Vec<T>,
}

impl<T> Delta<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Compare `old` against `new`.
///
/// Output order follows the iteration order of the inputs.
pub fn diff<T: Ord + Clone>(old: &BTreeSet<T>, new: &BTreeSet<T>) -> Delta<T> {
    Delta {
        added: new.difference(old).cloned().collect(),
        deleted: old.difference(new).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reports_added_and_deleted() {
        let d = diff(&set(&["A", "B"]), &set(&["B", "C"]));
        assert_eq!(d.deleted, vec!["A".to_string()]);
        assert_eq!(d.added, vec!["C".to_string()]);
    }

    #[test]
    fn identical_sets_produce_empty_delta() {
        let d = diff(&set(&["A", "B"]), &set(&["A", "B"]));
        assert!(d.is_empty());
    }

    #[test]
    fn empty_old_set_adds_everything() {
        let d = diff(&BTreeSet::new(), &set(&["X", "Y"]));
        assert_eq!(d.added.len(), 2);
        assert!(d.deleted.is_empty());
    }
}
