//! Insertion-ordered set of record paths scheduled for deletion

use ahash::AHashSet;
use serde::Serialize;

/// Why a record was scheduled for deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DeletionReason {
    /// Lost the ranking within its natural-key group
    Duplicate { key: String },
    /// Id carries the import-batch prefix
    ImportBatch,
}

/// A single deletion target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deletion {
    pub path: String,
    #[serde(flatten)]
    pub reason: DeletionReason,
}

/// Ordered deletion targets, each path at most once
#[derive(Debug, Clone, Default)]
pub struct DeletionSet {
    entries: Vec<Deletion>,
    paths: AHashSet<String>,
}

impl DeletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path, keeping the first reason recorded for it
    ///
    /// Returns false when the path was already present.
    pub fn insert(&mut self, path: impl Into<String>, reason: DeletionReason) -> bool {
        let path = path.into();
        if !self.paths.insert(path.clone()) {
            return false;
        }
        self.entries.push(Deletion { path, reason });
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deletions in the order they were scheduled
    pub fn iter(&self) -> impl Iterator<Item = &Deletion> {
        self.entries.iter()
    }

    /// Paths in the order they were scheduled
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.path.as_str())
    }

    pub fn into_paths(self) -> Vec<String> {
        self.entries.into_iter().map(|d| d.path).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let mut set = DeletionSet::new();

        assert!(set.insert("b", DeletionReason::ImportBatch));
        assert!(set.insert("a", DeletionReason::ImportBatch));
        assert!(set.insert("c", DeletionReason::ImportBatch));

        assert_eq!(set.paths().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_insert_is_ignored() {
        let mut set = DeletionSet::new();
        let dup = DeletionReason::Duplicate { key: "1-9".to_string() };

        assert!(set.insert("p1", dup.clone()));
        assert!(!set.insert("p1", DeletionReason::ImportBatch));

        assert_eq!(set.len(), 1);
        assert!(set.contains("p1"));
        assert_eq!(set.iter().next().unwrap().reason, dup);
    }

    #[test]
    fn test_into_paths() {
        let mut set = DeletionSet::new();
        assert!(set.is_empty());

        set.insert("x", DeletionReason::ImportBatch);
        set.insert("y", DeletionReason::ImportBatch);

        assert_eq!(set.into_paths(), vec!["x".to_string(), "y".to_string()]);
    }
}
