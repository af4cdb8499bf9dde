//! Per-pass duplicate tracking.

use indexmap::{IndexMap, IndexSet};

/// Paths and sibling names claimed during one validation pass.
///
/// Insertion order follows the depth-first walk, which decides which member
/// of a duplicate group counts as the first. Each pass owns its own session.
#[derive(Debug, Clone, Default)]
pub struct ValidationSession {
    seen_paths: IndexSet<String>,
    seen_names_by_parent: IndexMap<String, IndexSet<String>>,
}

impl ValidationSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.seen_paths.clear();
        self.seen_names_by_parent.clear();
    }

    /// Check if `path` has been claimed.
    pub fn contains_path(&self, path: &str) -> bool {
        self.seen_paths.contains(path)
    }

    /// Claim `path`, returning `false` if it was already claimed.
    pub fn record_path(&mut self, path: &str) -> bool {
        if self.seen_paths.contains(path) {
            return false;
        }
        self.seen_paths.insert(path.to_string())
    }

    /// Check if `name` has been claimed under `parent` (`""` for roots).
    pub fn contains_name(&self, parent: &str, name: &str) -> bool {
        self.seen_names_by_parent
            .get(parent)
            .is_some_and(|names| names.contains(name))
    }

    /// Claim `name` under `parent`, returning `false` if it was already
    /// claimed.
    pub fn record_name(&mut self, parent: &str, name: &str) -> bool {
        let names = self
            .seen_names_by_parent
            .entry(parent.to_string())
            .or_default();
        if names.contains(name) {
            return false;
        }
        names.insert(name.to_string())
    }

    /// Claimed paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.seen_paths.iter().map(String::as_str)
    }

    /// Number of claimed paths.
    pub fn path_count(&self) -> usize {
        self.seen_paths.len()
    }
}
