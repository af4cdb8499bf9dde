//! Forest container and statistics.

use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Summary statistics for a parsed forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestStats {
    /// Number of root nodes.
    pub roots: usize,
    /// Total number of files.
    pub files: usize,
    /// Total number of directories.
    pub directories: usize,
    /// Deepest zero-based nesting level.
    pub max_depth: usize,
    /// Longest path, in characters.
    pub longest_path: usize,
}

impl ForestStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with a node found at `depth`.
    pub fn record(&mut self, node: &Node, depth: usize) {
        if node.is_dir() {
            self.directories += 1;
        } else {
            self.files += 1;
        }
        self.max_depth = self.max_depth.max(depth);
        self.longest_path = self.longest_path.max(node.path.chars().count());
    }

    /// Total number of nodes.
    pub fn total(&self) -> usize {
        self.files + self.directories
    }
}

/// Ordered list of root nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    /// Root nodes in source order.
    pub roots: Vec<Node>,
}

impl Forest {
    /// Create a forest from root nodes.
    pub fn new(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    /// Check if the forest has no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Check if there is more than one root.
    pub fn is_multi_root(&self) -> bool {
        self.roots.len() > 1
    }

    /// Total number of nodes in every tree.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(Node::subtree_size).sum()
    }

    /// Visit every node depth-first, roots in order.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a Node, usize)) {
        for root in &self.roots {
            root.walk(&mut visit);
        }
    }

    /// Collect every node path in depth-first order.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths = Vec::with_capacity(self.node_count());
        self.walk(|node, _| paths.push(node.path.as_str()));
        paths
    }

    /// Compute summary statistics.
    pub fn stats(&self) -> ForestStats {
        let mut stats = ForestStats::new();
        stats.roots = self.roots.len();
        self.walk(|node, depth| stats.record(node, depth));
        stats
    }
}
