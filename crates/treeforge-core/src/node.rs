//! Tree node types.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Canonical separator used when joining node names into paths.
pub const PATH_SEPARATOR: char = '/';

/// Type of tree entry.
///
/// Inferred from the source text, so it is a heuristic rather than an
/// authoritative file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Directory entry.
    Directory,
    /// Regular file entry.
    File,
}

impl NodeKind {
    /// Infer the kind of a leaf from its (already slash-stripped) name.
    ///
    /// An explicit trailing slash always wins. Otherwise a name with an
    /// embedded dot is a file and anything else is a directory, which means
    /// `v1.2` without a slash is classified as a file.
    pub fn infer(name: &str, explicit_dir: bool) -> Self {
        if explicit_dir || !name.contains('.') {
            NodeKind::Directory
        } else {
            NodeKind::File
        }
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }
}

/// A single entry of a parsed tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Raw segment text, after comment stripping and trailing slash removal.
    pub name: CompactString,

    /// Ancestor names joined with `/`, ending with `name`.
    pub path: String,

    /// Directory or file.
    pub kind: NodeKind,

    /// Child nodes in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,

    /// Inline annotation taken from a trailing comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// 1-based source line this node was parsed from.
    pub line: usize,
}

impl Node {
    /// Create a root node, whose path is its own name.
    pub fn root(name: impl Into<CompactString>, kind: NodeKind, line: usize) -> Self {
        let name = name.into();
        Self {
            path: name.to_string(),
            name,
            kind,
            children: Vec::new(),
            hint: None,
            line,
        }
    }

    /// Create a node below `parent_path`.
    pub fn child_of(
        parent_path: &str,
        name: impl Into<CompactString>,
        kind: NodeKind,
        line: usize,
    ) -> Self {
        let name = name.into();
        Self {
            path: join_path(parent_path, &name),
            name,
            kind,
            children: Vec::new(),
            hint: None,
            line,
        }
    }

    /// Attach an inline hint.
    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }

    /// Append a child, promoting this node to a directory.
    pub fn push_child(&mut self, child: Node) {
        self.kind = NodeKind::Directory;
        self.children.push(child);
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Path of the parent node, or `None` for a root.
    pub fn parent_path(&self) -> Option<&str> {
        let parent = self.path.strip_suffix(self.name.as_str())?;
        parent.strip_suffix(PATH_SEPARATOR)
    }

    /// Number of `/`-separated segments in the path.
    pub fn segment_count(&self) -> usize {
        self.path.split(PATH_SEPARATOR).filter(|s| !s.is_empty()).count()
    }

    /// Count this node and all of its descendants.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_size).sum::<usize>()
    }

    /// Visit this node and its descendants depth-first in source order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Node, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }
}

/// Join a parent path and a name with the canonical separator.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        return name.to_string();
    }
    let mut path = String::with_capacity(parent.len() + name.len() + 1);
    path.push_str(parent);
    path.push(PATH_SEPARATOR);
    path.push_str(name);
    path
}

/// Split a path into its directory prefix (without trailing slash) and
/// final segment.
pub fn split_path(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once(PATH_SEPARATOR) {
        Some((dir, last)) => (Some(dir), last),
        None => (None, path),
    }
}
