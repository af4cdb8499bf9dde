//! Forest construction from depth-annotated lines.

use compact_str::CompactString;
use treeforge_core::{Forest, Node, NodeKind};

use crate::indent::ClassifiedLine;

/// One parsed tree entry, before it is placed in the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLine {
    /// 1-based line number.
    pub line: usize,
    /// Original text.
    pub raw: String,
    /// Zero-based nesting level.
    pub depth: usize,
    /// Column width of the stripped prefix.
    pub indent: usize,
    /// Whether the prefix contained guide glyphs.
    pub guided: bool,
    /// Name with any trailing slash removed.
    pub name: CompactString,
    /// Whether the entry ended with `/`.
    pub explicit_dir: bool,
    /// Trailing comment kept for display.
    pub hint: Option<String>,
}

impl From<ClassifiedLine> for ParseLine {
    fn from(line: ClassifiedLine) -> Self {
        let (name, explicit_dir) = normalize_name(&line.content);
        Self {
            line: line.number,
            raw: line.raw,
            depth: line.depth,
            indent: line.indent,
            guided: line.guided,
            name: name.into(),
            explicit_dir,
            hint: line.hint,
        }
    }
}

impl ParseLine {
    /// Kind implied by this line alone.
    pub fn kind(&self) -> NodeKind {
        NodeKind::infer(&self.name, self.explicit_dir)
    }
}

/// Strip trailing slashes, reporting whether there were any.
fn normalize_name(content: &str) -> (&str, bool) {
    let trimmed = content.trim();
    let name = trimmed.trim_end_matches('/');
    (name.trim_end(), name.len() != trimmed.len())
}

/// Build a forest from lines in source order.
///
/// Uses a stack of open `(depth, node)` scopes. A line closes every scope
/// at its own depth or deeper, then becomes a child of whatever scope is
/// left open, or a new root when none is. Equal depths are always siblings.
pub fn build_forest(lines: &[ParseLine]) -> Forest {
    let mut roots = Vec::new();
    let mut stack: Vec<(usize, Node)> = Vec::new();

    for line in lines {
        while stack.last().is_some_and(|(depth, _)| *depth >= line.depth) {
            close_scope(&mut stack, &mut roots);
        }

        let node = match stack.last() {
            Some((_, parent)) => {
                Node::child_of(&parent.path, line.name.clone(), line.kind(), line.line)
            }
            None => Node::root(line.name.clone(), line.kind(), line.line),
        };
        stack.push((line.depth, node.with_hint(line.hint.clone())));
    }

    while !stack.is_empty() {
        close_scope(&mut stack, &mut roots);
    }

    Forest::new(roots)
}

fn close_scope(stack: &mut Vec<(usize, Node)>, roots: &mut Vec<Node>) {
    let Some((_, node)) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some((_, parent)) => parent.push_child(node),
        None => roots.push(node),
    }
}
