//! Forest rendering back to tree text.

use treeforge_core::{Forest, Node};

/// Output dialect for [`render_forest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderStyle {
    /// Two-space indentation.
    #[default]
    Plain,
    /// `├── ` / `└── ` / `│   ` box-drawing guides.
    Unicode,
    /// `|-- ` / `` `-- `` / `|   ` ASCII guides.
    Ascii,
}

struct Glyphs {
    branch: &'static str,
    corner: &'static str,
    pipe: &'static str,
    blank: &'static str,
}

impl RenderStyle {
    fn glyphs(&self) -> Glyphs {
        match self {
            Self::Plain => Glyphs {
                branch: "  ",
                corner: "  ",
                pipe: "  ",
                blank: "  ",
            },
            Self::Unicode => Glyphs {
                branch: "├── ",
                corner: "└── ",
                pipe: "│   ",
                blank: "    ",
            },
            Self::Ascii => Glyphs {
                branch: "|-- ",
                corner: "`-- ",
                pipe: "|   ",
                blank: "    ",
            },
        }
    }
}

/// Render a forest as tree text, one entry per line.
///
/// Directories get a trailing `/` and hints become trailing `#` comments,
/// so parsing the output yields the same structure.
pub fn render_forest(forest: &Forest, style: RenderStyle) -> String {
    let glyphs = style.glyphs();
    let mut out = String::new();
    for root in &forest.roots {
        push_entry(&mut out, "", root);
        render_children(&mut out, &glyphs, "", root);
    }
    out
}

fn render_children(out: &mut String, glyphs: &Glyphs, prefix: &str, node: &Node) {
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        let (connector, continuation) = if i == last {
            (glyphs.corner, glyphs.blank)
        } else {
            (glyphs.branch, glyphs.pipe)
        };
        push_entry(out, &format!("{prefix}{connector}"), child);
        render_children(out, glyphs, &format!("{prefix}{continuation}"), child);
    }
}

fn push_entry(out: &mut String, prefix: &str, node: &Node) {
    out.push_str(prefix);
    out.push_str(&node.name);
    if node.is_dir() {
        out.push('/');
    }
    if let Some(hint) = &node.hint {
        out.push_str("  # ");
        out.push_str(hint);
    }
    out.push('\n');
}
