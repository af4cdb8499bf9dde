//! ASCII tree diagram parser for treeforge.
//!
//! This crate turns loosely formatted tree text into a [`Forest`] of
//! named nodes with fully joined paths.
//!
//! # Overview
//!
//! Parsing runs in four stages:
//!
//! - **Comment stripping** removes `#`, `//`, `/* */`, triple-quoted and
//!   hash-delimited comments while keeping line numbers aligned
//! - **Indent classification** strips guide glyphs (`│ ├ └ ─`, `| + \` -`),
//!   infers the indentation unit and computes a depth per line
//! - **Tree building** rebuilds the nesting with a depth-ordered stack
//! - **Structural validation** rejects indented roots, depth jumps, empty,
//!   reserved or absolute names and duplicate paths, listing every offending
//!   line at once
//!
//! # Example
//!
//! ```rust
//! use treeforge_parse::{ParseConfig, TreeParser};
//!
//! let text = "project/\n├─ src/\n│  └─ index.ts";
//! let output = TreeParser::new(ParseConfig::default()).parse(text).unwrap();
//!
//! assert_eq!(output.forest.paths(), vec!["project", "project/src", "project/src/index.ts"]);
//! ```

mod builder;
mod comments;
mod indent;
mod render;
mod structure;

pub use builder::{ParseLine, build_forest};
pub use comments::{CommentScan, StrippedLine, scan_comments, strip_comments};
pub use indent::{ClassifiedLine, IndentProfile, classify};
pub use render::{RenderStyle, render_forest};
pub use structure::check_structure;

// Re-export core types for convenience
pub use treeforge_core::{
    Forest, IssueKind, Node, NodeKind, ParseConfig, ParseWarning, StructuralError,
    StructuralIssue, TreeStyle,
};

use tracing::debug;

/// Everything a successful parse produces.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// Parsed nodes.
    pub forest: Forest,
    /// One entry per content-bearing source line.
    pub lines: Vec<ParseLine>,
    /// Indentation detected in the input.
    pub profile: IndentProfile,
    /// Non-fatal findings, such as additional roots.
    pub warnings: Vec<ParseWarning>,
}

/// Tree text parser.
#[derive(Debug, Clone, Default)]
pub struct TreeParser {
    config: ParseConfig,
}

impl TreeParser {
    /// Create a parser with the given configuration.
    pub fn new(config: ParseConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parse tree text into a forest.
    pub fn parse(&self, text: &str) -> Result<ParseOutput, StructuralError> {
        let scan = scan_comments(text);
        let (profile, classified) = classify(&scan.lines, &self.config);
        debug!(
            lines = classified.len(),
            unit_width = profile.width,
            uses_guides = profile.uses_guides,
            "classified tree lines"
        );

        let lines: Vec<ParseLine> = classified.into_iter().map(ParseLine::from).collect();
        let forest = build_forest(&lines);
        let warnings = match (check_structure(&lines, &forest, &self.config), scan.unterminated) {
            (Ok(warnings), None) => warnings,
            (Ok(_), Some(issue)) => return Err(StructuralError::single(issue)),
            (Err(err), None) => return Err(err),
            (Err(err), Some(issue)) => {
                let mut issues = err.issues;
                issues.push(issue);
                return Err(StructuralError::new(issues));
            }
        };
        debug!(roots = forest.roots.len(), nodes = forest.node_count(), "built forest");

        Ok(ParseOutput {
            forest,
            lines,
            profile,
            warnings,
        })
    }
}

/// Parse tree text with the given configuration.
pub fn parse(text: &str, config: &ParseConfig) -> Result<ParseOutput, StructuralError> {
    TreeParser::new(config.clone()).parse(text)
}
