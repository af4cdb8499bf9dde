//! Structural well-formedness checks.
//!
//! Runs once over the parsed lines and the built forest, before any path
//! rule is evaluated. Every offending line is collected so the caller sees
//! the full list in one error.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::warn;
use treeforge_core::{
    Forest, IssueKind, ParseConfig, ParseWarning, RESERVED_CHARACTERS, StructuralError,
    StructuralIssue,
};

use crate::builder::ParseLine;

/// Check the parse result, returning non-fatal warnings on success.
pub fn check_structure(
    lines: &[ParseLine],
    forest: &Forest,
    config: &ParseConfig,
) -> Result<Vec<ParseWarning>, StructuralError> {
    let mut issues = Vec::new();

    if let Some(first) = lines.first() {
        if first.indent > 0 || first.guided || first.depth > 0 {
            issues.push(StructuralIssue::new(first.line, &first.raw, IssueKind::IndentedRoot));
        }
    }

    for (previous, line) in lines.iter().tuple_windows() {
        if line.depth > previous.depth + 1 {
            issues.push(StructuralIssue::new(
                line.line,
                &line.raw,
                IssueKind::DepthJump {
                    previous: previous.depth,
                    depth: line.depth,
                },
            ));
        }
    }

    for line in lines {
        issues.extend(name_issues(line));
    }

    if config.strict_duplicates {
        issues.extend(duplicate_issues(lines, forest));
    }

    if !issues.is_empty() {
        return Err(StructuralError::new(issues));
    }

    let warnings: Vec<_> = forest
        .roots
        .iter()
        .skip(1)
        .map(|root| ParseWarning::multiple_roots(root.line, &root.name))
        .collect();
    if !warnings.is_empty() {
        warn!(roots = forest.roots.len(), "tree has more than one root");
    }

    Ok(warnings)
}

fn name_issues(line: &ParseLine) -> Vec<StructuralIssue> {
    let name = line.name.as_str();
    if name.is_empty() {
        return vec![StructuralIssue::new(line.line, &line.raw, IssueKind::EmptyName)];
    }

    let mut issues: Vec<_> = name
        .chars()
        .filter(|c| RESERVED_CHARACTERS.contains(c))
        .unique()
        .map(|character| {
            StructuralIssue::new(line.line, &line.raw, IssueKind::ReservedCharacter { character })
        })
        .collect();

    if is_absolute(name) {
        issues.push(StructuralIssue::new(line.line, &line.raw, IssueKind::AbsolutePath));
    }
    issues
}

/// Leading separator or a `X:\` / `X:/` drive prefix.
fn is_absolute(name: &str) -> bool {
    if name.starts_with('/') || name.starts_with('\\') {
        return true;
    }
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(drive), Some(':'), Some('\\' | '/')) if drive.is_ascii_alphabetic()
    )
}

fn duplicate_issues(lines: &[ParseLine], forest: &Forest) -> Vec<StructuralIssue> {
    let raw_by_line: HashMap<usize, &str> = lines.iter().map(|l| (l.line, l.raw.as_str())).collect();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut issues = Vec::new();

    forest.walk(|node, _| match first_seen.get(node.path.as_str()) {
        Some(&first_line) => issues.push(StructuralIssue::new(
            node.line,
            raw_by_line.get(&node.line).copied().unwrap_or_default(),
            IssueKind::DuplicatePath {
                path: node.path.clone(),
                first_line,
            },
        )),
        None => {
            first_seen.insert(node.path.as_str(), node.line);
        }
    });

    issues
}
