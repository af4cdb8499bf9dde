//! Path rule validation.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use treeforge_core::{
    ConfigError, ConflictStrategy, Forest, Node, ValidationRules, Violation, ViolationCode,
    join_path, split_path,
};

use crate::normalize::{normalize_name, normalize_path};
use crate::resolver::{ConflictResolver, split_extension};
use crate::session::ValidationSession;

/// A failed check: category, message and extra details.
type Finding = (ViolationCode, String, Vec<(&'static str, String)>);

/// Violations collected over one forest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// All violations in depth-first node order.
    pub violations: Vec<Violation>,
    /// Number of nodes visited.
    pub nodes_checked: usize,
}

impl ValidationReport {
    /// Violations reported as errors.
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_error())
    }

    /// Violations reported as warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.is_error())
    }

    /// Check if any violation is an error.
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(Violation::is_error)
    }

    /// Check if nothing was reported.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations grouped by category, in first-seen order.
    pub fn by_code(&self) -> IndexMap<ViolationCode, Vec<&Violation>> {
        let mut groups: IndexMap<ViolationCode, Vec<&Violation>> = IndexMap::new();
        for violation in &self.violations {
            groups.entry(violation.code).or_default().push(violation);
        }
        groups
    }
}

/// Checks node paths against a rule set and suggests repairs.
#[derive(Debug, Clone)]
pub struct PathValidator {
    rules: ValidationRules,
    strategy: ConflictStrategy,
    allowed: Regex,
}

impl PathValidator {
    /// Create a validator, compiling the allowed-character pattern.
    ///
    /// The pattern is anchored so that it must match a whole name.
    pub fn new(rules: ValidationRules, strategy: ConflictStrategy) -> Result<Self, ConfigError> {
        let anchored = format!("^(?:{})$", rules.allowed_chars);
        let allowed = Regex::new(&anchored).map_err(|e| ConfigError::InvalidPattern {
            pattern: rules.allowed_chars.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            rules,
            strategy,
            allowed,
        })
    }

    /// The rule set in use.
    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// The conflict strategy in use.
    pub fn strategy(&self) -> &ConflictStrategy {
        &self.strategy
    }

    /// Validate every node of a forest, depth first, with a fresh session.
    pub fn validate_forest(&self, forest: &Forest) -> ValidationReport {
        let mut session = ValidationSession::new();
        let mut report = ValidationReport::default();
        for root in &forest.roots {
            self.validate_subtree(root, None, &mut session, &mut report);
        }
        debug!(
            nodes = report.nodes_checked,
            violations = report.violations.len(),
            "validated forest"
        );
        report
    }

    fn validate_subtree(
        &self,
        node: &Node,
        parent_path: Option<&str>,
        session: &mut ValidationSession,
        report: &mut ValidationReport,
    ) {
        report.violations.extend(self.validate(node, parent_path, session));
        report.nodes_checked += 1;

        let path = self.node_path(node, parent_path);
        for child in &node.children {
            self.validate_subtree(child, Some(&path), session, report);
        }
    }

    fn node_path(&self, node: &Node, parent_path: Option<&str>) -> String {
        let raw = match parent_path {
            Some(parent) => join_path(parent, &node.name),
            None => node.path.clone(),
        };
        normalize_path(&raw, &self.rules)
    }

    /// Validate one node.
    ///
    /// `parent_path` is the normalized path of the parent, or `None` for a
    /// root. Every check runs; the node's path and name are recorded into
    /// `session` whether or not they collide, followed by any repaired paths.
    pub fn validate(
        &self,
        node: &Node,
        parent_path: Option<&str>,
        session: &mut ValidationSession,
    ) -> Vec<Violation> {
        let rules = &self.rules;
        let path = self.node_path(node, parent_path);
        let name = normalize_name(&node.name, rules);
        let parent_key = parent_path.unwrap_or_else(|| split_path(&path).0.unwrap_or(""));
        trace!(path = %path, line = node.line, "validating node");

        let mut found: Vec<Finding> = Vec::new();

        let path_len = path.chars().count();
        if path_len > rules.max_path_length {
            found.push((
                ViolationCode::LongPath,
                format!("path is {path_len} characters, limit is {}", rules.max_path_length),
                vec![
                    ("length", path_len.to_string()),
                    ("limit", rules.max_path_length.to_string()),
                ],
            ));
        }

        let depth = path.split('/').count();
        if depth > rules.max_depth {
            found.push((
                ViolationCode::MaxDepth,
                format!("path has {depth} segments, limit is {}", rules.max_depth),
                vec![("depth", depth.to_string()), ("limit", rules.max_depth.to_string())],
            ));
        }

        let name_len = name.chars().count();
        if name_len > rules.max_name_length {
            found.push((
                ViolationCode::LongName,
                format!("name is {name_len} characters, limit is {}", rules.max_name_length),
                vec![
                    ("length", name_len.to_string()),
                    ("limit", rules.max_name_length.to_string()),
                ],
            ));
        }

        if !self.allowed.is_match(name) {
            found.push((
                ViolationCode::InvalidChars,
                format!("name '{name}' contains characters outside {}", rules.allowed_chars),
                vec![("pattern", rules.allowed_chars.clone())],
            ));
        }

        if rules.is_disallowed(name) {
            found.push((
                ViolationCode::ReservedName,
                format!("'{name}' is a reserved name"),
                Vec::new(),
            ));
        }

        if !rules.enforce_case.matches(name) {
            found.push((
                ViolationCode::WrongCase,
                format!("'{name}' does not match the required case"),
                vec![("case", format!("{:?}", rules.enforce_case).to_lowercase())],
            ));
        }

        if !rules.allow_dots && node.is_dir() && name.contains('.') {
            found.push((
                ViolationCode::DotsInDir,
                format!("directory '{name}' contains a dot"),
                Vec::new(),
            ));
        }

        if !rules.allow_spaces && path.chars().any(char::is_whitespace) {
            found.push((
                ViolationCode::SpacesInPath,
                "path contains whitespace".to_string(),
                Vec::new(),
            ));
        }

        if node.is_file() {
            match split_extension(name) {
                (_, None) if rules.require_extensions => found.push((
                    ViolationCode::MissingExtension,
                    format!("file '{name}' has no extension"),
                    Vec::new(),
                )),
                (_, Some(ext)) if !rules.is_extension_allowed(ext) => found.push((
                    ViolationCode::InvalidExtension,
                    format!("extension '.{ext}' is not allowed"),
                    vec![("extension", ext.to_string())],
                )),
                _ => {}
            }
        }

        let path_taken = !session.record_path(&path);
        if rules.unique_paths && path_taken {
            found.push((
                ViolationCode::DuplicatePath,
                format!("path '{path}' appears more than once"),
                Vec::new(),
            ));
        }

        let name_taken = !session.record_name(parent_key, name);
        if rules.unique_names && name_taken {
            found.push((
                ViolationCode::DuplicateName,
                format!("name '{name}' is repeated under the same parent"),
                vec![("parent", parent_key.to_string())],
            ));
        }

        if found.is_empty() {
            return Vec::new();
        }

        let resolver = ConflictResolver::new(&self.strategy, rules, &self.allowed);
        let mut violations = Vec::with_capacity(found.len());
        for (code, message, details) in found {
            let mode = self.strategy.mode_for(code);
            let mut violation = Violation::new(mode.severity(), code, path.as_str(), message)
                .with_detail("mode", mode.name())
                .with_detail("line", node.line);
            for (key, value) in details {
                violation = violation.with_detail(key, value);
            }

            if code.is_repairable() {
                let is_taken = |candidate: &str| {
                    session.contains_path(candidate) || {
                        let (parent, leaf) = split_path(candidate);
                        session.contains_name(parent.unwrap_or(""), leaf)
                    }
                };
                violation.resolved_path = resolver.resolve(code, &path, name, &is_taken);
                if mode.rewrites_path() && violation.resolved_path.as_deref() == Some(path.as_str())
                {
                    warn!(path = %path, code = %code, mode = mode.name(), "conflict left unresolved");
                    violation = violation.with_detail("unresolved", "true");
                }
            }
            violations.push(violation);
        }

        for resolved in violations.iter().filter_map(|v| v.resolved_path.as_deref()) {
            if resolved != path {
                session.record_path(resolved);
                let (parent, leaf) = split_path(resolved);
                session.record_name(parent.unwrap_or(""), leaf);
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use treeforge_core::{NodeKind, ResolutionMode, Severity};

    use super::*;

    fn validator(rules: ValidationRules, strategy: ConflictStrategy) -> PathValidator {
        PathValidator::new(rules, strategy).unwrap()
    }

    fn codes(violations: &[Violation]) -> Vec<ViolationCode> {
        violations.iter().map(|v| v.code).collect()
    }

    #[test]
    fn test_clean_node() {
        let v = validator(ValidationRules::default(), ConflictStrategy::default());
        let mut session = ValidationSession::new();
        let node = Node::root("project", NodeKind::Directory, 1);
        assert!(v.validate(&node, None, &mut session).is_empty());
        assert!(session.contains_path("project"));
    }

    #[test]
    fn test_checks_do_not_short_circuit() {
        let rules = ValidationRules::builder()
            .max_name_length(3usize)
            .allow_spaces(false)
            .build()
            .unwrap();
        let v = validator(rules, ConflictStrategy::default());
        let mut session = ValidationSession::new();
        let node = Node::child_of("root", "my file#.txt", NodeKind::File, 2);

        let found = v.validate(&node, Some("root"), &mut session);
        assert_eq!(
            codes(&found),
            vec![
                ViolationCode::LongName,
                ViolationCode::InvalidChars,
                ViolationCode::SpacesInPath,
            ]
        );
    }

    #[test]
    fn test_check_order_and_details() {
        let rules = ValidationRules::builder()
            .max_path_length(5usize)
            .max_depth(1usize)
            .enforce_case(treeforge_core::CaseStyle::Lower)
            .build()
            .unwrap();
        let v = validator(rules, ConflictStrategy::default());
        let mut session = ValidationSession::new();
        let node = Node::child_of("root", "Con", NodeKind::Directory, 7);

        let found = v.validate(&node, Some("root"), &mut session);
        assert_eq!(
            codes(&found),
            vec![
                ViolationCode::LongPath,
                ViolationCode::MaxDepth,
                ViolationCode::ReservedName,
                ViolationCode::WrongCase,
            ]
        );
        let long = &found[0];
        assert_eq!(long.details.get("length").map(String::as_str), Some("8"));
        assert_eq!(long.details.get("line").map(String::as_str), Some("7"));
        assert_eq!(long.details.get("mode").map(String::as_str), Some("truncate"));
        assert!(found[1].resolved_path.is_none());
    }

    #[test]
    fn test_dots_only_checked_on_directories() {
        let rules = ValidationRules::builder().allow_dots(false).build().unwrap();
        let v = validator(rules, ConflictStrategy::default());
        let mut session = ValidationSession::new();

        let dir = Node::child_of("root", "v1.2", NodeKind::Directory, 2);
        let file = Node::child_of("root", "a.txt", NodeKind::File, 3);
        assert_eq!(
            codes(&v.validate(&dir, Some("root"), &mut session)),
            vec![ViolationCode::DotsInDir]
        );
        assert!(v.validate(&file, Some("root"), &mut session).is_empty());
    }

    #[test]
    fn test_extension_checks_only_on_files() {
        let rules = ValidationRules::builder()
            .require_extensions(true)
            .allowed_extensions(vec!["rs".to_string()])
            .build()
            .unwrap();
        let v = validator(rules, ConflictStrategy::default());
        let mut session = ValidationSession::new();

        let missing = Node::child_of("src", ".env", NodeKind::File, 2);
        let wrong = Node::child_of("src", "main.PY", NodeKind::File, 3);
        let ok = Node::child_of("src", "lib.RS", NodeKind::File, 4);
        let dir = Node::child_of("src", "bin", NodeKind::Directory, 5);

        assert_eq!(
            codes(&v.validate(&missing, Some("src"), &mut session)),
            vec![ViolationCode::MissingExtension]
        );
        assert_eq!(
            codes(&v.validate(&wrong, Some("src"), &mut session)),
            vec![ViolationCode::InvalidExtension]
        );
        assert!(v.validate(&ok, Some("src"), &mut session).is_empty());
        assert!(v.validate(&dir, Some("src"), &mut session).is_empty());
    }

    #[test]
    fn test_duplicates_chain_numbered_resolutions() {
        let v = validator(ValidationRules::default(), ConflictStrategy::default());
        let mut session = ValidationSession::new();
        let node = Node::child_of("root", "folder", NodeKind::Directory, 2);

        assert!(v.validate(&node, Some("root"), &mut session).is_empty());
        let second = v.validate(&node, Some("root"), &mut session);
        let third = v.validate(&node, Some("root"), &mut session);

        assert_eq!(
            codes(&second),
            vec![ViolationCode::DuplicatePath, ViolationCode::DuplicateName]
        );
        assert_eq!(second[0].resolved_path.as_deref(), Some("root/folder-001"));
        assert_eq!(second[1].resolved_path.as_deref(), Some("root/folder-001"));
        assert_eq!(third[0].resolved_path.as_deref(), Some("root/folder-002"));
    }

    #[test]
    fn test_warn_mode_and_disabled_rules() {
        let rules = ValidationRules::builder().unique_names(false).build().unwrap();
        let strategy = ConflictStrategy::builder()
            .on_duplicate_path(ResolutionMode::Warn)
            .build()
            .unwrap();
        let v = validator(rules, strategy);
        let mut session = ValidationSession::new();
        let node = Node::root("dup", NodeKind::Directory, 1);

        v.validate(&node, None, &mut session);
        let found = v.validate(&node, None, &mut session);
        assert_eq!(codes(&found), vec![ViolationCode::DuplicatePath]);
        assert_eq!(found[0].severity, Severity::Warning);
        assert!(found[0].resolved_path.is_none());
    }

    #[test]
    fn test_unresolved_truncate_is_tagged() {
        let rules = ValidationRules::builder().max_path_length(6usize).build().unwrap();
        let v = validator(rules, ConflictStrategy::default());
        let mut session = ValidationSession::new();
        let node = Node::child_of("folder", "a.txt", NodeKind::File, 2);

        let found = v.validate(&node, Some("folder"), &mut session);
        assert_eq!(codes(&found), vec![ViolationCode::LongPath]);
        assert_eq!(found[0].resolved_path.as_deref(), Some("folder/a.txt"));
        assert_eq!(found[0].details.get("unresolved").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_unanchored_pattern_matches_whole_name() {
        let rules = ValidationRules::builder().allowed_chars("[a-z]+").build().unwrap();
        let v = validator(rules, ConflictStrategy::default());
        let mut session = ValidationSession::new();

        let bad = Node::child_of("root", "abc$def", NodeKind::Directory, 2);
        let found = v.validate(&bad, Some("root"), &mut session);
        assert_eq!(codes(&found), vec![ViolationCode::InvalidChars]);
        assert_eq!(found[0].resolved_path.as_deref(), Some("root/abc_def"));

        let good = Node::child_of("root", "abcdef", NodeKind::Directory, 3);
        assert!(v.validate(&good, Some("root"), &mut session).is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let rules = ValidationRules::builder().allowed_chars("[unclosed").build().unwrap();
        let err = PathValidator::new(rules, ConflictStrategy::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_report_helpers() {
        let v = validator(
            ValidationRules::default(),
            ConflictStrategy::builder()
                .on_duplicate_name(ResolutionMode::Warn)
                .build()
                .unwrap(),
        );
        let mut root = Node::root("root", NodeKind::Directory, 1);
        root.push_child(Node::child_of("root", "a", NodeKind::Directory, 2));
        root.push_child(Node::child_of("root", "a", NodeKind::Directory, 3));
        let report = v.validate_forest(&Forest::new(vec![root]));

        assert_eq!(report.nodes_checked, 3);
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.warnings().count(), 1);
        assert!(report.has_errors());
        assert!(!report.is_clean());
        assert_eq!(report.by_code().len(), 2);
    }
}
