//! Path normalization applied before rule checks.

use treeforge_core::{PATH_SEPARATOR, ValidationRules};

/// Normalize a node path according to the rule set.
///
/// - `normalize_slashes`: backslashes become `/` and empty segments vanish
/// - `trim_whitespace`: every segment is trimmed
/// - `resolve_relative`: `.` segments are dropped and `..` removes the
///   segment before it; a `..` with nothing before it is dropped
pub fn normalize_path(path: &str, rules: &ValidationRules) -> String {
    let unified;
    let source = if rules.normalize_slashes {
        unified = path.replace('\\', "/");
        unified.as_str()
    } else {
        path
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in source.split(PATH_SEPARATOR) {
        let segment = if rules.trim_whitespace {
            segment.trim()
        } else {
            segment
        };
        if rules.normalize_slashes && segment.is_empty() {
            continue;
        }
        if rules.resolve_relative {
            match segment {
                "." => continue,
                ".." => {
                    segments.pop();
                    continue;
                }
                _ => {}
            }
        }
        segments.push(segment);
    }

    segments.join("/")
}

/// Normalize a single name.
pub fn normalize_name<'a>(name: &'a str, rules: &ValidationRules) -> &'a str {
    if rules.trim_whitespace {
        name.trim()
    } else {
        name
    }
}
