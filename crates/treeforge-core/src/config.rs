//! Parse and validation configuration types.
//!
//! Platform defaults (reserved names, character patterns) live here as named
//! constants so that the parser and validator never embed fallbacks of their
//! own.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Column width of one depth level when nothing in the input is indented.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Columns a tab expands to when measuring indentation.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Default maximum number of path segments.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Default maximum path length, in characters (Windows `MAX_PATH`).
pub const DEFAULT_MAX_PATH_LENGTH: usize = 260;

/// Default maximum name length, in characters.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 255;

/// Default pattern every name must fully match.
pub const DEFAULT_ALLOWED_CHARS: &str = r"^[A-Za-z0-9._\-+@ ]+$";

/// Characters that no file system entry may contain.
pub const RESERVED_CHARACTERS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Device names reserved on Windows, matched case-insensitively.
pub const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Box-drawing glyphs used by Unicode tree renderers.
pub const UNICODE_GUIDES: &[char] = &[
    '│', '├', '└', '─', '┌', '┬', '┼', '┃', '┣', '┗', '━', '╰', '╭', '┊', '┆',
];

/// ASCII glyphs used by `tree --charset=ascii` style renderers.
pub const ASCII_GUIDES: &[char] = &['|', '+', '`', '-', '\\'];

/// Glyph set recognized as tree guides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeStyle {
    /// Both Unicode and ASCII guides.
    #[default]
    Auto,
    /// Unicode box-drawing guides only.
    Unicode,
    /// ASCII `| + \` -` guides only.
    Ascii,
    /// No guides, whitespace only.
    Plain,
}

impl TreeStyle {
    /// Check if `c` is a guide glyph in this style.
    pub fn is_guide(&self, c: char) -> bool {
        match self {
            Self::Auto => UNICODE_GUIDES.contains(&c) || ASCII_GUIDES.contains(&c),
            Self::Unicode => UNICODE_GUIDES.contains(&c),
            Self::Ascii => ASCII_GUIDES.contains(&c),
            Self::Plain => false,
        }
    }
}

/// Configuration for parsing tree text.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ParseConfig {
    /// Column width of one depth level (None = infer from the first
    /// indented line).
    #[builder(default)]
    #[serde(default)]
    pub indent_size: Option<usize>,

    /// Columns a tab expands to.
    #[builder(default = "DEFAULT_TAB_SIZE")]
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,

    /// Strip guide glyphs before measuring indentation.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub detect_guides: bool,

    /// Which glyphs count as guides.
    #[builder(default)]
    #[serde(default)]
    pub style: TreeStyle,

    /// Keep trailing comments as node hints.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub preserve_hints: bool,

    /// Treat duplicate raw paths as a fatal structural error.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub strict_duplicates: bool,
}

fn default_true() -> bool {
    true
}

fn default_tab_size() -> usize {
    DEFAULT_TAB_SIZE
}

impl ParseConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(0)) = self.indent_size {
            return Err("Indent size must be at least 1".to_string());
        }
        if let Some(0) = self.tab_size {
            return Err("Tab size must be at least 1".to_string());
        }
        Ok(())
    }
}

impl ParseConfig {
    /// Create a new parse config builder.
    pub fn builder() -> ParseConfigBuilder {
        ParseConfigBuilder::default()
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            indent_size: None,
            tab_size: DEFAULT_TAB_SIZE,
            detect_guides: true,
            style: TreeStyle::Auto,
            preserve_hints: true,
            strict_duplicates: true,
        }
    }
}

/// Required letter case for names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    /// No case requirement.
    #[default]
    Any,
    /// Names must be all lowercase.
    Lower,
    /// Names must be all uppercase.
    Upper,
}

impl CaseStyle {
    /// Check if `name` satisfies this case style.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Lower => name.to_lowercase() == name,
            Self::Upper => name.to_uppercase() == name,
        }
    }
}

/// Rule set evaluated against every node path.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct ValidationRules {
    /// Maximum number of path segments.
    #[builder(default = "DEFAULT_MAX_DEPTH")]
    pub max_depth: usize,

    /// Maximum path length in characters.
    #[builder(default = "DEFAULT_MAX_PATH_LENGTH")]
    pub max_path_length: usize,

    /// Maximum name length in characters.
    #[builder(default = "DEFAULT_MAX_NAME_LENGTH")]
    pub max_name_length: usize,

    /// Regex every name must fully match.
    #[builder(default = "DEFAULT_ALLOWED_CHARS.to_string()")]
    pub allowed_chars: String,

    /// Names rejected case-insensitively.
    #[builder(default = "default_disallowed_names()")]
    pub disallowed_names: Vec<String>,

    /// Required letter case.
    #[builder(default)]
    pub enforce_case: CaseStyle,

    /// Allow dots in directory names.
    #[builder(default = "true")]
    pub allow_dots: bool,

    /// Allow whitespace anywhere in a path.
    #[builder(default = "true")]
    pub allow_spaces: bool,

    /// Files must carry an extension.
    #[builder(default = "false")]
    pub require_extensions: bool,

    /// Accepted file extensions (empty = any).
    #[builder(default)]
    pub allowed_extensions: Vec<String>,

    /// Sibling names must be unique.
    #[builder(default = "true")]
    pub unique_names: bool,

    /// Paths must be unique across the forest.
    #[builder(default = "true")]
    pub unique_paths: bool,

    /// Convert `\` to `/` and collapse repeated separators.
    #[builder(default = "true")]
    pub normalize_slashes: bool,

    /// Trim whitespace around each segment.
    #[builder(default = "true")]
    pub trim_whitespace: bool,

    /// Fold `.` and `..` segments.
    #[builder(default = "false")]
    pub resolve_relative: bool,
}

fn default_disallowed_names() -> Vec<String> {
    WINDOWS_RESERVED_NAMES.iter().map(|s| s.to_string()).collect()
}

impl ValidationRulesBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.max_path_length {
            return Err("Maximum path length must be at least 1".to_string());
        }
        if let Some(0) = self.max_name_length {
            return Err("Maximum name length must be at least 1".to_string());
        }
        if let Some(ref pattern) = self.allowed_chars {
            if pattern.is_empty() {
                return Err("Allowed character pattern cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl ValidationRules {
    /// Create a new rules builder.
    pub fn builder() -> ValidationRulesBuilder {
        ValidationRulesBuilder::default()
    }

    /// Check if `name` is in the disallowed set, ignoring case.
    ///
    /// The part before the first dot is checked too, so `con.txt` is
    /// rejected alongside `CON`.
    pub fn is_disallowed(&self, name: &str) -> bool {
        let stem = name.split('.').next().unwrap_or(name);
        self.disallowed_names
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(name) || reserved.eq_ignore_ascii_case(stem))
    }

    /// Check if `extension` (without dot) is accepted.
    pub fn is_extension_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions.is_empty()
            || self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            allowed_chars: DEFAULT_ALLOWED_CHARS.to_string(),
            disallowed_names: default_disallowed_names(),
            enforce_case: CaseStyle::Any,
            allow_dots: true,
            allow_spaces: true,
            require_extensions: false,
            allowed_extensions: Vec::new(),
            unique_names: true,
            unique_paths: true,
            normalize_slashes: true,
            trim_whitespace: true,
            resolve_relative: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_builder() {
        let config = ParseConfig::builder()
            .indent_size(Some(4))
            .detect_guides(false)
            .style(TreeStyle::Plain)
            .build()
            .unwrap();

        assert_eq!(config.indent_size, Some(4));
        assert!(!config.detect_guides);
        assert_eq!(config.tab_size, DEFAULT_TAB_SIZE);
        assert!(config.strict_duplicates);
    }

    #[test]
    fn test_parse_config_rejects_zero_indent() {
        assert!(ParseConfig::builder().indent_size(Some(0)).build().is_err());
        assert!(ParseConfig::builder().tab_size(0usize).build().is_err());
    }

    #[test]
    fn test_tree_style_glyphs() {
        assert!(TreeStyle::Auto.is_guide('├'));
        assert!(TreeStyle::Auto.is_guide('|'));
        assert!(TreeStyle::Unicode.is_guide('└'));
        assert!(!TreeStyle::Unicode.is_guide('+'));
        assert!(TreeStyle::Ascii.is_guide('`'));
        assert!(!TreeStyle::Plain.is_guide('│'));
    }

    #[test]
    fn test_rules_builder_defaults() {
        let rules = ValidationRules::builder()
            .max_depth(4usize)
            .allow_spaces(false)
            .build()
            .unwrap();

        assert_eq!(rules.max_depth, 4);
        assert!(!rules.allow_spaces);
        assert_eq!(rules.max_path_length, DEFAULT_MAX_PATH_LENGTH);
        assert_eq!(rules.disallowed_names.len(), WINDOWS_RESERVED_NAMES.len());
    }

    #[test]
    fn test_rules_builder_rejects_empty_pattern() {
        assert!(ValidationRules::builder().allowed_chars("").build().is_err());
    }

    #[test]
    fn test_disallowed_names() {
        let rules = ValidationRules::default();
        assert!(rules.is_disallowed("con"));
        assert!(rules.is_disallowed("Nul.txt"));
        assert!(!rules.is_disallowed("console"));
    }

    #[test]
    fn test_extension_allow_list() {
        let rules = ValidationRules::builder()
            .allowed_extensions(vec![".rs".to_string(), "toml".to_string()])
            .build()
            .unwrap();
        assert!(rules.is_extension_allowed("RS"));
        assert!(rules.is_extension_allowed("toml"));
        assert!(!rules.is_extension_allowed("py"));
        assert!(ValidationRules::default().is_extension_allowed("anything"));
    }

    #[test]
    fn test_case_style() {
        assert!(CaseStyle::Lower.matches("src"));
        assert!(!CaseStyle::Lower.matches("Src"));
        assert!(CaseStyle::Upper.matches("README"));
        assert!(CaseStyle::Any.matches("MixedCase"));
    }
}
