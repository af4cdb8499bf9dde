//! Conflict resolution strategy configuration.

use std::fmt;
use std::sync::Arc;

use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::violation::{Severity, ViolationCode};

/// Default rename pattern; `{name}` is the base name, `{n}` the counter.
pub const DEFAULT_RENAME_PATTERN: &str = "{name}-{n}";

/// Default substitute for characters outside the allowed pattern.
pub const DEFAULT_REPLACEMENT_CHAR: char = '_';

/// First counter value tried by numbered renames.
pub const DEFAULT_COUNTER_START: u32 = 1;

/// Zero-padding width of the numbered rename counter.
pub const DEFAULT_COUNTER_PADDING: usize = 3;

/// Maximum candidates tried by numbered renames.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Number of hex characters kept from a digest.
pub const HASH_PREFIX_LEN: usize = 8;

/// Latin transliterations used when no map is configured.
pub const DEFAULT_TRANSLITERATIONS: &[(&str, &str)] = &[
    ("à", "a"),
    ("á", "a"),
    ("â", "a"),
    ("ã", "a"),
    ("ä", "a"),
    ("å", "a"),
    ("æ", "ae"),
    ("ç", "c"),
    ("è", "e"),
    ("é", "e"),
    ("ê", "e"),
    ("ë", "e"),
    ("ì", "i"),
    ("í", "i"),
    ("î", "i"),
    ("ï", "i"),
    ("ñ", "n"),
    ("ò", "o"),
    ("ó", "o"),
    ("ô", "o"),
    ("õ", "o"),
    ("ö", "o"),
    ("ø", "o"),
    ("ù", "u"),
    ("ú", "u"),
    ("û", "u"),
    ("ü", "u"),
    ("ý", "y"),
    ("ÿ", "y"),
    ("ß", "ss"),
    ("À", "A"),
    ("Á", "A"),
    ("Ä", "A"),
    ("Ç", "C"),
    ("É", "E"),
    ("È", "E"),
    ("Ñ", "N"),
    ("Ö", "O"),
    ("Ü", "U"),
];

/// Digest used by the hash strategy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256.
    #[default]
    Sha256,
    /// SHA-1.
    Sha1,
    /// BLAKE3.
    Blake3,
}

/// Input handed to a custom resolver.
pub struct ResolveRequest<'a> {
    /// Category being resolved.
    pub code: ViolationCode,
    /// Normalized path of the offending node.
    pub path: &'a str,
    /// Name of the offending node.
    pub name: &'a str,
    /// Whether a candidate path is already claimed in the current session.
    pub is_taken: &'a dyn Fn(&str) -> bool,
}

type ResolverFn = dyn Fn(&ResolveRequest<'_>) -> Option<String> + Send + Sync;

/// Caller-supplied resolution function.
#[derive(Clone)]
pub struct CustomResolver {
    name: String,
    func: Arc<ResolverFn>,
}

impl CustomResolver {
    /// Wrap a closure under a descriptive name.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&ResolveRequest<'_>) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the resolver.
    pub fn resolve(&self, request: &ResolveRequest<'_>) -> Option<String> {
        (self.func)(request)
    }
}

impl fmt::Debug for CustomResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomResolver")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// How a violation category is handled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionMode {
    /// Report as an error, no suggestion.
    #[default]
    Error,
    /// Report as a warning, no suggestion.
    Warn,
    /// Drop the offending entry.
    Skip,
    /// Fold a duplicate directory into the first occurrence.
    Merge,
    /// Let the later entry replace the earlier one.
    Overwrite,
    /// Rename with a counter, e.g. `folder-001`.
    Numbered,
    /// Rename with a wall-clock timestamp.
    Timestamp,
    /// Replace disallowed characters.
    Replace,
    /// Delete disallowed characters.
    Strip,
    /// Percent-encode the path.
    Encode,
    /// Map characters through the transliteration table.
    Transliterate,
    /// Cut the base name down to the length limit.
    Truncate,
    /// Replace the base name with a digest prefix.
    Hash,
    /// Abbreviate directory segments, then truncate.
    Shorten,
    /// Caller-supplied function.
    #[serde(skip)]
    Custom(CustomResolver),
}

impl ResolutionMode {
    /// Severity a violation handled by this mode is reported with.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Warn => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether this mode computes a different path on success.
    pub fn rewrites_path(&self) -> bool {
        !matches!(
            self,
            Self::Error | Self::Warn | Self::Skip | Self::Merge | Self::Overwrite
        )
    }

    /// Short mode name used in reports.
    pub fn name(&self) -> &str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Skip => "skip",
            Self::Merge => "merge",
            Self::Overwrite => "overwrite",
            Self::Numbered => "numbered",
            Self::Timestamp => "timestamp",
            Self::Replace => "replace",
            Self::Strip => "strip",
            Self::Encode => "encode",
            Self::Transliterate => "transliterate",
            Self::Truncate => "truncate",
            Self::Hash => "hash",
            Self::Shorten => "shorten",
            Self::Custom(resolver) => resolver.name(),
        }
    }
}

/// Resolution mode per violation category, plus mode parameters.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(default)]
pub struct ConflictStrategy {
    #[builder(default = "ResolutionMode::Truncate")]
    pub on_long_path: ResolutionMode,
    #[builder(default)]
    pub on_max_depth: ResolutionMode,
    #[builder(default)]
    pub on_long_name: ResolutionMode,
    #[builder(default = "ResolutionMode::Replace")]
    pub on_invalid_chars: ResolutionMode,
    #[builder(default)]
    pub on_reserved_name: ResolutionMode,
    #[builder(default)]
    pub on_wrong_case: ResolutionMode,
    #[builder(default)]
    pub on_dots_in_dir: ResolutionMode,
    #[builder(default)]
    pub on_spaces_in_path: ResolutionMode,
    #[builder(default)]
    pub on_missing_extension: ResolutionMode,
    #[builder(default)]
    pub on_invalid_extension: ResolutionMode,
    #[builder(default = "ResolutionMode::Numbered")]
    pub on_duplicate_path: ResolutionMode,
    #[builder(default = "ResolutionMode::Numbered")]
    pub on_duplicate_name: ResolutionMode,

    /// Pattern for numbered renames.
    #[builder(default = "DEFAULT_RENAME_PATTERN.to_string()")]
    pub rename_pattern: String,

    /// Substitute for disallowed characters.
    #[builder(default = "DEFAULT_REPLACEMENT_CHAR")]
    pub replacement_char: char,

    /// First counter value.
    #[builder(default = "DEFAULT_COUNTER_START")]
    pub counter_start: u32,

    /// Counter zero-padding width.
    #[builder(default = "DEFAULT_COUNTER_PADDING")]
    pub counter_padding: usize,

    /// Digest for the hash strategy.
    #[builder(default)]
    pub hash_algorithm: HashAlgorithm,

    /// Character substitutions for the transliterate strategy.
    #[builder(default = "default_transliterations()")]
    pub transliteration_map: IndexMap<String, String>,

    /// Keep the file extension when renaming.
    #[builder(default = "true")]
    pub preserve_extension: bool,

    /// Maximum candidates tried by numbered renames.
    #[builder(default = "DEFAULT_MAX_ATTEMPTS")]
    pub max_attempts: u32,
}

fn default_transliterations() -> IndexMap<String, String> {
    DEFAULT_TRANSLITERATIONS
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

impl ConflictStrategy {
    /// Create a new strategy builder.
    pub fn builder() -> ConflictStrategyBuilder {
        ConflictStrategyBuilder::default()
    }

    /// Mode configured for a violation category.
    pub fn mode_for(&self, code: ViolationCode) -> &ResolutionMode {
        match code {
            ViolationCode::LongPath => &self.on_long_path,
            ViolationCode::MaxDepth => &self.on_max_depth,
            ViolationCode::LongName => &self.on_long_name,
            ViolationCode::InvalidChars => &self.on_invalid_chars,
            ViolationCode::ReservedName => &self.on_reserved_name,
            ViolationCode::WrongCase => &self.on_wrong_case,
            ViolationCode::DotsInDir => &self.on_dots_in_dir,
            ViolationCode::SpacesInPath => &self.on_spaces_in_path,
            ViolationCode::MissingExtension => &self.on_missing_extension,
            ViolationCode::InvalidExtension => &self.on_invalid_extension,
            ViolationCode::DuplicatePath => &self.on_duplicate_path,
            ViolationCode::DuplicateName => &self.on_duplicate_name,
        }
    }

    /// Severity reported for a violation category.
    pub fn severity_for(&self, code: ViolationCode) -> Severity {
        self.mode_for(code).severity()
    }
}

impl Default for ConflictStrategy {
    fn default() -> Self {
        Self {
            on_long_path: ResolutionMode::Truncate,
            on_max_depth: ResolutionMode::Error,
            on_long_name: ResolutionMode::Error,
            on_invalid_chars: ResolutionMode::Replace,
            on_reserved_name: ResolutionMode::Error,
            on_wrong_case: ResolutionMode::Error,
            on_dots_in_dir: ResolutionMode::Error,
            on_spaces_in_path: ResolutionMode::Error,
            on_missing_extension: ResolutionMode::Error,
            on_invalid_extension: ResolutionMode::Error,
            on_duplicate_path: ResolutionMode::Numbered,
            on_duplicate_name: ResolutionMode::Numbered,
            rename_pattern: DEFAULT_RENAME_PATTERN.to_string(),
            replacement_char: DEFAULT_REPLACEMENT_CHAR,
            counter_start: DEFAULT_COUNTER_START,
            counter_padding: DEFAULT_COUNTER_PADDING,
            hash_algorithm: HashAlgorithm::Sha256,
            transliteration_map: default_transliterations(),
            preserve_extension: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_modes() {
        let strategy = ConflictStrategy::default();
        assert!(matches!(
            strategy.mode_for(ViolationCode::DuplicatePath),
            ResolutionMode::Numbered
        ));
        assert!(matches!(
            strategy.mode_for(ViolationCode::ReservedName),
            ResolutionMode::Error
        ));
        assert_eq!(strategy.rename_pattern, "{name}-{n}");
        assert_eq!(strategy.transliteration_map.get("é").map(String::as_str), Some("e"));
    }

    #[test]
    fn test_warn_mode_severity() {
        let strategy = ConflictStrategy::builder()
            .on_spaces_in_path(ResolutionMode::Warn)
            .build()
            .unwrap();
        assert_eq!(strategy.severity_for(ViolationCode::SpacesInPath), Severity::Warning);
        assert_eq!(strategy.severity_for(ViolationCode::DuplicatePath), Severity::Error);
    }

    #[test]
    fn test_custom_resolver() {
        let resolver = CustomResolver::new("suffix", |req: &ResolveRequest<'_>| {
            Some(format!("{}-custom", req.path))
        });
        let taken = |_: &str| false;
        let request = ResolveRequest {
            code: ViolationCode::DuplicateName,
            path: "a/b",
            name: "b",
            is_taken: &taken,
        };
        assert_eq!(resolver.resolve(&request).as_deref(), Some("a/b-custom"));
        assert_eq!(ResolutionMode::Custom(resolver).name(), "suffix");
    }

    #[test]
    fn test_mode_rewrites_path() {
        assert!(ResolutionMode::Numbered.rewrites_path());
        assert!(!ResolutionMode::Merge.rewrites_path());
        assert!(!ResolutionMode::Warn.rewrites_path());
    }

    #[test]
    fn test_hash_algorithm_names() {
        assert_eq!(HashAlgorithm::Blake3.to_string(), "blake3");
        assert_eq!("sha1".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha1);
    }
}
