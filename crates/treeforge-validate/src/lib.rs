//! Path validation and conflict resolution for treeforge.
//!
//! This crate checks the paths of a parsed [`Forest`] against a
//! [`ValidationRules`] set and suggests repairs for the violations a
//! [`ConflictStrategy`] marks as repairable:
//!
//! - **Normalization** - unify separators, trim segments, fold `.`/`..`
//! - **Rule checks** - length, depth, characters, reserved names, case,
//!   extensions and uniqueness, all evaluated for every node
//! - **Resolution** - numbered, timestamped, character-level, truncating,
//!   hashing and shortening repairs, or a caller-supplied function
//!
//! Duplicate tracking lives in a [`ValidationSession`] owned by one pass, so
//! independent forests can be validated on separate threads.
//!
//! # Example
//!
//! ```rust
//! use treeforge_validate::{ParseConfig, Settings, ViolationCode, check};
//!
//! let mut settings = Settings::default();
//! settings.parse = ParseConfig::builder().strict_duplicates(false).build().unwrap();
//!
//! let outcome = check("root/\n  folder/\n  folder/", &settings).unwrap();
//! let dup = &outcome.report.violations[0];
//!
//! assert_eq!(dup.code, ViolationCode::DuplicatePath);
//! assert_eq!(dup.resolved_path.as_deref(), Some("root/folder-001"));
//! ```

mod normalize;
mod resolver;
mod session;
mod validator;

pub use normalize::{normalize_name, normalize_path};
pub use resolver::{
    ConflictResolver, encode, hash, numbered, replace_chars, shorten, split_extension,
    strip_chars, timestamp, timestamp_at, transliterate, truncate,
};
pub use session::ValidationSession;
pub use validator::{PathValidator, ValidationReport};

// Re-export core and parser types for convenience
pub use treeforge_core::{
    ConfigError, ConflictStrategy, Forest, Node, ParseConfig, ResolutionMode, Settings,
    Severity, StructuralError, ValidationRules, Violation, ViolationCode,
};
pub use treeforge_parse::{ParseOutput, TreeParser};

use thiserror::Error;
use tracing::debug;

/// Errors that stop a check before any violation is reported.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result of parsing and validating tree text.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Parser output, including the forest and warnings.
    pub parse: ParseOutput,
    /// Path violations found in the forest.
    pub report: ValidationReport,
}

/// Parse `text` and validate the resulting forest.
///
/// Structural errors abort before path validation, so no violations are
/// reported for malformed input.
pub fn check(text: &str, settings: &Settings) -> Result<CheckOutcome, CheckError> {
    let validator = PathValidator::new(settings.rules.clone(), settings.strategy.clone())?;
    let parse = TreeParser::new(settings.parse.clone()).parse(text)?;
    let report = validator.validate_forest(&parse.forest);
    debug!(
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "check finished"
    );
    Ok(CheckOutcome { parse, report })
}
