//! Path rule violations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Severity of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Advisory only.
    Warning,
    /// Gating failure.
    Error,
}

/// Rule that a path failed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ViolationCode {
    LongPath,
    MaxDepth,
    LongName,
    InvalidChars,
    ReservedName,
    WrongCase,
    DotsInDir,
    SpacesInPath,
    MissingExtension,
    InvalidExtension,
    DuplicatePath,
    DuplicateName,
}

impl ViolationCode {
    /// Whether the conflict resolver can suggest a replacement path.
    pub fn is_repairable(&self) -> bool {
        matches!(
            self,
            Self::DuplicatePath | Self::DuplicateName | Self::InvalidChars | Self::LongPath
        )
    }
}

/// A failure of one path against one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Error or warning, driven by the configured resolution mode.
    pub severity: Severity,
    /// Which rule failed.
    pub code: ViolationCode,
    /// Normalized path of the offending node.
    pub path: String,
    /// Human-readable explanation.
    pub message: String,
    /// Free-form context.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub details: IndexMap<String, String>,
    /// Suggested replacement path, if the rule is repairable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_path: Option<String>,
}

impl Violation {
    /// Create a violation without details.
    pub fn new(
        severity: Severity,
        code: ViolationCode,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code,
            path: path.into(),
            message: message.into(),
            details: IndexMap::new(),
            resolved_path: None,
        }
    }

    /// Add a detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.details.insert(key.into(), value.to_string());
        self
    }

    /// Check if this violation is gating.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
