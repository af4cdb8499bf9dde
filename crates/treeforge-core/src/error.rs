//! Error types for parsing and configuration.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of fatal structural defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// The first entry is indented or starts with a guide glyph.
    IndentedRoot,
    /// Depth increased by more than one level.
    DepthJump {
        /// Depth of the previous entry.
        previous: usize,
        /// Depth of this entry.
        depth: usize,
    },
    /// Name is empty after comment and guide stripping.
    EmptyName,
    /// Name contains a character reserved by common file systems.
    ReservedCharacter {
        /// The offending character.
        character: char,
    },
    /// Name is an absolute path.
    AbsolutePath,
    /// A comment block was opened and never closed.
    UnterminatedComment {
        /// Opening delimiter.
        delimiter: String,
    },
    /// Two entries resolve to the same path.
    DuplicatePath {
        /// The shared path.
        path: String,
        /// Line of the first occurrence.
        first_line: usize,
    },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndentedRoot => write!(f, "root entry must not be indented"),
            Self::DepthJump { previous, depth } => {
                write!(f, "depth jumps from {previous} to {depth}")
            }
            Self::EmptyName => write!(f, "entry has an empty name"),
            Self::ReservedCharacter { character } => {
                write!(f, "name contains reserved character '{character}'")
            }
            Self::AbsolutePath => write!(f, "name is an absolute path"),
            Self::UnterminatedComment { delimiter } => {
                write!(f, "comment block opened with '{delimiter}' is never closed")
            }
            Self::DuplicatePath { path, first_line } => {
                write!(f, "path '{path}' already declared on line {first_line}")
            }
        }
    }
}

/// A single offending source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralIssue {
    /// 1-based line number.
    pub line: usize,
    /// Original line text.
    pub text: String,
    /// What is wrong with it.
    pub kind: IssueKind,
}

impl StructuralIssue {
    /// Create a new issue.
    pub fn new(line: usize, text: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            line,
            text: text.into(),
            kind,
        }
    }
}

impl fmt::Display for StructuralIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.kind, self.text)
    }
}

/// Fatal parse failure, aggregating every offending line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralError {
    /// Offending lines in source order.
    pub issues: Vec<StructuralIssue>,
}

impl StructuralError {
    /// Create an error from collected issues.
    pub fn new(mut issues: Vec<StructuralIssue>) -> Self {
        issues.sort_by_key(|issue| issue.line);
        Self { issues }
    }

    /// Create an error with a single issue.
    pub fn single(issue: StructuralIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    /// Number of offending lines.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Check if there are no issues.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed tree ({} issue(s))", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StructuralError {}

/// Kind of non-fatal parse warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The forest has more than one root.
    MultipleRoots,
}

/// Non-fatal warning raised while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseWarning {
    /// 1-based line the warning refers to.
    pub line: usize,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ParseWarning {
    /// Create a multiple roots warning for the root on `line`.
    pub fn multiple_roots(line: usize, name: &str) -> Self {
        Self {
            line,
            message: format!("additional root '{name}'"),
            kind: WarningKind::MultipleRoots,
        }
    }
}

/// Errors raised while building or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A regex pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    /// Settings file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML.
    #[error("Malformed settings: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create an out-of-range error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
