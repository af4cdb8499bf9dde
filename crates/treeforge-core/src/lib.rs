//! Core types and configuration for treeforge.
//!
//! This crate provides the data structures shared by the parser and the
//! validator: tree nodes and forests, parse and validation configuration,
//! conflict strategies, structural errors, and path violations.

mod config;
mod error;
mod node;
mod settings;
mod strategy;
mod tree;
mod violation;

pub use config::{
    ASCII_GUIDES, CaseStyle, DEFAULT_ALLOWED_CHARS, DEFAULT_INDENT_WIDTH, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_NAME_LENGTH, DEFAULT_MAX_PATH_LENGTH, DEFAULT_TAB_SIZE, ParseConfig,
    ParseConfigBuilder, RESERVED_CHARACTERS, TreeStyle, UNICODE_GUIDES, ValidationRules,
    ValidationRulesBuilder, WINDOWS_RESERVED_NAMES,
};
pub use error::{ConfigError, IssueKind, ParseWarning, StructuralError, StructuralIssue, WarningKind};
pub use node::{Node, NodeKind, PATH_SEPARATOR, join_path, split_path};
pub use settings::Settings;
pub use strategy::{
    ConflictStrategy, ConflictStrategyBuilder, CustomResolver, DEFAULT_COUNTER_PADDING,
    DEFAULT_COUNTER_START, DEFAULT_MAX_ATTEMPTS, DEFAULT_RENAME_PATTERN,
    DEFAULT_REPLACEMENT_CHAR, DEFAULT_TRANSLITERATIONS, HASH_PREFIX_LEN, HashAlgorithm,
    ResolutionMode, ResolveRequest,
};
pub use tree::{Forest, ForestStats};
pub use violation::{Severity, Violation, ViolationCode};
