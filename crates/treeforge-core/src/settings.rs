//! Bundled configuration loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ParseConfig, ValidationRules};
use crate::error::ConfigError;
use crate::strategy::ConflictStrategy;

/// Everything one parse-and-validate run needs.
///
/// ```toml
/// [parse]
/// indent_size = 4
///
/// [rules]
/// allow_spaces = false
///
/// [strategy]
/// on_duplicate_path = "numbered"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Parser options.
    pub parse: ParseConfig,
    /// Path rules.
    pub rules: ValidationRules,
    /// Conflict handling.
    pub strategy: ConflictStrategy,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply the range checks the builders enforce to deserialized values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parse.indent_size == Some(0) {
            return Err(ConfigError::invalid("parse.indent_size must be at least 1"));
        }
        if self.parse.tab_size == 0 {
            return Err(ConfigError::invalid("parse.tab_size must be at least 1"));
        }
        if self.rules.max_path_length == 0 {
            return Err(ConfigError::invalid("rules.max_path_length must be at least 1"));
        }
        if self.rules.max_name_length == 0 {
            return Err(ConfigError::invalid("rules.max_name_length must be at least 1"));
        }
        if self.rules.allowed_chars.is_empty() {
            return Err(ConfigError::invalid("rules.allowed_chars cannot be empty"));
        }
        if self.strategy.max_attempts == 0 {
            return Err(ConfigError::invalid("strategy.max_attempts must be at least 1"));
        }
        Ok(())
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CaseStyle;
    use crate::strategy::{HashAlgorithm, ResolutionMode};

    #[test]
    fn test_empty_settings_are_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.parse, ParseConfig::default());
        assert_eq!(settings.rules, ValidationRules::default());
    }

    #[test]
    fn test_partial_settings() {
        let settings = Settings::from_toml_str(
            r#"
            [parse]
            indent_size = 4
            detect_guides = false

            [rules]
            enforce_case = "lower"
            allowed_extensions = ["rs", "toml"]

            [strategy]
            on_duplicate_path = "timestamp"
            on_spaces_in_path = "warn"
            hash_algorithm = "blake3"
            replacement_char = "-"

            [strategy.transliteration_map]
            "é" = "e"
            "#,
        )
        .unwrap();

        assert_eq!(settings.parse.indent_size, Some(4));
        assert!(!settings.parse.detect_guides);
        assert_eq!(settings.rules.enforce_case, CaseStyle::Lower);
        assert_eq!(settings.rules.allowed_extensions.len(), 2);
        assert!(settings.rules.unique_paths);
        assert!(matches!(
            settings.strategy.on_duplicate_path,
            ResolutionMode::Timestamp
        ));
        assert!(matches!(settings.strategy.on_spaces_in_path, ResolutionMode::Warn));
        assert_eq!(settings.strategy.hash_algorithm, HashAlgorithm::Blake3);
        assert_eq!(settings.strategy.replacement_char, '-');
        assert_eq!(settings.strategy.transliteration_map.len(), 1);
    }

    #[test]
    fn test_malformed_settings() {
        let err = Settings::from_toml_str("[rules]\nmax_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_out_of_range_settings() {
        let err = Settings::from_toml_str("[rules]\nmax_path_length = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("max_path_length"));

        let err = Settings::from_toml_str("[parse]\nindent_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("treeforge.toml");
        std::fs::write(&path, "[rules]\nmax_depth = 3\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.rules.max_depth, 3);

        let missing = Settings::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
