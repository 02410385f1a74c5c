//! Rule files driven by TOML configuration.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! dto types
//!   ↓ validate + convert (loader)
//! RuleModel (pure domain model) + Settings
//! ```

use crate::model::RuleModel;
use crate::types::Severity;
use std::path::{Path, PathBuf};

pub mod dto;
pub mod loader;

pub use loader::LoadError;

/// Default number of context lines around a finding.
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// Reporter and CLI settings from the `[settings]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Context lines shown before and after each finding.
    pub context_lines: usize,
    /// Lowest severity that fails a run.
    pub fail_on: Severity,
    /// Glob patterns of inputs to skip.
    pub exclude: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            fail_on: Severity::Error,
            exclude: Vec::new(),
        }
    }
}

/// A loaded rule file: the validated model plus its settings.
#[derive(Debug, Clone, Default)]
pub struct RulesConfig {
    model: RuleModel,
    settings: Settings,
}

impl RulesConfig {
    /// Creates a config from its parts.
    #[must_use]
    pub fn new(model: RuleModel, settings: Settings) -> Self {
        Self { model, settings }
    }

    /// Loads a rule file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates rule file content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or the rules are inconsistent.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let dto: dto::RulesConfigDto = toml::from_str(content)?;
        let (model, settings) = loader::load(dto)?;
        Ok(Self { model, settings })
    }

    /// Returns the rule model.
    #[must_use]
    pub fn model(&self) -> &RuleModel {
        &self.model
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Splits into model and settings.
    #[must_use]
    pub fn into_parts(self) -> (RuleModel, Settings) {
        (self.model, self.settings)
    }
}

/// Fatal configuration errors, raised before any validation runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the rule file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Rule validation failed.
    #[error("{0}")]
    Load(#[from] LoadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_gives_defaults() {
        let config = RulesConfig::parse("").unwrap();
        assert!(config.model().is_empty());
        assert_eq!(config.settings(), &Settings::default());
    }

    #[test]
    fn toml_syntax_error() {
        let err = RulesConfig::parse("[[metadata]\nname=").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn load_error_is_wrapped() {
        let err = RulesConfig::parse("[settings]\nfail-on = \"loud\"").unwrap_err();
        assert!(matches!(err, ConfigError::Load(LoadError::UnknownSeverity { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RulesConfig::from_file(Path::new("/nonexistent/adoc-lint.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
