//! Rule file resolution with global fallback.
//!
//! The first hit wins:
//!
//! 1. `--config` flag (explicit path, trusted as-is)
//! 2. `adoc-lint.toml`, then `.adoc-lint.toml`, in the working directory
//! 3. `config.toml` in the global directory
//!    (`$ADOC_LINT_CONFIG_DIR`, else `~/.adoc-lint/`)
//! 4. The built-in empty rule set

use adoc_lint_core::RulesConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Rule file names looked up in the working directory, in order.
const LOCAL_RULE_FILES: &[&str] = &["adoc-lint.toml", ".adoc-lint.toml"];

/// Rule file name inside the global directory.
const GLOBAL_RULE_FILE: &str = "config.toml";

/// Environment variable overriding the global directory.
const GLOBAL_DIR_ENV: &str = "ADOC_LINT_CONFIG_DIR";

/// Where the rule file was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the working directory.
    Local(PathBuf),
    /// Found in the global directory.
    Global(PathBuf),
    /// Nothing found.
    Builtin,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Local(p) | Self::Global(p) => Some(p),
            Self::Builtin => None,
        }
    }

    /// Loads the rule file, or the empty rule set for [`ConfigSource::Builtin`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its rules are invalid.
    pub fn load(&self) -> Result<RulesConfig> {
        let Some(path) = self.path() else {
            tracing::info!("No rule file found, only structural defaults apply");
            return Ok(RulesConfig::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global rule file: {}", path.display());
        }
        RulesConfig::from_file(path)
            .with_context(|| format!("Failed to load rule file: {}", path.display()))
    }
}

/// Resolves the rule file for a working directory.
#[must_use]
pub fn resolve(work_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(work_dir, explicit, global_dir())
}

fn resolve_with(work_dir: &Path, explicit: Option<&Path>, global: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(local) = LOCAL_RULE_FILES
        .iter()
        .map(|name| work_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found rule file: {}", local.display());
        return ConfigSource::Local(local);
    }

    match global.map(|dir| dir.join(GLOBAL_RULE_FILE)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global rule file: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Builtin,
    }
}

/// The global rule directory.
fn global_dir() -> Option<PathBuf> {
    std::env::var_os(GLOBAL_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".adoc-lint")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_wins_without_existence_check() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("adoc-lint.toml"), "").unwrap();

        let result = resolve_with(tmp.path(), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".adoc-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_with(tmp.path(), None, None),
            ConfigSource::Local(tmp.path().join(".adoc-lint.toml"))
        );

        fs::write(tmp.path().join("adoc-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_with(tmp.path(), None, None),
            ConfigSource::Local(tmp.path().join("adoc-lint.toml"))
        );
    }

    #[test]
    fn global_only_when_no_local_file() {
        let work = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_with(work.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Global(global.path().join("config.toml")));

        fs::write(work.path().join("adoc-lint.toml"), "").unwrap();
        let result = resolve_with(work.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(result, ConfigSource::Local(_)));
    }

    #[test]
    fn empty_global_dir_falls_back_to_builtin() {
        let work = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolve_with(work.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Builtin);
        assert!(result.path().is_none());
    }

    #[test]
    fn builtin_loads_empty_rule_set() {
        let config = ConfigSource::Builtin.load().unwrap();
        assert!(config.model().is_empty());
    }

    #[test]
    fn invalid_rule_file_names_the_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("adoc-lint.toml");
        fs::write(&path, "[settings]\nfail-on = \"loud\"\n").unwrap();

        let err = ConfigSource::Local(path.clone()).load().unwrap_err();
        assert!(err.to_string().contains(&path.display().to_string()));
        assert!(format!("{err:#}").contains("unknown severity `loud`"));
    }
}
