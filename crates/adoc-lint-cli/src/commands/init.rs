//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const RULE_FILE_NAME: &str = "adoc-lint.toml";

const STARTER_RULES: &str = r#"# adoc-lint rule file
#
# Severities: "error", "warn", "info". A field without a severity inherits
# the severity of its block or section, and finally "error".

[settings]
# Source lines shown before and after each finding
context-lines = 2
# Lowest severity that makes `adoc-lint check` exit with status 1
fail-on = "error"
# Glob patterns of document trees to skip
exclude = ["**/drafts/**"]

[[metadata]]
name = "author"
required = true
min-length = 3

[[sections]]
name = "title"
level = 0
occurrence = { min = 1, max = 1 }

  [[sections.subsections]]
  name = "introduction"
  level = 1
  order = 1
  title = { pattern = "^Introduction$" }

  [[sections.subsections]]
  name = "usage"
  level = 1
  order = 2

    [[sections.subsections.blocks]]
    kind = "listing"
    severity = "warn"
    language = { required = true, allowed = ["rust", "shell"] }
"#;

/// Runs the init command.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let rule_file = dir.join(RULE_FILE_NAME);

    if rule_file.exists() && !force {
        bail!(
            "Rule file already exists at {}. Use --force to overwrite.",
            rule_file.display()
        );
    }

    std::fs::write(&rule_file, STARTER_RULES)
        .with_context(|| format!("Failed to write {}", rule_file.display()))?;

    println!("Created {RULE_FILE_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {RULE_FILE_NAME} to describe your documents");
    println!("  2. Run: adoc-lint check <document-tree.json>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use adoc_lint_core::RulesConfig;
    use tempfile::TempDir;

    #[test]
    fn starter_rules_are_valid() {
        let config = RulesConfig::parse(STARTER_RULES).unwrap();
        assert_eq!(config.model().metadata().len(), 1);
        assert_eq!(config.settings().exclude, vec!["**/drafts/**".to_string()]);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(RULE_FILE_NAME), "# mine").unwrap();

        assert!(run(tmp.path(), false).is_err());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(RULE_FILE_NAME)).unwrap(),
            "# mine"
        );

        run(tmp.path(), true).unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(RULE_FILE_NAME)).unwrap(),
            STARTER_RULES
        );
    }
}
