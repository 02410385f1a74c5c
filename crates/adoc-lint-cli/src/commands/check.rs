//! Check command implementation.

use adoc_lint_core::{Document, Severity, Validator};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line options of `check`.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Document tree files or directories.
    pub inputs: Vec<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Context lines; the rule file's setting when `None`.
    pub context: Option<usize>,
    /// Failure threshold; the rule file's setting when `None`.
    pub fail_on: Option<Severity>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
}

/// Runs the check command.
///
/// Returns `true` when findings reach the failure threshold.
pub fn run(options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let (model, settings) = source.load()?.into_parts();

    let exclude = compile_excludes(settings.exclude.iter().chain(&options.exclude))?;
    let files = discover_documents(&options.inputs, &exclude)?;
    tracing::info!("Checking {} document tree(s)", files.len());

    let documents = files
        .iter()
        .map(|path| load_document(path))
        .collect::<Result<Vec<_>>>()?;

    let validator = Validator::new(Arc::new(model));
    let result = validator.validate_all(&documents);

    let context_lines = options.context.unwrap_or(settings.context_lines);
    super::output::print(&result, &documents, options.format, context_lines)?;

    let fail_on = options.fail_on.unwrap_or(settings.fail_on);
    Ok(result.has_messages_at(fail_on))
}

fn compile_excludes<'a, I>(patterns: I) -> Result<Vec<glob::Pattern>>
where
    I: IntoIterator<Item = &'a String>,
{
    patterns
        .into_iter()
        .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern: {p}")))
        .collect()
}

fn is_excluded(path: &Path, exclude: &[glob::Pattern]) -> bool {
    exclude.iter().any(|pattern| pattern.matches_path(path))
}

/// Expands inputs into the document tree files to check, sorted.
fn discover_documents(inputs: &[PathBuf], exclude: &[glob::Pattern]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            if !is_excluded(input, exclude) {
                files.push(input.clone());
            }
            continue;
        }

        let mut builder = ignore::WalkBuilder::new(input);
        builder.hidden(false).git_ignore(true);

        for entry in builder.build() {
            let entry = entry.with_context(|| format!("Failed to walk {}", input.display()))?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if is_excluded(path, exclude) {
                tracing::debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Reads a document tree, pulling in its source file when the tree omits it.
fn load_document(path: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = Document::from_json(&json)
        .with_context(|| format!("Invalid document tree: {}", path.display()))?;
    if !document.source.is_empty() {
        return Ok(document);
    }

    let source_path = path
        .parent()
        .map_or_else(|| document.file.clone(), |dir| dir.join(&document.file));
    match std::fs::read_to_string(&source_path) {
        Ok(source) => Ok(document.with_source(&source)),
        Err(e) => {
            tracing::warn!(
                "No source for {}: {e}; findings are reported without context",
                source_path.display()
            );
            Ok(document)
        }
    }
}
