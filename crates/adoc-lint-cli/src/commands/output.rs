//! Shared output formatting for validation results.

use adoc_lint_core::{render_fancy, ConsoleReporter, Document, ValidationResult};
use anyhow::{Context, Result};

use crate::OutputFormat;

/// Print validation results in the specified format.
pub fn print(
    result: &ValidationResult,
    documents: &[Document],
    format: OutputFormat,
    context_lines: usize,
) -> Result<()> {
    print!("{}", render(result, documents, format, context_lines)?);
    Ok(())
}

/// Renders validation results in the specified format.
pub fn render(
    result: &ValidationResult,
    documents: &[Document],
    format: OutputFormat,
    context_lines: usize,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(ConsoleReporter::new(context_lines).render(result, documents)),
        OutputFormat::Json => render_json(result),
        OutputFormat::Compact => Ok(render_compact(result)),
        OutputFormat::Fancy => {
            render_fancy(result, documents).context("Failed to render diagnostics")
        }
    }
}

fn render_json(result: &ValidationResult) -> Result<String> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    Ok(json)
}

fn render_compact(result: &ValidationResult) -> String {
    result
        .sorted_messages()
        .into_iter()
        .map(|message| format!("{}\n", message.format_compact()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adoc_lint_core::{Severity, SourceLocation, ValidationMessage, ValidationResultBuilder};

    fn result() -> ValidationResult {
        let mut builder = ValidationResultBuilder::new();
        builder.scanned("guide.adoc");
        builder.push(ValidationMessage::new(
            Severity::Warn,
            "section.title.pattern",
            "Section title does not match required pattern",
            SourceLocation::new("guide.adoc", 4, 4, 15),
        ));
        builder.push(ValidationMessage::new(
            Severity::Error,
            "metadata.required",
            "Missing required attribute 'author'",
            SourceLocation::new("guide.adoc", 1, 1, 12),
        ));
        builder.build()
    }

    #[test]
    fn compact_is_sorted_one_line_per_finding() {
        let text = render(&result(), &[], OutputFormat::Compact, 2).unwrap();
        assert_eq!(
            text,
            "guide.adoc:1:1: ERROR [metadata.required] Missing required attribute 'author'\n\
             guide.adoc:4:4: WARN [section.title.pattern] Section title does not match required pattern\n"
        );
    }

    #[test]
    fn json_is_the_serialized_result() {
        let text = render(&result(), &[], OutputFormat::Json, 2).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let messages = value["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["rule_id"], "section.title.pattern");
    }

    #[test]
    fn text_without_source_ends_with_summary() {
        let text = render(&result(), &[], OutputFormat::Text, 2).unwrap();
        assert!(text.starts_with("[ERROR]: Missing required attribute 'author' [metadata.required]\n"));
        assert!(text.ends_with("Found 1 error(s), 1 warning(s), 0 info(s) in 1 file(s)\n"));
    }

    #[test]
    fn fancy_is_rendered_by_the_core_reporter() {
        let text = render(&result(), &[], OutputFormat::Fancy, 2).unwrap();
        assert!(text.contains("Missing required attribute 'author'"));
        assert!(text.ends_with("Found 1 error(s), 1 warning(s), 0 info(s) in 1 file(s)\n"));
    }
}
