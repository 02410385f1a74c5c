//! Human-readable rendering of validation results.
//!
//! [`ConsoleReporter`] produces the plain text format: a header block per
//! finding followed by a window of source lines with the offending span
//! underlined. [`MessageDiagnostic`] adapts a finding to `miette` for the
//! graphical report.

use crate::config::DEFAULT_CONTEXT_LINES;
use crate::document::Document;
use crate::source::{char_len, SourceText};
use crate::types::{Placeholder, Severity, SourceLocation, ValidationMessage, ValidationResult};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ────────────────────────────────────────────
// Source lookup
// ────────────────────────────────────────────

/// Finds the raw text of a reported file.
pub trait SourceLookup {
    /// Source text of `file`, if known.
    fn source_for(&self, file: &Path) -> Option<&SourceText>;
}

impl SourceLookup for Document {
    fn source_for(&self, file: &Path) -> Option<&SourceText> {
        (self.path() == file && !self.source.is_empty()).then_some(&self.source)
    }
}

impl SourceLookup for [Document] {
    fn source_for(&self, file: &Path) -> Option<&SourceText> {
        self.iter().find_map(|d| d.source_for(file))
    }
}

impl SourceLookup for HashMap<PathBuf, SourceText> {
    fn source_for(&self, file: &Path) -> Option<&SourceText> {
        self.get(file)
    }
}

/// Lookup that never has source text; only header blocks are rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl SourceLookup for NoSource {
    fn source_for(&self, _file: &Path) -> Option<&SourceText> {
        None
    }
}

// ────────────────────────────────────────────
// Console text
// ────────────────────────────────────────────

/// Plain-text reporter.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    context_lines: usize,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_LINES)
    }
}

impl ConsoleReporter {
    /// Creates a reporter showing `context_lines` lines around each span.
    #[must_use]
    pub fn new(context_lines: usize) -> Self {
        Self { context_lines }
    }

    /// Renders every finding, sorted by file and line, then the summary.
    #[must_use]
    pub fn render<S: SourceLookup + ?Sized>(
        &self,
        result: &ValidationResult,
        sources: &S,
    ) -> String {
        let mut out = String::new();
        for message in result.sorted_messages() {
            let source = sources.source_for(&message.location.file);
            out.push_str(&self.render_message(message, source));
        }
        out.push_str(&result.summary());
        out.push('\n');
        out
    }

    /// Renders one finding.
    #[must_use]
    pub fn render_message(
        &self,
        message: &ValidationMessage,
        source: Option<&SourceText>,
    ) -> String {
        let mut lines = vec![message.to_string(), format!("File: {}", message.location)];
        if let Some(actual) = &message.actual {
            lines.push(format!("Actual: {actual}"));
        }
        if let Some(expected) = &message.expected {
            lines.push(format!("Expected: {expected}"));
        }
        for suggestion in &message.suggestions {
            lines.push(format!("Suggestion: {}", suggestion.message));
        }
        lines.push(String::new());

        let context = source.map(|s| self.context(message, s)).unwrap_or_default();
        if !context.is_empty() {
            lines.extend(context);
            lines.push(String::new());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn context(&self, message: &ValidationMessage, source: &SourceText) -> Vec<String> {
        let location = &message.location;
        let first = location.start_line.saturating_sub(self.context_lines).max(1);
        let last = location
            .end_line
            .saturating_add(self.context_lines)
            .min(source.line_count());
        if first > last {
            return Vec::new();
        }
        let width = last.to_string().len();
        let pad = " ".repeat(width);

        let mut lines = Vec::new();
        for number in first..=last {
            let text = source.line(number).unwrap_or_default();
            let shown = match &message.placeholder {
                Some(placeholder) if number == location.start_line => {
                    if placeholder.own_line {
                        lines.push(format!("{pad} + {}", placeholder.text));
                        text.to_string()
                    } else {
                        insert_at(text, location.start_column, placeholder)
                    }
                }
                _ => text.to_string(),
            };
            lines.push(format!("{number:>width$} | {shown}").trim_end().to_string());

            let inside = (location.start_line..=location.end_line).contains(&number);
            if inside && message.placeholder.is_none() {
                let (from, to) = underline_columns(location, number, char_len(text));
                lines.push(format!(
                    "{pad} | {}{}",
                    " ".repeat(from - 1),
                    "~".repeat(to + 1 - from)
                ));
            }
        }
        lines
    }
}

/// Inserts placeholder text before a 1-based character column.
fn insert_at(text: &str, column: usize, placeholder: &Placeholder) -> String {
    let index = text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(text.len(), |(i, _)| i);
    format!("{}{}{}", &text[..index], placeholder.text, &text[index..])
}

/// Underlined columns of one line of a span.
fn underline_columns(location: &SourceLocation, line: usize, line_len: usize) -> (usize, usize) {
    let start = if line == location.start_line {
        location.start_column
    } else {
        1
    };
    let end = if line == location.end_line {
        location.end_column
    } else {
        line_len
    };
    (start.max(1), end.max(start).max(1))
}

// ────────────────────────────────────────────
// miette
// ────────────────────────────────────────────

/// A finding as a `miette` diagnostic.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{severity}] {message}")]
pub struct MessageDiagnostic {
    severity: Severity,
    message: String,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    label: String,
    #[help]
    help: Option<String>,
}

impl MessageDiagnostic {
    /// Builds a diagnostic, mapping character columns to byte offsets.
    #[must_use]
    pub fn new(message: &ValidationMessage, source: Option<&SourceText>) -> Self {
        let location = &message.location;
        let name = location.file.display().to_string();
        let (text, span) = match source {
            Some(source) => {
                let start = source
                    .byte_offset(location.start_line, location.start_column)
                    .unwrap_or(0);
                let end = source
                    .byte_offset(location.end_line, location.end_column.saturating_add(1))
                    .unwrap_or(start);
                (source.text(), SourceSpan::from((start, end.saturating_sub(start))))
            }
            None => (String::new(), SourceSpan::from((0, 0))),
        };

        let mut help: Vec<String> = Vec::new();
        if let Some(expected) = &message.expected {
            help.push(format!("expected: {expected}"));
        }
        if let Some(placeholder) = &message.placeholder {
            help.push(format!("insert: {}", placeholder.text));
        }
        help.extend(message.suggestions.iter().map(|s| s.message.clone()));

        Self {
            severity: message.severity,
            message: message.message.clone(),
            source_code: NamedSource::new(name, text),
            span,
            label: message.rule_id.clone(),
            help: (!help.is_empty()).then(|| help.join("\n")),
        }
    }
}

/// Renders every finding with `miette`'s graphical handler, then the summary.
///
/// # Errors
///
/// Returns an error if the handler fails to format a report.
pub fn render_fancy<S: SourceLookup + ?Sized>(
    result: &ValidationResult,
    sources: &S,
) -> Result<String, std::fmt::Error> {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    for message in result.sorted_messages() {
        let diagnostic =
            MessageDiagnostic::new(message, sources.source_for(&message.location.file));
        handler.render_report(&mut out, &diagnostic)?;
        out.push('\n');
    }
    out.push_str(&result.summary());
    out.push('\n');
    Ok(out)
}
