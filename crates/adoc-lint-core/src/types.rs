//! Core types for validation findings and results.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Severity level for validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, never affects validity.
    Info,
    /// Warning that should be addressed.
    #[serde(alias = "warning")]
    Warn,
    /// Error that makes the document invalid.
    Error,
}

impl Severity {
    /// Parses a severity name as used in rule files and on the command line.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A precise span inside a source file.
///
/// Lines and columns are 1-based and end-inclusive. Columns count Unicode
/// code points, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File the span belongs to.
    pub file: PathBuf,
    /// First line of the span.
    pub start_line: usize,
    /// First column on `start_line`.
    pub start_column: usize,
    /// Last line of the span.
    pub end_line: usize,
    /// Last column on `end_line`.
    pub end_column: usize,
    /// Raw text of `start_line`, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
}

impl SourceLocation {
    /// Creates a single-line span.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, start_column: usize, end_column: usize) -> Self {
        Self::span(file, line, start_column, line, end_column)
    }

    /// Creates a span that may cover several lines.
    ///
    /// Out-of-order coordinates are normalised so that start never comes
    /// after end.
    #[must_use]
    pub fn span(
        file: impl Into<PathBuf>,
        start_line: usize,
        start_column: usize,
        end_line: usize,
        end_column: usize,
    ) -> Self {
        let start_line = start_line.max(1);
        let end_line = end_line.max(1);
        let start_column = start_column.max(1);
        let end_column = end_column.max(1);

        let (start, end) = if (start_line, start_column) <= (end_line, end_column) {
            ((start_line, start_column), (end_line, end_column))
        } else {
            ((end_line, end_column), (start_line, start_column))
        };

        // Ordered on (line, column); on different lines the end column may
        // be smaller than the start column.
        Self {
            file: file.into(),
            start_line: start.0,
            start_column: start.1,
            end_line: end.0,
            end_column: end.1,
            source_line: None,
        }
    }

    /// Creates a location pointing at the first column of a line.
    #[must_use]
    pub fn line(file: impl Into<PathBuf>, line: usize) -> Self {
        Self::new(file, line, 1, 1)
    }

    /// Attaches the raw text of the start line.
    #[must_use]
    pub fn with_source_line(mut self, text: impl Into<String>) -> Self {
        self.source_line = Some(text.into());
        self
    }

    /// Returns true if the span covers more than one line.
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        self.end_line > self.start_line
    }

    /// Number of columns covered by a single-line span.
    #[must_use]
    pub fn width(&self) -> usize {
        self.end_column.saturating_add(1).saturating_sub(self.start_column)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_multiline() {
            write!(
                f,
                "{}:{}:{}-{}:{}",
                self.file.display(),
                self.start_line,
                self.start_column,
                self.end_line,
                self.end_column
            )
        } else {
            write!(
                f,
                "{}:{}:{}-{}",
                self.file.display(),
                self.start_line,
                self.start_column,
                self.end_column
            )
        }
    }
}

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// A required attribute or section is absent.
    MissingRequired,
    /// A required block value is absent; rendered with a placeholder.
    MissingValue,
    /// A value does not match its required pattern.
    PatternMismatch,
    /// A value contains a forbidden pattern.
    ForbiddenPattern,
    /// A value is shorter than allowed.
    LengthTooShort,
    /// A value is longer than allowed.
    LengthTooLong,
    /// A count or number is below its minimum.
    ValueTooSmall,
    /// A count or number is above its maximum.
    ValueTooLarge,
    /// A value is not in the allowed set.
    DisallowedValue,
    /// A rule target appears fewer times than required.
    OccurrenceTooFew,
    /// A rule target appears more times than allowed.
    OccurrenceTooMany,
    /// Order-tagged siblings appear out of order.
    OrderViolation,
    /// A block kind is not allowed in its section.
    UnknownBlockType,
    /// A section level has no declared rule.
    UnexpectedSection,
    /// An unexpected fault while inspecting a node.
    InternalFault,
}

/// A hint on how to resolve a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Synthetic text shown where a missing value would have to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Text to render, e.g. `,«language»`.
    pub text: String,
    /// Render on a synthetic line before the located line instead of inline.
    pub own_line: bool,
}

impl Placeholder {
    /// Creates a placeholder inserted inline at the location's start column.
    #[must_use]
    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            own_line: false,
        }
    }

    /// Creates a placeholder rendered on its own line.
    #[must_use]
    pub fn own_line(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            own_line: true,
        }
    }
}

/// A single reported rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    /// Severity of this finding.
    pub severity: Severity,
    /// Rule identifier (e.g., `metadata.pattern`).
    pub rule_id: String,
    /// Human-readable message.
    pub message: String,
    /// Where the finding is located.
    pub location: SourceLocation,
    /// The offending value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// What the rule expected, if expressible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Finding category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FindingKind>,
    /// Hints for fixing the finding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    /// Insertion placeholder for missing values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Placeholder>,
}

impl ValidationMessage {
    /// Creates a new finding.
    #[must_use]
    pub fn new(
        severity: Severity,
        rule_id: impl Into<String>,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            severity,
            rule_id: rule_id.into(),
            message: message.into(),
            location,
            actual: None,
            expected: None,
            kind: None,
            suggestions: Vec::new(),
            placeholder: None,
        }
    }

    /// Sets the actual value.
    #[must_use]
    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    /// Sets the expected value.
    #[must_use]
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Sets the finding kind.
    #[must_use]
    pub fn with_kind(mut self, kind: FindingKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Adds a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Sets the insertion placeholder.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Formats the finding as a single compact line.
    #[must_use]
    pub fn format_compact(&self) -> String {
        format!(
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.start_line,
            self.location.start_column,
            self.severity,
            self.rule_id,
            self.message
        )
    }
}

impl std::fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {} [{}]", self.severity, self.message, self.rule_id)
    }
}

/// Result of validating one or more documents.
///
/// Immutable once built; use [`ValidationResultBuilder`] to assemble one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    messages: Vec<ValidationMessage>,
    scanned_files: BTreeSet<PathBuf>,
    duration: Duration,
}

impl ValidationResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all findings in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    /// Returns the files that were validated.
    #[must_use]
    pub fn scanned_files(&self) -> &BTreeSet<PathBuf> {
        &self.scanned_files
    }

    /// Returns how long validation took.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Groups findings by file, sorted by path.
    #[must_use]
    pub fn messages_by_file(&self) -> BTreeMap<&Path, Vec<&ValidationMessage>> {
        let mut grouped: BTreeMap<&Path, Vec<&ValidationMessage>> = BTreeMap::new();
        for message in &self.messages {
            grouped
                .entry(message.location.file.as_path())
                .or_default()
                .push(message);
        }
        grouped
    }

    /// Groups the findings of one file by start line.
    #[must_use]
    pub fn messages_by_line(&self, file: &Path) -> BTreeMap<usize, Vec<&ValidationMessage>> {
        let mut grouped: BTreeMap<usize, Vec<&ValidationMessage>> = BTreeMap::new();
        for message in self.messages.iter().filter(|m| m.location.file == file) {
            grouped
                .entry(message.location.start_line)
                .or_default()
                .push(message);
        }
        grouped
    }

    /// Returns findings sorted by file, then line, then insertion order.
    #[must_use]
    pub fn sorted_messages(&self) -> Vec<&ValidationMessage> {
        let mut sorted: Vec<&ValidationMessage> = self.messages.iter().collect();
        // Stable sort keeps insertion order within a line.
        sorted.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.start_line.cmp(&b.location.start_line))
        });
        sorted
    }

    fn count(&self, severity: Severity) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == severity)
            .count()
    }

    /// Number of ERROR findings.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of WARN findings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warn)
    }

    /// Number of INFO findings.
    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.severity == Severity::Error)
    }

    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|m| m.severity == Severity::Warn)
    }

    /// A document set is valid iff it has no ERROR findings.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Checks if any findings meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_messages_at(&self, severity: Severity) -> bool {
        self.messages.iter().any(|m| m.severity >= severity)
    }

    /// Combines several results, keeping their order.
    #[must_use]
    pub fn merge<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let mut merged = Self::new();
        for result in results {
            merged.messages.extend(result.messages);
            merged.scanned_files.extend(result.scanned_files);
            merged.duration += result.duration;
        }
        merged
    }

    /// Formats a one-line summary of the counts.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Found {} error(s), {} warning(s), {} info(s) in {} file(s)",
            self.error_count(),
            self.warning_count(),
            self.info_count(),
            self.scanned_files.len()
        )
    }
}

/// Call-scoped accumulator for a [`ValidationResult`].
#[derive(Debug)]
pub struct ValidationResultBuilder {
    messages: Vec<ValidationMessage>,
    scanned_files: BTreeSet<PathBuf>,
    started: Instant,
}

impl Default for ValidationResultBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResultBuilder {
    /// Starts a new result; timing begins now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            scanned_files: BTreeSet::new(),
            started: Instant::now(),
        }
    }

    /// Records that a file was scanned.
    pub fn scanned(&mut self, file: impl Into<PathBuf>) -> &mut Self {
        self.scanned_files.insert(file.into());
        self
    }

    /// Adds one finding.
    pub fn push(&mut self, message: ValidationMessage) -> &mut Self {
        self.messages.push(message);
        self
    }

    /// Adds several findings.
    pub fn extend<I>(&mut self, messages: I) -> &mut Self
    where
        I: IntoIterator<Item = ValidationMessage>,
    {
        self.messages.extend(messages);
        self
    }

    /// Freezes the result.
    #[must_use]
    pub fn build(self) -> ValidationResult {
        ValidationResult {
            messages: self.messages,
            scanned_files: self.scanned_files,
            duration: self.started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(severity: Severity, file: &str, line: usize) -> ValidationMessage {
        ValidationMessage::new(
            severity,
            "metadata.pattern",
            "Attribute 'author' does not match required pattern",
            SourceLocation::new(file, line, 10, 17),
        )
    }

    fn result_of(messages: Vec<ValidationMessage>) -> ValidationResult {
        let mut builder = ValidationResultBuilder::new();
        for m in messages {
            builder.scanned(m.location.file.clone());
            builder.push(m);
        }
        builder.build()
    }

    #[test]
    fn severity_display_and_parse() {
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert_eq!(Severity::Warn.to_string(), "WARN");
        assert_eq!(Severity::parse("warning"), Some(Severity::Warn));
        assert_eq!(Severity::parse("INFO"), Some(Severity::Info));
        assert_eq!(Severity::parse("fatal"), None);
        assert!(Severity::Error > Severity::Warn);
    }

    #[test]
    fn location_normalises_reversed_coordinates() {
        let loc = SourceLocation::span("a.adoc", 5, 3, 2, 7);
        assert_eq!((loc.start_line, loc.start_column), (2, 7));
        assert_eq!((loc.end_line, loc.end_column), (5, 3));

        let loc = SourceLocation::new("a.adoc", 4, 9, 2);
        assert_eq!((loc.start_column, loc.end_column), (2, 9));
    }

    #[test]
    fn location_display_single_and_multiline() {
        assert_eq!(
            SourceLocation::new("doc.adoc", 2, 10, 17).to_string(),
            "doc.adoc:2:10-17"
        );
        assert_eq!(
            SourceLocation::span("doc.adoc", 4, 1, 6, 12).to_string(),
            "doc.adoc:4:1-6:12"
        );
    }

    #[test]
    fn message_display_has_header_layout() {
        let m = message(Severity::Error, "doc.adoc", 2);
        assert_eq!(
            m.to_string(),
            "[ERROR]: Attribute 'author' does not match required pattern [metadata.pattern]"
        );
    }

    #[test]
    fn counts_and_validity() {
        let result = result_of(vec![
            message(Severity::Warn, "a.adoc", 1),
            message(Severity::Info, "a.adoc", 2),
        ]);
        assert!(result.is_valid());
        assert!(result.has_warnings());
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.info_count(), 1);

        let result = result_of(vec![message(Severity::Error, "a.adoc", 1)]);
        assert!(!result.is_valid());
        assert_eq!(result.error_count(), 1);
        assert!(result.has_messages_at(Severity::Warn));
    }

    #[test]
    fn grouping_by_file_and_line() {
        let result = result_of(vec![
            message(Severity::Error, "b.adoc", 3),
            message(Severity::Error, "a.adoc", 7),
            message(Severity::Warn, "b.adoc", 1),
            message(Severity::Info, "b.adoc", 3),
        ]);

        let files: Vec<&Path> = result.messages_by_file().keys().copied().collect();
        assert_eq!(files, vec![Path::new("a.adoc"), Path::new("b.adoc")]);

        let lines = result.messages_by_line(Path::new("b.adoc"));
        assert_eq!(lines.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(lines[&3].len(), 2);
    }

    #[test]
    fn sorted_messages_keep_insertion_order_within_line() {
        let result = result_of(vec![
            message(Severity::Info, "b.adoc", 3),
            message(Severity::Error, "b.adoc", 3),
            message(Severity::Warn, "a.adoc", 9),
        ]);
        let sorted: Vec<Severity> = result.sorted_messages().iter().map(|m| m.severity).collect();
        assert_eq!(sorted, vec![Severity::Warn, Severity::Info, Severity::Error]);
    }

    #[test]
    fn merge_keeps_order_and_files() {
        let merged = ValidationResult::merge(vec![
            result_of(vec![message(Severity::Error, "a.adoc", 1)]),
            result_of(vec![message(Severity::Warn, "b.adoc", 1)]),
        ]);
        assert_eq!(merged.messages().len(), 2);
        assert_eq!(merged.scanned_files().len(), 2);
        assert_eq!(
            merged.summary(),
            "Found 1 error(s), 1 warning(s), 0 info(s) in 2 file(s)"
        );
    }
}
