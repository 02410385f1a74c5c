//! Raw source text and column-accurate span location.
//!
//! The document tree only carries coarse coordinates (a start line, maybe an
//! end line). [`Locator`] turns those into exact [`SourceLocation`]s by
//! looking at the raw lines: the value after a `:name:` prefix, a field of a
//! block attribute list, a multi-line block body, or each match of a regex
//! inside an already located value.

use crate::types::{Placeholder, SourceLocation};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Line-indexed source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct SourceText {
    lines: Vec<String>,
}

impl SourceText {
    /// Splits text into lines, dropping carriage returns.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
                .collect(),
        }
    }

    /// Returns a line by its 1-based number.
    #[must_use]
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if there is no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Joins the lines back with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Byte offset of a 1-based line and character column in [`Self::text`].
    #[must_use]
    pub fn byte_offset(&self, line: usize, column: usize) -> Option<usize> {
        let index = line.checked_sub(1)?;
        let text = self.lines.get(index)?;
        let before: usize = self.lines[..index].iter().map(|l| l.len() + 1).sum();
        let within = text
            .char_indices()
            .nth(column.saturating_sub(1))
            .map_or(text.len(), |(b, _)| b);
        Some(before + within)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Number of Unicode code points in `s`.
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// A line that is only a bracketed attribute list.
fn is_list_line(text: &str) -> bool {
    let text = text.trim();
    text.starts_with('[') && text.ends_with(']')
}

/// A `name::target[...]` block macro line.
fn is_block_macro(text: &str) -> bool {
    let text = text.trim();
    match text.find("::") {
        Some(0) | None => false,
        Some(p) => {
            text.ends_with(']')
                && text[..p]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
    }
}

/// A `.Title` line naming the following block.
fn is_block_title(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('.') && chars.next().is_some_and(|c| c != '.' && !c.is_whitespace())
}

/// 1-based character column of a byte index within a line.
fn column_of(line: &str, byte_index: usize) -> usize {
    line.get(..byte_index).map_or(1, |prefix| char_len(prefix) + 1)
}

/// One field of a bracketed attribute list, with its character columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListField {
    /// Field text without surrounding quotes or whitespace.
    pub text: String,
    /// First column of `text`.
    pub start_column: usize,
    /// Last column of `text`.
    pub end_column: usize,
}

/// A parsed `[a,"b c",key=value]` list on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeList {
    /// Column of the closing `]`.
    pub close_column: usize,
    /// Fields in order.
    pub fields: Vec<ListField>,
}

impl AttributeList {
    /// Parses the bracketed list of a line, from the first `[` to the last `]`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim_end();
        if !trimmed.ends_with(']') || trimmed.trim_start().starts_with("[[") {
            return None;
        }
        let open = trimmed.find('[')?;
        let close = trimmed.len() - 1;
        let inner_start = open + 1;

        let mut fields = Vec::new();
        let mut field_start = inner_start;
        let mut in_quotes = false;
        for (i, ch) in trimmed[inner_start..close].char_indices() {
            let at = inner_start + i;
            match ch {
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => {
                    fields.extend(Self::field(trimmed, field_start, at));
                    field_start = at + 1;
                }
                _ => {}
            }
        }
        if close > inner_start || !fields.is_empty() {
            fields.extend(Self::field(trimmed, field_start, close));
        }

        Some(Self {
            close_column: column_of(trimmed, close),
            fields,
        })
    }

    fn field(line: &str, start: usize, end: usize) -> Option<ListField> {
        let raw = line.get(start..end)?;
        let lead = raw.len() - raw.trim_start().len();
        let mut text = raw.trim();
        let mut begin = start + lead;
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            text = &text[1..text.len() - 1];
            begin += 1;
        }
        if text.is_empty() {
            return Some(ListField {
                text: String::new(),
                start_column: column_of(line, begin),
                end_column: column_of(line, begin),
            });
        }
        let start_column = column_of(line, begin);
        Some(ListField {
            text: text.to_string(),
            start_column,
            end_column: start_column + char_len(text) - 1,
        })
    }

    /// Value of a `name=value` field.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<ListField> {
        self.fields.iter().find_map(|f| {
            let (key, value) = f.text.split_once('=')?;
            if key.trim() != name {
                return None;
            }
            let value_offset = f.text.len() - f.text[key.len() + 1..].trim_start().len();
            let value = value.trim().trim_matches('"');
            let quote = usize::from(f.text[value_offset..].starts_with('"'));
            let start_column = f.start_column + char_len(&f.text[..value_offset]) + quote;
            Some(ListField {
                text: value.to_string(),
                start_column,
                end_column: start_column + char_len(value).max(1) - 1,
            })
        })
    }
}

/// Computes exact spans inside one file's source text.
#[derive(Debug, Clone, Copy)]
pub struct Locator<'a> {
    file: &'a Path,
    source: &'a SourceText,
}

impl<'a> Locator<'a> {
    /// Creates a locator for a file.
    #[must_use]
    pub fn new(file: &'a Path, source: &'a SourceText) -> Self {
        Self { file, source }
    }

    /// The file this locator reports against.
    #[must_use]
    pub fn file(&self) -> &'a Path {
        self.file
    }

    /// The underlying source text.
    #[must_use]
    pub fn source(&self) -> &'a SourceText {
        self.source
    }

    fn at(&self, line: usize, start_column: usize, end_column: usize) -> SourceLocation {
        self.span(line, start_column, line, end_column)
    }

    fn span(
        &self,
        start_line: usize,
        start_column: usize,
        end_line: usize,
        end_column: usize,
    ) -> SourceLocation {
        let location =
            SourceLocation::span(self.file, start_line, start_column, end_line, end_column);
        match self.source.line(location.start_line) {
            Some(text) => location.with_source_line(text),
            None => location,
        }
    }

    /// Span of the whole line (at least one column).
    #[must_use]
    pub fn whole_line(&self, line: usize) -> SourceLocation {
        let width = self.source.line(line).map_or(1, |t| char_len(t).max(1));
        self.at(line, 1, width)
    }

    /// Zero-width position at the start of a line.
    #[must_use]
    pub fn line_start(&self, line: usize) -> SourceLocation {
        self.at(line, 1, 1)
    }

    /// Span of the value after an attribute entry's `:name:` prefix.
    #[must_use]
    pub fn attribute_value(&self, line: usize, name: &str) -> Option<SourceLocation> {
        let text = self.source.line(line)?;
        let prefix = format!(":{name}:");
        let rest = text.strip_prefix(&prefix)?;
        let value = rest.trim();
        let value_start = prefix.len() + (rest.len() - rest.trim_start().len());
        let start = column_of(text, value_start);
        if value.is_empty() {
            return Some(self.at(line, start, start));
        }
        Some(self.at(line, start, start + char_len(value) - 1))
    }

    /// Span of a section title after its `=` or `#` marker.
    #[must_use]
    pub fn section_title(&self, line: usize, title: &str) -> Option<SourceLocation> {
        let text = self.source.line(line)?;
        let marker_end = text.len() - text.trim_start_matches(['=', '#']).len();
        let offset = text[marker_end..].find(title.trim())? + marker_end;
        let start = column_of(text, offset);
        Some(self.at(line, start, start + char_len(title.trim()).max(1) - 1))
    }

    /// First occurrence of `needle` between two lines (inclusive).
    #[must_use]
    pub fn find(&self, from_line: usize, to_line: usize, needle: &str) -> Option<SourceLocation> {
        if needle.is_empty() {
            return None;
        }
        (from_line.max(1)..=to_line.min(self.source.line_count())).find_map(|line| {
            let text = self.source.line(line)?;
            let offset = text.find(needle)?;
            let start = column_of(text, offset);
            Some(self.at(line, start, start + char_len(needle) - 1))
        })
    }

    /// Span of a possibly multi-line block body.
    ///
    /// The start is the first non-blank column of the first content line,
    /// the end is the last column of the last content line.
    #[must_use]
    pub fn content(&self, from_line: usize, to_line: usize, content: &str) -> Option<SourceLocation> {
        let lines: Vec<&str> = content.lines().collect();
        let first_index = lines.iter().position(|l| !l.trim().is_empty())?;
        let first = self.find(from_line, to_line, lines[first_index].trim())?;

        let remaining = lines.len() - first_index - 1;
        let last_text = lines[lines.len() - 1].trim_end();
        if remaining == 0 {
            return Some(first);
        }
        let last_line = first.start_line.saturating_add(remaining);
        let end_column = self
            .source
            .line(last_line)
            .and_then(|text| text.find(last_text).map(|o| column_of(text, o)))
            .unwrap_or(1)
            + char_len(last_text).max(1)
            - 1;
        Some(self.span(first.start_line, first.start_column, last_line, end_column))
    }

    /// Finds the line carrying a block's attribute list or macro brackets.
    ///
    /// The block line itself counts when it is a `[...]` line or a block
    /// macro (`name::target[...]`). Otherwise only a `[...]` line directly
    /// above the block qualifies, possibly separated by one `.Title` line.
    #[must_use]
    pub fn attribute_list_line(&self, block_line: usize) -> Option<usize> {
        let own = self.source.line(block_line)?;
        if (is_list_line(own) || is_block_macro(own)) && AttributeList::parse(own).is_some() {
            return Some(block_line);
        }
        let mut line = block_line.checked_sub(1).filter(|l| *l >= 1)?;
        let mut text = self.source.line(line)?;
        if is_block_title(text) {
            line = line.checked_sub(1).filter(|l| *l >= 1)?;
            text = self.source.line(line)?;
        }
        (is_list_line(text) && AttributeList::parse(text).is_some()).then_some(line)
    }

    /// Parsed attribute list near a block line.
    #[must_use]
    pub fn attribute_list(&self, block_line: usize) -> Option<(usize, AttributeList)> {
        let line = self.attribute_list_line(block_line)?;
        let list = AttributeList::parse(self.source.line(line)?)?;
        Some((line, list))
    }

    /// Span of the Nth field of a block attribute list.
    #[must_use]
    pub fn list_field(&self, block_line: usize, index: usize) -> Option<SourceLocation> {
        let (line, list) = self.attribute_list(block_line)?;
        let field = list.fields.get(index)?;
        if field.text.is_empty() {
            return None;
        }
        Some(self.at(line, field.start_column, field.end_column))
    }

    /// Span of an already parsed attribute-list field on `line`.
    #[must_use]
    pub fn field(&self, line: usize, field: &ListField) -> SourceLocation {
        self.at(line, field.start_column, field.end_column)
    }

    /// Span of a `name=value` field of a block attribute list.
    #[must_use]
    pub fn named_field(&self, block_line: usize, name: &str) -> Option<SourceLocation> {
        let (line, list) = self.attribute_list(block_line)?;
        let field = list.named(name)?;
        Some(self.at(line, field.start_column, field.end_column))
    }

    /// Where a missing attribute-list value would be inserted.
    ///
    /// With an attribute list present the placeholder goes before its
    /// closing bracket; otherwise `own_line` is shown on a synthetic line
    /// above the block.
    #[must_use]
    pub fn list_insertion(
        &self,
        block_line: usize,
        name: &str,
        own_line: &str,
    ) -> (SourceLocation, Placeholder) {
        let token = format!("«{name}»");
        if let Some((line, list)) = self.attribute_list(block_line) {
            let text = if list.fields.is_empty() {
                token
            } else {
                format!(",{token}")
            };
            return (
                self.at(line, list.close_column, list.close_column),
                Placeholder::inline(text),
            );
        }
        (
            self.line_start(block_line),
            Placeholder::own_line(own_line.replace("{}", &token)),
        )
    }

    /// One span per regex match inside an already located value.
    #[must_use]
    pub fn regex_matches(
        &self,
        base: &SourceLocation,
        value: &str,
        pattern: &Regex,
    ) -> Vec<(SourceLocation, String)> {
        pattern
            .find_iter(value)
            .filter(|m| !m.as_str().is_empty())
            .map(|m| {
                let start = char_len(&value[..m.start()]);
                let end = start + char_len(m.as_str());
                (self.narrow(base, value, start, end), m.as_str().to_string())
            })
            .collect()
    }

    /// Maps a character range of a located value back to source columns.
    ///
    /// Lines after the first are assumed to start at column 1.
    #[must_use]
    pub fn narrow(
        &self,
        base: &SourceLocation,
        value: &str,
        char_start: usize,
        char_end: usize,
    ) -> SourceLocation {
        let mut line = base.start_line;
        let mut column = base.start_column;
        let mut start = (line, column);
        let mut end = (line, column);
        for (i, ch) in value.chars().enumerate() {
            if i == char_start {
                start = (line, column);
            }
            if i + 1 == char_end {
                end = (line, column);
                break;
            }
            if ch == '\n' {
                line = line.saturating_add(1);
                column = 1;
            } else {
                column = column.saturating_add(1);
            }
        }
        self.span(start.0, start.1, end.0, end.1)
    }
}
