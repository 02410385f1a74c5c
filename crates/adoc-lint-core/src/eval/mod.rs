//! Constraint evaluators.
//!
//! Each evaluator takes one constraint and the located value it applies to,
//! and returns findings. Evaluators never fail: an absent value is either a
//! "missing" finding (when required) or nothing at all.

pub mod allowed;
pub mod count;
pub mod field;
pub mod length;
pub mod occurrence;
pub mod order;
pub mod pattern;
pub mod text;

use crate::types::{Placeholder, SourceLocation};

/// A located value under inspection.
#[derive(Debug, Clone)]
pub struct Target<'a> {
    /// Rule id prefix, e.g. `metadata` or `listing.title`.
    pub rule_prefix: String,
    /// Subject used in messages, e.g. `Attribute 'author'`.
    pub label: String,
    /// Raw value, if present.
    pub value: Option<&'a str>,
    /// Span of the value, or the insertion point when it is absent.
    pub location: SourceLocation,
    /// What to render at the insertion point when the value is absent.
    pub placeholder: Option<Placeholder>,
}

impl<'a> Target<'a> {
    /// Creates a target.
    #[must_use]
    pub fn new(
        rule_prefix: impl Into<String>,
        label: impl Into<String>,
        value: Option<&'a str>,
        location: SourceLocation,
    ) -> Self {
        Self {
            rule_prefix: rule_prefix.into(),
            label: label.into(),
            value,
            location,
            placeholder: None,
        }
    }

    /// Sets the insertion placeholder.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Full rule id for a check, e.g. `listing.title` + `pattern`.
    #[must_use]
    pub fn rule_id(&self, check: &str) -> String {
        format!("{}.{check}", self.rule_prefix)
    }

    /// The normalised value; `None` when absent or blank.
    #[must_use]
    pub fn normalized(&self) -> Option<String> {
        self.value.map(normalize).filter(|v| !v.is_empty())
    }
}

/// Normalises a value for measuring: CRLF becomes LF, surrounding
/// whitespace is trimmed.
#[must_use]
pub fn normalize(value: &str) -> String {
    value.replace("\r\n", "\n").trim().to_string()
}

/// Upper-cases the first character.
#[must_use]
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_unifies_newlines() {
        assert_eq!(normalize("  a\r\nb \n"), "a\nb");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn blank_value_counts_as_absent() {
        let loc = SourceLocation::line("a.adoc", 1);
        assert!(Target::new("x", "X", Some("  "), loc.clone())
            .normalized()
            .is_none());
        assert_eq!(
            Target::new("x", "X", Some(" v "), loc).normalized().as_deref(),
            Some("v")
        );
    }

    #[test]
    fn capitalize_first_char() {
        assert_eq!(capitalize("listing title"), "Listing title");
        assert_eq!(capitalize(""), "");
    }
}
