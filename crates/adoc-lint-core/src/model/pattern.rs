//! Regex newtype compiled once when rules are loaded.

use super::ModelError;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Upper bound on the compiled size of a rule pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// A validated regular expression.
///
/// The regex is compiled once at construction and shared by every
/// validation that uses the rule.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    compiled: Regex,
    whole: Regex,
}

impl Pattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty, has invalid syntax, or
    /// compiles to an oversized program.
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        if pattern.is_empty() {
            return Err(ModelError::EmptyPattern);
        }
        let compiled = compile(pattern, pattern)?;
        let whole = compile(&format!("^(?:{pattern})$"), pattern)?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
            whole,
        })
    }

    /// Tests whether the pattern matches the whole of `value`.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.whole.is_match(value)
    }

    /// The compiled regex, unanchored; used to find matches inside a value.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.compiled
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn compile(source: &str, raw: &str) -> Result<Regex, ModelError> {
    RegexBuilder::new(source)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| ModelError::InvalidPattern {
            pattern: raw.to_string(),
            reason: e.to_string(),
        })
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_pattern_matches() {
        let p = Pattern::new("^[A-Z][a-z]+ [A-Z][a-z]+$").unwrap();
        assert!(p.is_match("John Doe"));
        assert!(!p.is_match("john doe"));
        assert_eq!(p.to_string(), "^[A-Z][a-z]+ [A-Z][a-z]+$");
    }

    #[test]
    fn unanchored_pattern_must_cover_whole_value() {
        let p = Pattern::new("Introduction").unwrap();
        assert!(p.is_match("Introduction"));
        assert!(!p.is_match("Introduction to nothing"));
        assert!(p.regex().is_match("Introduction to nothing"));

        let alt = Pattern::new("rust|java").unwrap();
        assert!(alt.is_match("java"));
        assert!(!alt.is_match("rustacean"));
    }

    #[test]
    fn empty_pattern_rejected() {
        assert!(matches!(Pattern::new(""), Err(ModelError::EmptyPattern)));
    }

    #[test]
    fn invalid_pattern_rejected() {
        assert!(matches!(
            Pattern::new("([a-z"),
            Err(ModelError::InvalidPattern { .. })
        ));
    }
}
