//! Reusable constraint building blocks shared by metadata, section and
//! block rules.
//!
//! Each constraint carries its own severity.

use super::pattern::Pattern;
use crate::types::Severity;

/// Constraints on a textual value: presence, length, and patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRule {
    /// Value must be present.
    pub required: bool,
    /// Minimum length in code points.
    pub min_length: Option<usize>,
    /// Maximum length in code points.
    pub max_length: Option<usize>,
    /// The whole value must match this pattern.
    pub pattern: Option<Pattern>,
    /// Every match of this pattern is a separate finding.
    pub forbidden: Option<Pattern>,
    /// Severity of findings.
    pub severity: Severity,
}

impl TextRule {
    /// Creates an unconstrained rule.
    #[must_use]
    pub fn new(severity: Severity) -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            forbidden: None,
            severity,
        }
    }

    /// Marks the value as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the minimum length.
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Sets the required pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Sets the forbidden pattern.
    #[must_use]
    pub fn forbidden(mut self, pattern: Pattern) -> Self {
        self.forbidden = Some(pattern);
        self
    }
}

/// Min/max bounds on a derived count (lines, items, words, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRule {
    /// Minimum count.
    pub min: Option<usize>,
    /// Maximum count.
    pub max: Option<usize>,
    /// Severity of findings.
    pub severity: Severity,
}

impl CountRule {
    /// Creates a count rule.
    #[must_use]
    pub fn new(min: Option<usize>, max: Option<usize>, severity: Severity) -> Self {
        Self { min, max, severity }
    }
}

/// Integer range for numeric attributes such as width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericRule {
    /// Value must be present.
    pub required: bool,
    /// Smallest allowed value.
    pub min: Option<u64>,
    /// Largest allowed value.
    pub max: Option<u64>,
    /// Severity of findings.
    pub severity: Severity,
}

impl NumericRule {
    /// Creates a numeric rule.
    #[must_use]
    pub fn new(min: Option<u64>, max: Option<u64>, severity: Severity) -> Self {
        Self {
            required: false,
            min,
            max,
            severity,
        }
    }

    /// Marks the value as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Set membership for enumerated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSet {
    /// Value must be present.
    pub required: bool,
    /// Permitted values; empty means any value.
    pub allowed: Vec<String>,
    /// Severity of findings.
    pub severity: Severity,
}

impl ValueSet {
    /// Creates a value set.
    #[must_use]
    pub fn new<I, S>(allowed: I, severity: Severity) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: false,
            allowed: allowed.into_iter().map(Into::into).collect(),
            severity,
        }
    }

    /// Marks the value as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Tests membership; an empty set permits everything.
    #[must_use]
    pub fn permits(&self, value: &str) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|a| a == value)
    }
}

/// How often a rule target may appear among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Minimum number of occurrences.
    pub min: usize,
    /// Maximum number of occurrences; `None` is unbounded.
    pub max: Option<usize>,
    /// Severity of findings.
    pub severity: Severity,
}

impl Occurrence {
    /// Creates occurrence bounds.
    #[must_use]
    pub fn new(min: usize, max: Option<usize>, severity: Severity) -> Self {
        Self { min, max, severity }
    }

    /// No bounds at all.
    #[must_use]
    pub fn unbounded(severity: Severity) -> Self {
        Self::new(0, None, severity)
    }

    /// Returns true if `count` is within bounds.
    #[must_use]
    pub fn admits(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

/// Sentence and word limits for prose blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentenceRule {
    /// Bounds on the number of sentences.
    pub count: Option<CountRule>,
    /// Bounds on the number of words in each sentence.
    pub words: Option<CountRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occurrence_admits_within_bounds() {
        let occ = Occurrence::new(1, Some(2), Severity::Error);
        assert!(!occ.admits(0));
        assert!(occ.admits(1));
        assert!(occ.admits(2));
        assert!(!occ.admits(3));
        assert!(Occurrence::unbounded(Severity::Info).admits(100));
    }

    #[test]
    fn empty_value_set_permits_anything() {
        assert!(ValueSet::new(Vec::<String>::new(), Severity::Warn).permits("x"));
        let set = ValueSet::new(["rust", "java"], Severity::Warn);
        assert!(set.permits("rust"));
        assert!(!set.permits("Rust"));
    }

    #[test]
    fn text_rule_builder() {
        let rule = TextRule::new(Severity::Warn).required().min_length(3).max_length(9);
        assert!(rule.required);
        assert_eq!(rule.min_length, Some(3));
        assert_eq!(rule.max_length, Some(9));
        assert!(rule.pattern.is_none());
    }
}
