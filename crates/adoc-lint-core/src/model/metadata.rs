//! Header attribute rules.

use super::constraint::TextRule;
use crate::types::Severity;

/// Rule for one document header attribute (`:name: value`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataAttributeRule {
    name: String,
    rule: TextRule,
}

impl MetadataAttributeRule {
    /// Creates a metadata rule.
    #[must_use]
    pub fn new(name: impl Into<String>, rule: TextRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value constraints.
    #[must_use]
    pub fn rule(&self) -> &TextRule {
        &self.rule
    }

    /// Returns true if the attribute must be present.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.rule.required
    }

    /// Returns the severity of findings.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.rule.severity
    }
}
