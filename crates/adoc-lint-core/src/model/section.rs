//! Section rules stored in the rule model's arena.

use super::block::{BlockKind, BlockRule};
use super::constraint::{Occurrence, TextRule};
use crate::types::Severity;
use std::fmt;

/// Index of a [`SectionRule`] inside a [`super::RuleModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub(crate) usize);

impl SectionId {
    /// Raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rule for a section at a given level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRule {
    name: String,
    level: u8,
    order: Option<u32>,
    title: Option<TextRule>,
    occurrence: Occurrence,
    severity: Severity,
    blocks: Vec<BlockRule>,
    pub(crate) children: Vec<SectionId>,
}

impl SectionRule {
    /// Creates a section rule with unbounded occurrence.
    #[must_use]
    pub fn new(name: impl Into<String>, level: u8, severity: Severity) -> Self {
        Self {
            name: name.into(),
            level,
            order: None,
            title: None,
            occurrence: Occurrence::unbounded(severity),
            severity,
            blocks: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the order tag among sibling sections.
    #[must_use]
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the title constraint.
    #[must_use]
    pub fn with_title(mut self, title: TextRule) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets occurrence bounds.
    #[must_use]
    pub fn with_occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrence = occurrence;
        self
    }

    /// Appends a block rule.
    #[must_use]
    pub fn with_block(mut self, block: BlockRule) -> Self {
        self.blocks.push(block);
        self
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the section level (0 = document title).
    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Returns the order tag.
    #[must_use]
    pub fn order(&self) -> Option<u32> {
        self.order
    }

    /// Returns the title constraint.
    #[must_use]
    pub fn title(&self) -> Option<&TextRule> {
        self.title.as_ref()
    }

    /// Returns the occurrence bounds.
    #[must_use]
    pub fn occurrence(&self) -> &Occurrence {
        &self.occurrence
    }

    /// Returns the default severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the block rules in declaration order.
    #[must_use]
    pub fn blocks(&self) -> &[BlockRule] {
        &self.blocks
    }

    /// Returns the child section ids.
    #[must_use]
    pub fn children(&self) -> &[SectionId] {
        &self.children
    }

    /// First block rule whose kind matches a node tag, with its index.
    #[must_use]
    pub fn block_rule_for(&self, tag: &str) -> Option<(usize, &BlockRule)> {
        let kind = BlockKind::from_tag(tag)?;
        self.blocks.iter().enumerate().find(|(_, b)| b.kind() == kind)
    }

    /// Tests a title against the title pattern, if any.
    #[must_use]
    pub fn title_matches(&self, title: &str) -> bool {
        self.title
            .as_ref()
            .and_then(|t| t.pattern.as_ref())
            .map_or(true, |p| p.is_match(title.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::block::BlockConstraints;
    use crate::model::pattern::Pattern;

    #[test]
    fn block_rule_lookup_takes_first_match() {
        let section = SectionRule::new("body", 1, Severity::Error)
            .with_block(
                BlockRule::new(
                    BlockConstraints::unconstrained(BlockKind::Listing),
                    Severity::Warn,
                )
                .with_name("first"),
            )
            .with_block(
                BlockRule::new(
                    BlockConstraints::unconstrained(BlockKind::Listing),
                    Severity::Info,
                )
                .with_name("second"),
            );

        let (index, rule) = section.block_rule_for("listing").unwrap();
        assert_eq!(index, 0);
        assert_eq!(rule.name(), "first");
        assert!(section.block_rule_for("table").is_none());
        assert!(section.block_rule_for("bogus").is_none());
    }

    #[test]
    fn title_matching() {
        let section = SectionRule::new("intro", 1, Severity::Error);
        assert!(section.title_matches("Anything"));

        let section = section.with_title(
            TextRule::new(Severity::Error).pattern(Pattern::new("^Introduction$").unwrap()),
        );
        assert!(section.title_matches("Introduction"));
        assert!(!section.title_matches("Overview"));
    }
}
