//! Pure domain model of validation rules.
//!
//! No serde and no I/O here. Invariants are enforced at construction:
//! patterns compile, section levels increase from parent to child, and
//! every section appears at most once in the tree. A built [`RuleModel`]
//! is immutable and can be shared across threads.

pub mod block;
pub mod constraint;
pub mod metadata;
pub mod pattern;
pub mod section;

pub use block::{
    AdmonitionRules, AudioRules, BlockConstraints, BlockKind, BlockRule, DlistRules,
    ExampleRules, ImageRules, ListRules, ListingRules, LiteralRules, ParagraphRules, PassRules,
    QuoteRules, SidebarRules, TableRules, VideoRules,
};
pub use constraint::{CountRule, NumericRule, Occurrence, SentenceRule, TextRule, ValueSet};
pub use metadata::MetadataAttributeRule;
pub use pattern::Pattern;
pub use section::{SectionId, SectionRule};

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Validated rule set: metadata rules plus an arena of section rules.
#[derive(Debug, Clone, Default)]
pub struct RuleModel {
    metadata: Vec<MetadataAttributeRule>,
    sections: Vec<SectionRule>,
    roots: Vec<SectionId>,
}

impl RuleModel {
    /// Creates a rule model with full validation.
    ///
    /// # Errors
    ///
    /// Returns every cross-reference problem found: dangling child ids,
    /// sections reachable from more than one parent, and children whose
    /// level does not exceed their parent's.
    pub fn new(
        metadata: Vec<MetadataAttributeRule>,
        sections: Vec<SectionRule>,
        roots: Vec<SectionId>,
    ) -> Result<Self, Vec<ModelError>> {
        let mut errors = Vec::new();
        let mut references = vec![0_usize; sections.len()];

        for rule in &metadata {
            if rule.name().is_empty() {
                errors.push(ModelError::EmptyName {
                    context: "metadata".to_string(),
                });
            }
        }

        for id in &roots {
            match references.get_mut(id.0) {
                Some(count) => *count += 1,
                None => errors.push(ModelError::DanglingSection {
                    context: "roots".to_string(),
                    id: *id,
                }),
            }
        }

        for section in &sections {
            if section.name().is_empty() {
                errors.push(ModelError::EmptyName {
                    context: format!("section at level {}", section.level()),
                });
            }
            for child_id in section.children() {
                let Some(child) = sections.get(child_id.0) else {
                    errors.push(ModelError::DanglingSection {
                        context: format!("section '{}'", section.name()),
                        id: *child_id,
                    });
                    continue;
                };
                references[child_id.0] += 1;
                if child.level() <= section.level() {
                    errors.push(ModelError::LevelNotIncreasing {
                        parent: section.name().to_string(),
                        parent_level: section.level(),
                        child: child.name().to_string(),
                        child_level: child.level(),
                    });
                }
            }
        }

        // Increasing levels rule out cycles once every section has one parent.
        for (index, count) in references.iter().enumerate() {
            if *count > 1 {
                errors.push(ModelError::SharedSection {
                    name: sections[index].name().to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(Self {
                metadata,
                sections,
                roots,
            })
        } else {
            Err(errors)
        }
    }

    /// Creates a model without any rules.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> RuleModelBuilder {
        RuleModelBuilder::default()
    }

    /// Returns true if no rules are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.sections.is_empty()
    }

    /// Returns true if any section rule is defined.
    #[must_use]
    pub fn has_sections(&self) -> bool {
        !self.roots.is_empty()
    }

    /// Returns the metadata rules.
    #[must_use]
    pub fn metadata(&self) -> &[MetadataAttributeRule] {
        &self.metadata
    }

    /// Returns the top-level section rules.
    #[must_use]
    pub fn roots(&self) -> &[SectionId] {
        &self.roots
    }

    /// Looks up a section rule.
    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&SectionRule> {
        self.sections.get(id.0)
    }

    /// Iterates over all section rules with their ids.
    pub fn sections(&self) -> impl Iterator<Item = (SectionId, &SectionRule)> {
        self.sections
            .iter()
            .enumerate()
            .map(|(i, s)| (SectionId(i), s))
    }

    /// The top-level rule for the document title, if one is declared.
    #[must_use]
    pub fn title_rule(&self) -> Option<SectionId> {
        self.roots
            .iter()
            .copied()
            .find(|id| self.section(*id).is_some_and(|s| s.level() == 0))
    }
}

// ────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────

/// Incremental construction of a [`RuleModel`].
#[derive(Debug, Default)]
pub struct RuleModelBuilder {
    metadata: Vec<MetadataAttributeRule>,
    sections: Vec<SectionRule>,
    roots: Vec<SectionId>,
    errors: Vec<ModelError>,
}

impl RuleModelBuilder {
    /// Adds a metadata rule.
    pub fn metadata(&mut self, rule: MetadataAttributeRule) -> &mut Self {
        self.metadata.push(rule);
        self
    }

    /// Adds a top-level section rule.
    pub fn add_root(&mut self, section: SectionRule) -> SectionId {
        let id = self.push(section);
        self.roots.push(id);
        id
    }

    /// Adds a section rule under `parent`.
    pub fn add_child(&mut self, parent: SectionId, section: SectionRule) -> SectionId {
        let id = self.push(section);
        if parent.0 < id.0 {
            self.sections[parent.0].children.push(id);
        } else {
            let context = format!("parent of '{}'", self.sections[id.0].name());
            self.errors.push(ModelError::DanglingSection {
                context,
                id: parent,
            });
        }
        id
    }

    fn push(&mut self, section: SectionRule) -> SectionId {
        self.sections.push(section);
        SectionId(self.sections.len() - 1)
    }

    /// Validates and freezes the model.
    ///
    /// # Errors
    ///
    /// Returns all problems found, see [`RuleModel::new`].
    pub fn build(self) -> Result<RuleModel, Vec<ModelError>> {
        let mut errors = self.errors;
        match RuleModel::new(self.metadata, self.sections, self.roots) {
            Ok(model) if errors.is_empty() => Ok(model),
            Ok(_) => Err(errors),
            Err(more) => {
                errors.extend(more);
                Err(errors)
            }
        }
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in rule model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Pattern is empty.
    #[error("pattern must not be empty")]
    EmptyPattern,

    /// Pattern has invalid syntax or is too large.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },

    /// A rule has an empty name.
    #[error("{context}: name must not be empty")]
    EmptyName {
        /// Where the name was expected.
        context: String,
    },

    /// A section id points outside the arena.
    #[error("{context}: unknown section {id}")]
    DanglingSection {
        /// Where the reference was found.
        context: String,
        /// The dangling id.
        id: SectionId,
    },

    /// A section is referenced by more than one parent.
    #[error("section '{name}' appears more than once in the tree")]
    SharedSection {
        /// The shared section.
        name: String,
    },

    /// A child section is not deeper than its parent.
    #[error(
        "section '{child}' (level {child_level}) must be deeper than its parent '{parent}' (level {parent_level})"
    )]
    LevelNotIncreasing {
        /// Parent section name.
        parent: String,
        /// Parent level.
        parent_level: u8,
        /// Child section name.
        child: String,
        /// Child level.
        child_level: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn builder_links_children() {
        let mut builder = RuleModel::builder();
        let title = builder.add_root(SectionRule::new("title", 0, Severity::Error));
        let intro = builder.add_child(title, SectionRule::new("introduction", 1, Severity::Error));
        let model = builder.build().unwrap();

        assert_eq!(model.roots(), &[title]);
        assert_eq!(model.section(title).unwrap().children(), &[intro]);
        assert_eq!(model.title_rule(), Some(title));
        assert!(model.has_sections());
    }

    #[test]
    fn child_level_must_increase() {
        let mut builder = RuleModel::builder();
        let parent = builder.add_root(SectionRule::new("chapter", 1, Severity::Error));
        builder.add_child(parent, SectionRule::new("peer", 1, Severity::Error));
        let errors = builder.build().unwrap_err();
        assert!(matches!(errors[0], ModelError::LevelNotIncreasing { .. }));
    }

    #[test]
    fn shared_and_dangling_sections_rejected() {
        let mut child = SectionRule::new("child", 2, Severity::Error);
        child.children.push(SectionId(9));
        let mut parent = SectionRule::new("parent", 1, Severity::Error);
        parent.children.push(SectionId(1));
        let errors = RuleModel::new(
            Vec::new(),
            vec![parent, child],
            vec![SectionId(0), SectionId(1)],
        )
        .unwrap_err();

        assert!(errors
            .iter()
            .any(|e| matches!(e, ModelError::DanglingSection { .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ModelError::SharedSection { name } if name == "child")));
    }

    #[test]
    fn empty_model() {
        let model = RuleModel::empty();
        assert!(model.is_empty());
        assert!(!model.has_sections());
        assert!(model.title_rule().is_none());
    }
}
