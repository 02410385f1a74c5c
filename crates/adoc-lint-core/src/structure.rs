//! Section hierarchy and block placement.
//!
//! Each parent scope (the document root or a bound section) is walked over
//! its ordered children with a fresh [`OccurrenceCounter`]. Sections are
//! bound to the scope's child rules by level, preferring a rule whose title
//! pattern matches; blocks are bound to the scope's block rules by kind tag.
//! Every child inspection is a `Result`, so a fault in one node becomes a
//! single internal finding and its siblings are still checked.

use crate::blocks::{self, BlockContext, NodeFault, MAX_DEPTH};
use crate::document::{Document, Node};
use crate::eval::occurrence::{self, OccurrenceCounter, Subject};
use crate::eval::order::{self, OrderTracker};
use crate::eval::{field, Target};
use crate::model::{BlockRule, RuleModel, SectionId, SectionRule};
use crate::source::Locator;
use crate::types::{FindingKind, Severity, SourceLocation, ValidationMessage};
use tracing::{debug, warn};

/// Rule id of internal-fault findings.
pub const INTERNAL_RULE_ID: &str = "validator.internal";

/// Checks the document's section tree and blocks against the model.
///
/// Does nothing when the model declares no sections.
#[must_use]
pub fn validate_structure(document: &Document, model: &RuleModel) -> Vec<ValidationMessage> {
    if !model.has_sections() {
        debug!("No section rules; skipping structural validation");
        return Vec::new();
    }
    let walker = Walker {
        model,
        locator: Locator::new(document.path(), &document.source),
    };
    let header = walker.locator.whole_line(document.header_line());

    match (model.title_rule(), document.title_section()) {
        (Some(title), None) => {
            let mut messages = Vec::new();
            match walker.rule(title) {
                Ok(rule) => {
                    messages.extend(walker.missing_title(rule, &header));
                    let scope = Scope::Section(title, rule);
                    messages.extend(walker.walk(scope, &document.nodes, &header, 1));
                }
                Err(fault) => messages.push(walker.internal(&fault, header)),
            }
            messages
        }
        _ => walker.walk(Scope::Root, &document.nodes, &header, 0),
    }
}

// ────────────────────────────────────────────
// Scopes
// ────────────────────────────────────────────

/// Key of one rule within a scope's occurrence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum RuleKey {
    Section(SectionId),
    Block(usize),
}

/// A parent whose children are being checked.
#[derive(Debug, Clone, Copy)]
enum Scope<'m> {
    /// Top level of the document, governed by the model's roots.
    Root,
    /// Inside a section bound to a rule.
    Section(SectionId, &'m SectionRule),
}

impl<'m> Scope<'m> {
    fn name(self) -> &'m str {
        match self {
            Scope::Root => "document",
            Scope::Section(_, rule) => rule.name(),
        }
    }

    fn severity(self) -> Severity {
        match self {
            Scope::Root => Severity::Error,
            Scope::Section(_, rule) => rule.severity(),
        }
    }

    fn block_rules(self) -> &'m [BlockRule] {
        match self {
            Scope::Root => &[],
            Scope::Section(_, rule) => rule.blocks(),
        }
    }
}

/// Order trackers of one scope.
#[derive(Debug, Default)]
struct Trackers {
    sections: OrderTracker,
    blocks: OrderTracker,
}

struct Walker<'a> {
    model: &'a RuleModel,
    locator: Locator<'a>,
}

impl<'a> Walker<'a> {
    fn rule(&self, id: SectionId) -> Result<&'a SectionRule, NodeFault> {
        self.model
            .section(id)
            .ok_or(NodeFault::DanglingSection { id })
    }

    fn child_rules(&self, scope: Scope<'a>) -> &'a [SectionId] {
        match scope {
            Scope::Root => self.model.roots(),
            Scope::Section(_, rule) => rule.children(),
        }
    }

    /// Checks the children of one scope.
    fn walk(
        &self,
        scope: Scope<'a>,
        nodes: &[Node],
        scope_location: &SourceLocation,
        depth: usize,
    ) -> Vec<ValidationMessage> {
        let mut counter = OccurrenceCounter::new();
        let mut trackers = Trackers::default();
        let mut messages = Vec::new();

        for node in nodes {
            match self.visit(scope, node, depth, &mut counter, &mut trackers) {
                Ok(found) => messages.extend(found),
                Err(fault) => {
                    warn!(
                        "Node at {}:{} skipped: {fault}",
                        self.locator.file().display(),
                        node.line
                    );
                    messages.push(self.internal(&fault, self.locator.whole_line(node.line)));
                }
            }
        }

        for id in self.child_rules(scope) {
            let rule = match self.rule(*id) {
                Ok(rule) => rule,
                Err(fault) => {
                    messages.push(self.internal(&fault, scope_location.clone()));
                    continue;
                }
            };
            let subject = Subject {
                scope: "section",
                noun: "Section",
                name: rule.name(),
            };
            let tally = counter.tally(RuleKey::Section(*id));
            if let Some(mut message) =
                occurrence::check(rule.occurrence(), subject, tally, scope_location)
            {
                if rule.level() == 0 && tally.is_none() {
                    message.message = "Document title is required".to_string();
                }
                messages.push(message);
            }
        }

        for (index, block) in scope.block_rules().iter().enumerate() {
            let Some(occurrence) = block.occurrence() else {
                continue;
            };
            let subject = Subject {
                scope: "block",
                noun: "Block",
                name: block.name(),
            };
            messages.extend(occurrence::check(
                occurrence,
                subject,
                counter.tally(RuleKey::Block(index)),
                scope_location,
            ));
        }
        messages
    }

    fn visit(
        &self,
        scope: Scope<'a>,
        node: &Node,
        depth: usize,
        counter: &mut OccurrenceCounter<RuleKey>,
        trackers: &mut Trackers,
    ) -> Result<Vec<ValidationMessage>, NodeFault> {
        if depth > MAX_DEPTH {
            return Err(NodeFault::TooDeep {
                line: node.line,
                max: MAX_DEPTH,
            });
        }
        if node.is_section() {
            self.visit_section(scope, node, depth, counter, &mut trackers.sections)
        } else {
            self.visit_block(scope, node, counter, &mut trackers.blocks)
        }
    }

    fn visit_section(
        &self,
        scope: Scope<'a>,
        node: &Node,
        depth: usize,
        counter: &mut OccurrenceCounter<RuleKey>,
        tracker: &mut OrderTracker,
    ) -> Result<Vec<ValidationMessage>, NodeFault> {
        let level = node.level.ok_or(NodeFault::MissingLevel { line: node.line })?;
        let title = node.title.as_deref().unwrap_or_default();
        let location = self
            .locator
            .section_title(node.line, title)
            .unwrap_or_else(|| self.locator.whole_line(node.line));

        let mut candidates = Vec::new();
        for id in self.child_rules(scope) {
            let rule = self.rule(*id)?;
            if rule.level() == level {
                candidates.push((*id, rule));
            }
        }
        let by_title = candidates
            .iter()
            .find(|(_, rule)| rule.title_matches(title))
            .copied();
        let title_bound = by_title.is_some();
        let Some((id, rule)) = by_title.or_else(|| candidates.first().copied()) else {
            debug!("No rule for level {level} section '{title}' in '{}'", scope.name());
            return Ok(vec![ValidationMessage::new(
                scope.severity(),
                "section.unexpected",
                format!("Section not allowed at level {level}"),
                location,
            )
            .with_kind(FindingKind::UnexpectedSection)
            .with_actual(title)]);
        };
        debug!("Section '{title}' bound to rule '{}'", rule.name());

        let mut messages = Vec::new();
        counter.record(RuleKey::Section(id), location.clone());
        // A fallback binding does not identify the section, so it says nothing about order.
        if let Some(order) = rule.order().filter(|_| title_bound) {
            if let Some(later) = tracker.record(order, rule.name()) {
                messages.push(order::violation(
                    "section",
                    "Section",
                    rule.name(),
                    &later,
                    rule.severity(),
                    location.clone(),
                ));
            }
        }
        if let Some(title_rule) = rule.title() {
            let target = Target::new(
                "section.title",
                "Section title",
                node.title.as_deref(),
                location.clone(),
            );
            messages.extend(field::check_text(title_rule, &target, &self.locator));
        }
        let inner = Scope::Section(id, rule);
        messages.extend(self.walk(inner, &node.children, &location, depth + 1));
        Ok(messages)
    }

    fn visit_block(
        &self,
        scope: Scope<'a>,
        node: &Node,
        counter: &mut OccurrenceCounter<RuleKey>,
        tracker: &mut OrderTracker,
    ) -> Result<Vec<ValidationMessage>, NodeFault> {
        let Scope::Section(_, section) = scope else {
            return Ok(Vec::new());
        };
        if section.blocks().is_empty() {
            return Ok(Vec::new());
        }
        let location = self.locator.whole_line(node.line);
        let Some((index, rule)) = section.block_rule_for(&node.kind) else {
            debug!("Block '{}' has no rule in '{}'", node.kind, section.name());
            return Ok(vec![ValidationMessage::new(
                section.severity(),
                "block.type",
                format!(
                    "Block type '{}' is not allowed in section '{}'",
                    node.kind,
                    section.name()
                ),
                location,
            )
            .with_kind(FindingKind::UnknownBlockType)
            .with_actual(node.kind.as_str())]);
        };

        let mut messages = Vec::new();
        counter.record(RuleKey::Block(index), location.clone());
        if let Some(order) = rule.order() {
            if let Some(later) = tracker.record(order, rule.name()) {
                messages.push(order::violation(
                    "block",
                    "Block",
                    rule.name(),
                    &later,
                    rule.severity(),
                    location,
                ));
            }
        }
        messages.extend(blocks::evaluate(&BlockContext::new(node, rule, self.locator))?);
        Ok(messages)
    }

    fn missing_title(
        &self,
        rule: &SectionRule,
        header: &SourceLocation,
    ) -> Option<ValidationMessage> {
        let subject = Subject {
            scope: "section",
            noun: "Section",
            name: rule.name(),
        };
        occurrence::check(rule.occurrence(), subject, None, header).map(|mut message| {
            message.message = "Document title is required".to_string();
            message
        })
    }

    fn internal(&self, fault: &NodeFault, location: SourceLocation) -> ValidationMessage {
        ValidationMessage::new(
            Severity::Error,
            INTERNAL_RULE_ID,
            format!("Internal error while validating node: {fault}"),
            location,
        )
        .with_kind(FindingKind::InternalFault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BlockConstraints, BlockKind, ListingRules, Occurrence, Pattern, TextRule, ValueSet,
    };

    fn ids(messages: &[ValidationMessage]) -> Vec<&str> {
        messages.iter().map(|m| m.rule_id.as_str()).collect()
    }

    fn title_only_model(min: usize) -> RuleModel {
        let mut builder = RuleModel::builder();
        builder.add_root(
            SectionRule::new("title", 0, Severity::Error)
                .with_occurrence(Occurrence::new(min, Some(1), Severity::Error)),
        );
        builder.build().unwrap()
    }

    fn ordered_model() -> RuleModel {
        let mut builder = RuleModel::builder();
        let root = builder.add_root(
            SectionRule::new("title", 0, Severity::Error)
                .with_occurrence(Occurrence::new(1, Some(1), Severity::Error)),
        );
        builder.add_child(
            root,
            SectionRule::new("introduction", 1, Severity::Error)
                .with_order(1)
                .with_title(
                    TextRule::new(Severity::Error)
                        .pattern(Pattern::new("^Introduction$").unwrap()),
                ),
        );
        builder.add_child(
            root,
            SectionRule::new("installation", 1, Severity::Error)
                .with_order(2)
                .with_title(
                    TextRule::new(Severity::Error)
                        .pattern(Pattern::new("^Installation$").unwrap()),
                )
                .with_occurrence(Occurrence::new(0, Some(1), Severity::Warn))
                .with_block(BlockRule::new(
                    BlockConstraints::Listing(ListingRules {
                        language: Some(ValueSet::new(["rust"], Severity::Error).required()),
                        ..ListingRules::default()
                    }),
                    Severity::Error,
                )),
        );
        builder.build().unwrap()
    }

    const GUIDE: &str = "= Guide\n\n== Installation\n\n== Introduction\n";

    fn guide(sections: Vec<Node>) -> Document {
        let title = sections
            .into_iter()
            .fold(Node::section(0, "Guide", 1), Node::with_child);
        Document::new("g.adoc", GUIDE).with_node(title)
    }

    #[test]
    fn missing_document_title() {
        let doc = Document::new("g.adoc", "Just text.");
        let msgs = validate_structure(&doc, &title_only_model(1));
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].severity, Severity::Error);
        assert_eq!(msgs[0].rule_id, "section.occurrence.min");
        assert_eq!(msgs[0].message, "Document title is required");
    }

    #[test]
    fn optional_document_title_may_be_absent() {
        let doc = Document::new("g.adoc", "Just text.");
        assert!(validate_structure(&doc, &title_only_model(0)).is_empty());
    }

    #[test]
    fn reversed_sections_are_an_order_violation() {
        let doc = guide(vec![
            Node::section(1, "Installation", 3),
            Node::section(1, "Introduction", 5),
        ]);
        let msgs = validate_structure(&doc, &ordered_model());
        assert_eq!(ids(&msgs), vec!["section.order"]);
        assert_eq!(
            msgs[0].message,
            "Section order violation: introduction appears after installation"
        );
        assert_eq!(msgs[0].location.to_string(), "g.adoc:5:4-15");
    }

    #[test]
    fn section_without_matching_level_is_unexpected() {
        let doc = guide(vec![Node::section(3, "Deep", 3)]);
        let msgs = validate_structure(&doc, &ordered_model());
        assert_eq!(ids(&msgs), vec!["section.unexpected"]);
        assert_eq!(msgs[0].message, "Section not allowed at level 3");
    }

    #[test]
    fn failing_title_still_counts_for_occurrence() {
        let doc = guide(vec![
            Node::section(1, "Setup", 3),
            Node::section(1, "Installation", 5),
            Node::section(1, "Installation", 7),
        ]);
        let msgs = validate_structure(&doc, &ordered_model());
        assert_eq!(
            ids(&msgs),
            vec!["section.title.pattern", "section.occurrence.max"]
        );
        assert_eq!(msgs[0].message, "Section title does not match required pattern");
        assert_eq!(msgs[1].severity, Severity::Warn);
    }

    #[test]
    fn unmatched_title_does_not_take_part_in_order() {
        let doc = guide(vec![
            Node::section(1, "Installation", 3),
            Node::section(1, "Appendix", 5),
        ]);
        let msgs = validate_structure(&doc, &ordered_model());
        assert_eq!(ids(&msgs), vec!["section.title.pattern"]);
    }

    #[test]
    fn title_pattern_must_match_whole_title() {
        let mut builder = RuleModel::builder();
        let root = builder.add_root(SectionRule::new("title", 0, Severity::Error));
        builder.add_child(
            root,
            SectionRule::new("introduction", 1, Severity::Error).with_title(
                TextRule::new(Severity::Error).pattern(Pattern::new("Introduction").unwrap()),
            ),
        );
        let model = builder.build().unwrap();

        let doc = guide(vec![Node::section(1, "Introduction to nothing", 3)]);
        let msgs = validate_structure(&doc, &model);
        assert_eq!(ids(&msgs), vec!["section.title.pattern"]);

        let doc = guide(vec![Node::section(1, "Introduction", 3)]);
        assert!(validate_structure(&doc, &model).is_empty());
    }

    #[test]
    fn disallowed_block_and_evaluated_block() {
        let install = Node::section(1, "Installation", 3)
            .with_child(Node::new("table", 5))
            .with_child(Node::new("listing", 7).with_content("make").ending_at(9));
        let doc = guide(vec![install]);
        let msgs = validate_structure(&doc, &ordered_model());
        assert_eq!(ids(&msgs), vec!["block.type", "listing.language.required"]);
        assert_eq!(
            msgs[0].message,
            "Block type 'table' is not allowed in section 'installation'"
        );
    }

    #[test]
    fn fault_becomes_one_internal_finding_and_siblings_continue() {
        let broken = Node::new("section", 3).with_title("Broken");
        let doc = guide(vec![broken, Node::section(1, "Intro", 5)]);
        let msgs = validate_structure(&doc, &ordered_model());
        assert_eq!(ids(&msgs), vec![INTERNAL_RULE_ID, "section.title.pattern"]);
        assert_eq!(msgs[0].kind, Some(FindingKind::InternalFault));
        assert_eq!(msgs[0].severity, Severity::Error);
    }

    #[test]
    fn empty_model_skips_structure() {
        let doc = guide(vec![Node::section(1, "Anything", 3)]);
        assert!(validate_structure(&doc, &RuleModel::empty()).is_empty());
    }

    #[test]
    fn unconstrained_sections_accept_any_block() {
        let doc = guide(vec![
            Node::section(1, "Introduction", 5)
                .with_child(Node::new(BlockKind::Video.as_str(), 6)),
        ]);
        assert!(validate_structure(&doc, &ordered_model()).is_empty());
    }
}
