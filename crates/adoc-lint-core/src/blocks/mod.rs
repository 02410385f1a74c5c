//! Per-kind block evaluators.
//!
//! Dispatch is a static table from [`BlockKind`] to a plain function. Each
//! evaluator destructures its own [`BlockConstraints`] variant, locates the
//! values it needs and hands them to the generic evaluators in
//! [`crate::eval`].

mod code;
mod lists;
mod media;
mod prose;
mod quotes;
mod table;

use crate::document::Node;
use crate::eval::{capitalize, Target};
use crate::model::{BlockKind, BlockRule, SectionId};
use crate::source::Locator;
use crate::types::{Placeholder, SourceLocation, ValidationMessage};

/// Maximum nesting depth inspected before a node is treated as faulty.
pub const MAX_DEPTH: usize = 64;

/// Evaluates one block node against its rule.
pub type BlockEvaluator = fn(&BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault>;

static EVALUATORS: &[(BlockKind, BlockEvaluator)] = &[
    (BlockKind::Paragraph, prose::paragraph),
    (BlockKind::Listing, code::listing),
    (BlockKind::Literal, code::literal),
    (BlockKind::Table, table::table),
    (BlockKind::Image, media::image),
    (BlockKind::Audio, media::audio),
    (BlockKind::Video, media::video),
    (BlockKind::Admonition, prose::admonition),
    (BlockKind::Quote, quotes::quote),
    (BlockKind::Verse, quotes::quote),
    (BlockKind::Sidebar, prose::sidebar),
    (BlockKind::Example, prose::example),
    (BlockKind::Pass, prose::pass),
    (BlockKind::Ulist, lists::list),
    (BlockKind::Olist, lists::list),
    (BlockKind::Dlist, lists::dlist),
];

/// Looks up the evaluator of a kind.
#[must_use]
pub fn evaluator_for(kind: BlockKind) -> Option<BlockEvaluator> {
    EVALUATORS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, evaluator)| *evaluator)
}

/// Evaluates a block node with the evaluator of its rule's kind.
///
/// # Errors
///
/// Returns a fault if the node's kind tag does not match the rule, or the
/// evaluator cannot inspect the node.
pub fn evaluate(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let kind = ctx.rule.kind();
    if BlockKind::from_tag(&ctx.node.kind) != Some(kind) {
        return Err(ctx.mismatch());
    }
    let evaluator = evaluator_for(kind).ok_or(NodeFault::NoEvaluator { kind })?;
    evaluator(ctx)
}

/// Faults raised while inspecting a single node.
///
/// A fault never aborts validation; it becomes one internal finding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeFault {
    /// A section node carries no level.
    #[error("section node at line {line} has no level")]
    MissingLevel {
        /// Line of the node.
        line: usize,
    },

    /// A rule refers to a section id that does not exist.
    #[error("rule refers to unknown section {id}")]
    DanglingSection {
        /// The dangling id.
        id: SectionId,
    },

    /// A rule's payload does not belong to the node's kind.
    #[error("node `{found}` at line {line} was matched to a `{expected}` rule")]
    PayloadMismatch {
        /// Kind of the rule payload.
        expected: BlockKind,
        /// Kind tag of the node.
        found: String,
        /// Line of the node.
        line: usize,
    },

    /// No evaluator is registered for a kind.
    #[error("no evaluator for block kind `{kind}`")]
    NoEvaluator {
        /// The kind without evaluator.
        kind: BlockKind,
    },

    /// Nodes are nested deeper than [`MAX_DEPTH`].
    #[error("nesting deeper than {max} levels at line {line}")]
    TooDeep {
        /// Line of the node.
        line: usize,
        /// The depth limit.
        max: usize,
    },
}

/// Everything an evaluator needs about one block.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    /// The block node.
    pub node: &'a Node,
    /// The rule bound to the node.
    pub rule: &'a BlockRule,
    /// Locator for the node's file.
    pub locator: Locator<'a>,
}

impl<'a> BlockContext<'a> {
    /// Creates a context.
    #[must_use]
    pub fn new(node: &'a Node, rule: &'a BlockRule, locator: Locator<'a>) -> Self {
        Self {
            node,
            rule,
            locator,
        }
    }

    fn kind(&self) -> BlockKind {
        self.rule.kind()
    }

    fn mismatch(&self) -> NodeFault {
        NodeFault::PayloadMismatch {
            expected: self.kind(),
            found: self.node.kind.clone(),
            line: self.node.line,
        }
    }

    /// Rule id prefix of a field, e.g. `listing.language`.
    fn prefix(&self, field: &str) -> String {
        format!("{}.{field}", self.kind())
    }

    /// Message subject of a field, e.g. `Listing language`.
    fn label(&self, field: &str) -> String {
        format!("{} {field}", capitalize(self.kind().as_str()))
    }

    /// Span of the node's first line.
    fn node_location(&self) -> SourceLocation {
        self.locator.whole_line(self.node.line)
    }

    /// Block title (`.Title` above the block).
    fn title_target(&self, field: &str) -> Target<'a> {
        let node = self.node;
        match node.title.as_deref() {
            Some(title) => {
                let location = self
                    .locator
                    .find(node.line.saturating_sub(3), node.line, title.trim())
                    .unwrap_or_else(|| self.node_location());
                Target::new(self.prefix(field), self.label(field), Some(title), location)
            }
            None => Target::new(
                self.prefix(field),
                self.label(field),
                None,
                self.locator.line_start(node.line),
            )
            .with_placeholder(Placeholder::own_line(format!(".«{field}»"))),
        }
    }

    /// Block body text.
    fn content_target(&self, field: &str) -> Target<'a> {
        let node = self.node;
        let content = node.content.as_deref();
        let location = content
            .and_then(|c| self.locator.content(node.line, node.last_line(), c))
            .unwrap_or_else(|| self.node_location());
        Target::new(self.prefix(field), self.label(field), content, location)
    }

    /// A block attribute, located in the attribute list when possible.
    ///
    /// `position` is the attribute's positional index in the list;
    /// `own_line` is the template for a synthetic attribute line when the
    /// block has none (`{}` marks the insertion point).
    fn attribute_target(
        &self,
        field: &str,
        attribute: &str,
        position: Option<usize>,
        own_line: &str,
    ) -> Target<'a> {
        let node = self.node;
        match node.attribute(attribute) {
            Some(value) => Target::new(
                self.prefix(field),
                self.label(field),
                Some(value),
                self.attribute_location(attribute, position, value),
            ),
            None => {
                let (location, placeholder) = self.locator.list_insertion(node.line, field, own_line);
                Target::new(self.prefix(field), self.label(field), None, location)
                    .with_placeholder(placeholder)
            }
        }
    }

    fn attribute_location(
        &self,
        attribute: &str,
        position: Option<usize>,
        value: &str,
    ) -> SourceLocation {
        let value = value.trim();
        let in_list = self
            .locator
            .attribute_list(self.node.line)
            .and_then(|(line, list)| {
                let field = list
                    .named(attribute)
                    .or_else(|| position.and_then(|i| list.fields.get(i).cloned()))?;
                (field.text == value).then(|| self.locator.field(line, &field))
            });
        in_list
            .or_else(|| {
                self.locator
                    .find(self.node.line.saturating_sub(2), self.node.last_line(), value)
            })
            .unwrap_or_else(|| self.node_location())
    }

    /// Span of a child's text on its own lines.
    fn child_location(&self, child: &Node, text: &str) -> SourceLocation {
        self.locator
            .content(child.line, child.last_line(), text)
            .unwrap_or_else(|| self.locator.whole_line(child.line))
    }
}

/// Number of lines of a block body.
fn line_count(content: Option<&str>) -> usize {
    content.map_or(0, |c| c.trim_matches('\n').lines().count())
}
