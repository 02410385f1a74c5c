//! Block kinds and their per-kind constraint payloads.
//!
//! A [`BlockRule`] pairs common data (name, severity, occurrence, order)
//! with a [`BlockConstraints`] tagged union. Each variant holds exactly the
//! constraint vocabulary of its kind, so an image rule cannot carry a
//! `language` constraint.

use super::constraint::{CountRule, NumericRule, Occurrence, SentenceRule, TextRule, ValueSet};
use crate::types::Severity;
use std::fmt;

// ────────────────────────────────────────────
// Kinds
// ────────────────────────────────────────────

/// Content kinds that can carry block rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    /// Plain prose paragraph.
    Paragraph,
    /// Source or listing block.
    Listing,
    /// Literal block.
    Literal,
    /// Table.
    Table,
    /// Block image macro.
    Image,
    /// Audio macro.
    Audio,
    /// Video macro.
    Video,
    /// NOTE / TIP / WARNING / ... block.
    Admonition,
    /// Quote block.
    Quote,
    /// Verse block.
    Verse,
    /// Sidebar block.
    Sidebar,
    /// Example block.
    Example,
    /// Passthrough block.
    Pass,
    /// Unordered list.
    Ulist,
    /// Ordered list.
    Olist,
    /// Description list.
    Dlist,
}

impl BlockKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Paragraph,
        Self::Listing,
        Self::Literal,
        Self::Table,
        Self::Image,
        Self::Audio,
        Self::Video,
        Self::Admonition,
        Self::Quote,
        Self::Verse,
        Self::Sidebar,
        Self::Example,
        Self::Pass,
        Self::Ulist,
        Self::Olist,
        Self::Dlist,
    ];

    /// The node kind tag of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Listing => "listing",
            Self::Literal => "literal",
            Self::Table => "table",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Admonition => "admonition",
            Self::Quote => "quote",
            Self::Verse => "verse",
            Self::Sidebar => "sidebar",
            Self::Example => "example",
            Self::Pass => "pass",
            Self::Ulist => "ulist",
            Self::Olist => "olist",
            Self::Dlist => "dlist",
        }
    }

    /// Maps a node kind tag to a kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────
// Per-kind payloads
// ────────────────────────────────────────────

/// Constraints on paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphRules {
    /// Number of content lines.
    pub lines: Option<CountRule>,
    /// Sentence count and words per sentence.
    pub sentences: Option<SentenceRule>,
    /// The paragraph text.
    pub content: Option<TextRule>,
}

/// Constraints on listing blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRules {
    /// Source language.
    pub language: Option<ValueSet>,
    /// Block title.
    pub title: Option<TextRule>,
    /// Number of code lines.
    pub lines: Option<CountRule>,
    /// Number of `<n>` callout markers.
    pub callouts: Option<CountRule>,
}

/// Constraints on literal blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteralRules {
    /// Block title.
    pub title: Option<TextRule>,
    /// Number of lines.
    pub lines: Option<CountRule>,
}

/// Constraints on tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRules {
    /// Number of columns.
    pub columns: Option<CountRule>,
    /// Number of body rows.
    pub rows: Option<CountRule>,
    /// Header row presence and header cell text.
    pub header: Option<TextRule>,
    /// Table caption.
    pub caption: Option<TextRule>,
}

/// Constraints on block images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRules {
    /// Image target.
    pub url: Option<TextRule>,
    /// Alt text.
    pub alt: Option<TextRule>,
    /// Width in pixels.
    pub width: Option<NumericRule>,
    /// Height in pixels.
    pub height: Option<NumericRule>,
}

/// Constraints on audio blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioRules {
    /// Audio target.
    pub url: Option<TextRule>,
    /// Block title.
    pub title: Option<TextRule>,
    /// Each comma-separated playback option.
    pub options: Option<ValueSet>,
}

/// Constraints on video blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoRules {
    /// Video target.
    pub url: Option<TextRule>,
    /// Width in pixels.
    pub width: Option<NumericRule>,
    /// Height in pixels.
    pub height: Option<NumericRule>,
    /// Poster image.
    pub poster: Option<TextRule>,
    /// Caption (block title).
    pub caption: Option<TextRule>,
}

/// Constraints on admonitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdmonitionRules {
    /// Admonition label, e.g. `NOTE`.
    pub variant: Option<ValueSet>,
    /// Block title.
    pub title: Option<TextRule>,
    /// Body text.
    pub content: Option<TextRule>,
}

/// Constraints on quote and verse blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteRules {
    /// Who is quoted.
    pub attribution: Option<TextRule>,
    /// Title of the cited work.
    pub citation: Option<TextRule>,
    /// Quoted text.
    pub content: Option<TextRule>,
}

/// Constraints on sidebars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarRules {
    /// Block title.
    pub title: Option<TextRule>,
    /// Body text.
    pub content: Option<TextRule>,
}

/// Constraints on example blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleRules {
    /// Block title.
    pub title: Option<TextRule>,
    /// Body text.
    pub content: Option<TextRule>,
    /// Collapsible option value.
    pub collapsible: Option<ValueSet>,
}

/// Constraints on passthrough blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassRules {
    /// Raw passthrough content.
    pub content: Option<TextRule>,
    /// Justification attribute for the passthrough.
    pub reason: Option<TextRule>,
}

/// Constraints on ordered and unordered lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRules {
    /// Number of top-level items.
    pub items: Option<CountRule>,
    /// Depth of nested lists.
    pub nesting: Option<CountRule>,
    /// Text of each item.
    pub item: Option<TextRule>,
    /// List marker or numbering style.
    pub marker: Option<ValueSet>,
}

/// Constraints on description lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DlistRules {
    /// Number of entries.
    pub terms: Option<CountRule>,
    /// Text of each term.
    pub term: Option<TextRule>,
    /// Text of each description.
    pub description: Option<TextRule>,
}

/// Kind-tagged constraint payload of a block rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockConstraints {
    /// Paragraph constraints.
    Paragraph(ParagraphRules),
    /// Listing constraints.
    Listing(ListingRules),
    /// Literal constraints.
    Literal(LiteralRules),
    /// Table constraints.
    Table(TableRules),
    /// Image constraints.
    Image(ImageRules),
    /// Audio constraints.
    Audio(AudioRules),
    /// Video constraints.
    Video(VideoRules),
    /// Admonition constraints.
    Admonition(AdmonitionRules),
    /// Quote constraints.
    Quote(QuoteRules),
    /// Verse constraints.
    Verse(QuoteRules),
    /// Sidebar constraints.
    Sidebar(SidebarRules),
    /// Example constraints.
    Example(ExampleRules),
    /// Passthrough constraints.
    Pass(PassRules),
    /// Unordered list constraints.
    Ulist(ListRules),
    /// Ordered list constraints.
    Olist(ListRules),
    /// Description list constraints.
    Dlist(DlistRules),
}

impl BlockConstraints {
    /// A payload without any constraints for the given kind.
    #[must_use]
    pub fn unconstrained(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Paragraph => Self::Paragraph(ParagraphRules::default()),
            BlockKind::Listing => Self::Listing(ListingRules::default()),
            BlockKind::Literal => Self::Literal(LiteralRules::default()),
            BlockKind::Table => Self::Table(TableRules::default()),
            BlockKind::Image => Self::Image(ImageRules::default()),
            BlockKind::Audio => Self::Audio(AudioRules::default()),
            BlockKind::Video => Self::Video(VideoRules::default()),
            BlockKind::Admonition => Self::Admonition(AdmonitionRules::default()),
            BlockKind::Quote => Self::Quote(QuoteRules::default()),
            BlockKind::Verse => Self::Verse(QuoteRules::default()),
            BlockKind::Sidebar => Self::Sidebar(SidebarRules::default()),
            BlockKind::Example => Self::Example(ExampleRules::default()),
            BlockKind::Pass => Self::Pass(PassRules::default()),
            BlockKind::Ulist => Self::Ulist(ListRules::default()),
            BlockKind::Olist => Self::Olist(ListRules::default()),
            BlockKind::Dlist => Self::Dlist(DlistRules::default()),
        }
    }

    /// The kind this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Paragraph(_) => BlockKind::Paragraph,
            Self::Listing(_) => BlockKind::Listing,
            Self::Literal(_) => BlockKind::Literal,
            Self::Table(_) => BlockKind::Table,
            Self::Image(_) => BlockKind::Image,
            Self::Audio(_) => BlockKind::Audio,
            Self::Video(_) => BlockKind::Video,
            Self::Admonition(_) => BlockKind::Admonition,
            Self::Quote(_) => BlockKind::Quote,
            Self::Verse(_) => BlockKind::Verse,
            Self::Sidebar(_) => BlockKind::Sidebar,
            Self::Example(_) => BlockKind::Example,
            Self::Pass(_) => BlockKind::Pass,
            Self::Ulist(_) => BlockKind::Ulist,
            Self::Olist(_) => BlockKind::Olist,
            Self::Dlist(_) => BlockKind::Dlist,
        }
    }
}

// ────────────────────────────────────────────
// Block rule
// ────────────────────────────────────────────

/// Rule for one kind of block within a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRule {
    name: String,
    severity: Severity,
    occurrence: Option<Occurrence>,
    order: Option<u32>,
    constraints: BlockConstraints,
}

impl BlockRule {
    /// Creates a block rule named after its kind.
    #[must_use]
    pub fn new(constraints: BlockConstraints, severity: Severity) -> Self {
        Self {
            name: constraints.kind().as_str().to_string(),
            severity,
            occurrence: None,
            order: None,
            constraints,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets occurrence bounds among sibling blocks.
    #[must_use]
    pub fn with_occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrence = Some(occurrence);
        self
    }

    /// Sets the order tag among sibling blocks.
    #[must_use]
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind this rule applies to.
    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.constraints.kind()
    }

    /// Returns the default severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the occurrence bounds.
    #[must_use]
    pub fn occurrence(&self) -> Option<&Occurrence> {
        self.occurrence.as_ref()
    }

    /// Returns the order tag.
    #[must_use]
    pub fn order(&self) -> Option<u32> {
        self.order
    }

    /// Returns the constraint payload.
    #[must_use]
    pub fn constraints(&self) -> &BlockConstraints {
        &self.constraints
    }
}
