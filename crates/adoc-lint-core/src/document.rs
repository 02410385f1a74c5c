//! Annotated document tree produced by an external parser.
//!
//! The engine never parses AsciiDoc itself. A parser hands over a
//! [`Document`]: header attributes, a tree of [`Node`]s with coarse line
//! coordinates, and the raw source text used for exact span location.

use crate::source::SourceText;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Kind tag of section nodes.
pub const SECTION_KIND: &str = "section";
/// Kind tag of list items inside `ulist` / `olist` nodes.
pub const LIST_ITEM_KIND: &str = "list_item";
/// Kind tag of entries inside `dlist` nodes.
pub const DLIST_ITEM_KIND: &str = "dlist_item";
/// Kind tag of table rows.
pub const TABLE_ROW_KIND: &str = "table_row";
/// Kind tag of table cells.
pub const TABLE_CELL_KIND: &str = "table_cell";

/// A header attribute entry (`:name: value`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttributeEntry {
    /// Attribute name without colons.
    pub name: String,
    /// Attribute value; empty when only the name was given.
    #[serde(default)]
    pub value: String,
    /// Line of the entry.
    pub line: usize,
}

impl AttributeEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            line,
        }
    }
}

/// A node of the document tree: a section, a block, or a block part.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Node {
    /// Kind tag, e.g. `section`, `paragraph`, `listing`.
    pub kind: String,
    /// Section level (0 = document title); only set on sections.
    #[serde(default)]
    pub level: Option<u8>,
    /// Section title or block title.
    #[serde(default)]
    pub title: Option<String>,
    /// Raw block attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Raw body text.
    #[serde(default)]
    pub content: Option<String>,
    /// Ordered child nodes.
    #[serde(default)]
    pub children: Vec<Node>,
    /// First line of the node.
    pub line: usize,
    /// Last line of the node, when known.
    #[serde(default)]
    pub end_line: Option<usize>,
}

impl Node {
    /// Creates a node of any kind.
    #[must_use]
    pub fn new(kind: impl Into<String>, line: usize) -> Self {
        Self {
            kind: kind.into(),
            level: None,
            title: None,
            attributes: BTreeMap::new(),
            content: None,
            children: Vec::new(),
            line,
            end_line: None,
        }
    }

    /// Creates a section node.
    #[must_use]
    pub fn section(level: u8, title: impl Into<String>, line: usize) -> Self {
        let mut node = Self::new(SECTION_KIND, line);
        node.level = Some(level);
        node.title = Some(title.into());
        node
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets one attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the last line.
    #[must_use]
    pub fn ending_at(mut self, line: usize) -> Self {
        self.end_line = Some(line);
        self
    }

    /// Returns true for section nodes.
    #[must_use]
    pub fn is_section(&self) -> bool {
        self.kind == SECTION_KIND
    }

    /// Looks up a raw attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Last line of the node, estimated from content when not given.
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.end_line.unwrap_or_else(|| {
            let body = self.content.as_deref().map_or(0, |c| c.lines().count());
            // Delimiters and attribute lines may surround the body.
            self.line.saturating_add(body).saturating_add(1)
        })
    }

    /// Direct children of the given kind.
    pub fn children_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.kind == kind)
    }
}

/// A parsed document ready for validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Document {
    /// Path reported in findings.
    pub file: PathBuf,
    /// Raw source text.
    #[serde(default)]
    pub source: SourceText,
    /// Header attributes in source order.
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
    /// Top-level nodes.
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Document {
    /// Creates a document from its path and raw text.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, source: &str) -> Self {
        Self {
            file: file.into(),
            source: SourceText::new(source),
            attributes: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Parses a document tree from the external parser's JSON output.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a document tree.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replaces the source text.
    #[must_use]
    pub fn with_source(mut self, source: &str) -> Self {
        self.source = SourceText::new(source);
        self
    }

    /// Adds a header attribute.
    #[must_use]
    pub fn with_attribute(mut self, entry: AttributeEntry) -> Self {
        self.attributes.push(entry);
        self
    }

    /// Adds a top-level node.
    #[must_use]
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// The file path as a `Path`.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Looks up a header attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeEntry> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// The level-0 section, if the document has a title.
    #[must_use]
    pub fn title_section(&self) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|n| n.is_section() && n.level == Some(0))
    }

    /// Line of the document header (title line, or line 1).
    #[must_use]
    pub fn header_line(&self) -> usize {
        self.title_section().map_or(1, |n| n.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_document_tree() {
        let json = r#"{
            "file": "guide.adoc",
            "source": "= Guide\n:author: Ann\n\n== Intro\n\nHello.",
            "attributes": [{"name": "author", "value": "Ann", "line": 2}],
            "nodes": [{
                "kind": "section", "level": 0, "title": "Guide", "line": 1,
                "children": [{
                    "kind": "section", "level": 1, "title": "Intro", "line": 4,
                    "children": [{"kind": "paragraph", "line": 6, "content": "Hello."}]
                }]
            }]
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.file, PathBuf::from("guide.adoc"));
        assert_eq!(doc.source.line(4), Some("== Intro"));
        assert_eq!(doc.attribute("author").unwrap().line, 2);
        let title = doc.title_section().unwrap();
        assert_eq!(title.children[0].children[0].kind, "paragraph");
        assert_eq!(doc.header_line(), 1);
    }

    #[test]
    fn source_is_optional_in_json() {
        let doc = Document::from_json(r#"{"file": "a.adoc"}"#).unwrap();
        assert!(doc.source.is_empty());
        assert!(doc.nodes.is_empty());
        assert_eq!(doc.header_line(), 1);
    }

    #[test]
    fn node_builders() {
        let node = Node::new("listing", 5)
            .with_attribute("language", "rust")
            .with_content("fn main() {}")
            .ending_at(7);
        assert_eq!(node.attribute("language"), Some("rust"));
        assert_eq!(node.last_line(), 7);
        assert!(!node.is_section());
        assert!(Node::section(1, "Intro", 3).is_section());
    }

    #[test]
    fn last_line_is_estimated_from_content() {
        let node = Node::new("quote", 10).with_content("a\nb");
        assert_eq!(node.last_line(), 13);
    }

    #[test]
    fn estimated_last_line_saturates() {
        let node = Node::new("verse", usize::MAX).with_content("a\nb");
        assert_eq!(node.last_line(), usize::MAX);
    }
}
