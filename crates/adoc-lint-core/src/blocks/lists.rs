//! Ordered, unordered and description lists.

use super::{BlockContext, NodeFault, MAX_DEPTH};
use crate::document::{Node, DLIST_ITEM_KIND, LIST_ITEM_KIND};
use crate::eval::{allowed, count, field, Target};
use crate::model::BlockConstraints;
use crate::types::{SourceLocation, ValidationMessage};

pub(super) fn list(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let rules = match ctx.rule.constraints() {
        BlockConstraints::Ulist(rules) | BlockConstraints::Olist(rules) => rules,
        _ => return Err(ctx.mismatch()),
    };
    let node = ctx.node;
    let mut messages = Vec::new();

    if let Some(items) = &rules.items {
        messages.extend(count::check(
            items,
            node.children_of_kind(LIST_ITEM_KIND).count(),
            &ctx.prefix("items"),
            &ctx.label("items"),
            &ctx.node_location(),
        ));
    }
    if let Some(nesting) = &rules.nesting {
        messages.extend(count::check(
            nesting,
            depth(node, 1)?,
            &ctx.prefix("nesting"),
            &ctx.label("nesting"),
            &ctx.node_location(),
        ));
    }
    if let Some(item_rule) = &rules.item {
        for item in node.children_of_kind(LIST_ITEM_KIND) {
            let text = item_text(item);
            let target = Target::new(
                ctx.prefix("item"),
                ctx.label("item"),
                text,
                located(ctx, item, text),
            );
            messages.extend(field::check_text(item_rule, &target, &ctx.locator));
        }
    }
    if let Some(marker) = &rules.marker {
        let attribute = if node.attribute("marker").is_some() {
            "marker"
        } else {
            "style"
        };
        let target = ctx.attribute_target("marker", attribute, Some(0), "[{}]");
        messages.extend(allowed::check(marker, &target));
    }
    Ok(messages)
}

pub(super) fn dlist(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Dlist(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let node = ctx.node;
    let mut messages = Vec::new();

    if let Some(terms) = &rules.terms {
        messages.extend(count::check(
            terms,
            node.children_of_kind(DLIST_ITEM_KIND).count(),
            "dlist.terms",
            "Dlist terms",
            &ctx.node_location(),
        ));
    }
    for item in node.children_of_kind(DLIST_ITEM_KIND) {
        if let Some(term_rule) = &rules.term {
            let term = item.attribute("term").or(item.title.as_deref());
            let location = term
                .and_then(|t| ctx.locator.find(item.line, item.line, t.trim()))
                .unwrap_or_else(|| ctx.locator.whole_line(item.line));
            let target = Target::new("dlist.term", "Dlist term", term, location);
            messages.extend(field::check_text(term_rule, &target, &ctx.locator));
        }
        if let Some(description_rule) = &rules.description {
            let description = item.content.as_deref();
            let target = Target::new(
                "dlist.description",
                "Dlist description",
                description,
                located(ctx, item, description),
            );
            messages.extend(field::check_text(description_rule, &target, &ctx.locator));
        }
    }
    Ok(messages)
}

/// Depth of nested lists below `list`, counting `list` itself.
fn depth(list: &Node, level: usize) -> Result<usize, NodeFault> {
    if level > MAX_DEPTH {
        return Err(NodeFault::TooDeep {
            line: list.line,
            max: MAX_DEPTH,
        });
    }
    let mut deepest = level;
    for nested in list
        .children
        .iter()
        .flat_map(|item| item.children.iter())
        .filter(|child| is_list(child))
    {
        deepest = deepest.max(depth(nested, level + 1)?);
    }
    Ok(deepest)
}

fn is_list(node: &Node) -> bool {
    matches!(node.kind.as_str(), "ulist" | "olist")
}

fn item_text(item: &Node) -> Option<&str> {
    item.content.as_deref().or(item.title.as_deref())
}

fn located(ctx: &BlockContext<'_>, item: &Node, text: Option<&str>) -> SourceLocation {
    match text {
        Some(t) => ctx.child_location(item, t.trim()),
        None => ctx.locator.whole_line(item.line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::evaluate;
    use crate::model::{BlockRule, CountRule, DlistRules, ListRules, TextRule, ValueSet};
    use crate::source::{Locator, SourceText};
    use crate::types::Severity;
    use std::path::Path;

    fn run(
        source: &str,
        node: &Node,
        constraints: BlockConstraints,
    ) -> Result<Vec<ValidationMessage>, NodeFault> {
        let src = SourceText::new(source);
        let rule = BlockRule::new(constraints, Severity::Warn);
        let ctx = BlockContext::new(node, &rule, Locator::new(Path::new("l.adoc"), &src));
        evaluate(&ctx)
    }

    fn item(line: usize, text: &str) -> Node {
        Node::new(LIST_ITEM_KIND, line).with_content(text)
    }

    #[test]
    fn short_dlist_term() {
        let source = "== Glossary\n\nAPI:: Application programming interface";
        let node = Node::new("dlist", 3).with_child(
            Node::new(DLIST_ITEM_KIND, 3)
                .with_attribute("term", "API")
                .with_content("Application programming interface"),
        );
        let msgs = run(
            source,
            &node,
            BlockConstraints::Dlist(DlistRules {
                term: Some(TextRule::new(Severity::Warn).min_length(10)),
                ..DlistRules::default()
            }),
        )
        .unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].severity, Severity::Warn);
        assert_eq!(msgs[0].rule_id, "dlist.term.length.min");
        assert_eq!(msgs[0].location.to_string(), "l.adoc:3:1-3");
        assert_eq!(msgs[0].actual.as_deref(), Some("API (length: 3)"));
        assert_eq!(msgs[0].expected.as_deref(), Some("Minimum length: 10"));
    }

    #[test]
    fn item_count_and_text() {
        let source = "* one\n* two\n* x";
        let node = Node::new("ulist", 1)
            .with_child(item(1, "one"))
            .with_child(item(2, "two"))
            .with_child(item(3, "x"));
        let msgs = run(
            source,
            &node,
            BlockConstraints::Ulist(ListRules {
                items: Some(CountRule::new(None, Some(2), Severity::Warn)),
                item: Some(TextRule::new(Severity::Info).min_length(2)),
                ..ListRules::default()
            }),
        )
        .unwrap();
        let ids: Vec<&str> = msgs.iter().map(|m| m.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["ulist.items.max", "ulist.item.length.min"]);
        assert_eq!(msgs[1].location.to_string(), "l.adoc:3:3-3");
    }

    #[test]
    fn nesting_depth_counts_nested_lists() {
        let inner = Node::new("olist", 2).with_child(item(2, "b"));
        let node = Node::new("ulist", 1).with_child(item(1, "a").with_child(inner));
        let msgs = run(
            "* a\n. b",
            &node,
            BlockConstraints::Ulist(ListRules {
                nesting: Some(CountRule::new(None, Some(1), Severity::Warn)),
                ..ListRules::default()
            }),
        )
        .unwrap();
        assert_eq!(msgs[0].rule_id, "ulist.nesting.max");
        assert_eq!(msgs[0].actual.as_deref(), Some("2"));
    }

    #[test]
    fn runaway_nesting_is_a_fault() {
        let mut node = Node::new("ulist", 1);
        for _ in 0..MAX_DEPTH + 1 {
            node = Node::new("ulist", 1).with_child(item(1, "x").with_child(node));
        }
        let result = run(
            "* x",
            &node,
            BlockConstraints::Ulist(ListRules {
                nesting: Some(CountRule::new(None, Some(3), Severity::Warn)),
                ..ListRules::default()
            }),
        );
        assert!(matches!(result, Err(NodeFault::TooDeep { max: MAX_DEPTH, .. })));
    }

    #[test]
    fn marker_falls_back_to_style() {
        let node = Node::new("olist", 2)
            .with_attribute("style", "loweralpha")
            .with_child(item(2, "a"));
        let msgs = run(
            "[loweralpha]\n. a",
            &node,
            BlockConstraints::Olist(ListRules {
                marker: Some(ValueSet::new(["arabic"], Severity::Warn)),
                ..ListRules::default()
            }),
        )
        .unwrap();
        assert_eq!(msgs[0].rule_id, "olist.marker.allowed");
        assert_eq!(msgs[0].location.to_string(), "l.adoc:1:2-11");
    }
}
