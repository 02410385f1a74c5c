//! Listing and literal blocks.

use super::{line_count, BlockContext, NodeFault};
use crate::eval::{allowed, count, field};
use crate::model::BlockConstraints;
use crate::types::ValidationMessage;

pub(super) fn listing(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Listing(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();

    if let Some(language) = &rules.language {
        let target = ctx.attribute_target("language", "language", Some(1), "[source,{}]");
        messages.extend(allowed::check(language, &target));
    }
    if let Some(title) = &rules.title {
        messages.extend(field::check_text(title, &ctx.title_target("title"), &ctx.locator));
    }
    if let Some(lines) = &rules.lines {
        let content = ctx.content_target("lines");
        messages.extend(count::check(
            lines,
            line_count(ctx.node.content.as_deref()),
            &content.rule_prefix,
            &content.label,
            &content.location,
        ));
    }
    if let Some(callouts) = &rules.callouts {
        let content = ctx.content_target("callouts");
        messages.extend(count::check(
            callouts,
            callout_count(ctx.node.content.as_deref().unwrap_or_default()),
            &content.rule_prefix,
            &content.label,
            &content.location,
        ));
    }
    Ok(messages)
}

pub(super) fn literal(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Literal(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();

    if let Some(title) = &rules.title {
        messages.extend(field::check_text(title, &ctx.title_target("title"), &ctx.locator));
    }
    if let Some(lines) = &rules.lines {
        let content = ctx.content_target("lines");
        messages.extend(count::check(
            lines,
            line_count(ctx.node.content.as_deref()),
            &content.rule_prefix,
            &content.label,
            &content.location,
        ));
    }
    Ok(messages)
}

/// Counts `<n>` callout markers.
fn callout_count(code: &str) -> usize {
    let mut count = 0;
    let mut rest = code;
    while let Some(open) = rest.find('<') {
        rest = &rest[open + 1..];
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 && rest[digits..].starts_with('>') {
            count += 1;
            rest = &rest[digits + 1..];
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::evaluate;
    use crate::document::Node;
    use crate::model::{BlockRule, CountRule, ListingRules, ValueSet};
    use crate::source::{Locator, SourceText};
    use crate::types::{FindingKind, Placeholder, Severity};
    use std::path::Path;

    fn listing_rule(rules: ListingRules) -> BlockRule {
        BlockRule::new(BlockConstraints::Listing(rules), Severity::Error)
    }

    #[test]
    fn missing_language_gets_inline_placeholder() {
        let src = SourceText::new("== Build\n\n[source]\n----\ncargo build\n----");
        let node = Node::new("listing", 4).with_content("cargo build").ending_at(6);
        let rule = listing_rule(ListingRules {
            language: Some(ValueSet::new(["rust"], Severity::Error).required()),
            ..ListingRules::default()
        });
        let ctx = BlockContext::new(&node, &rule, Locator::new(Path::new("d.adoc"), &src));

        let msgs = evaluate(&ctx).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].rule_id, "listing.language.required");
        assert_eq!(msgs[0].kind, Some(FindingKind::MissingValue));
        assert_eq!(msgs[0].location.to_string(), "d.adoc:3:8-8");
        assert_eq!(msgs[0].placeholder, Some(Placeholder::inline(",«language»")));
    }

    #[test]
    fn disallowed_language_is_located_in_attribute_list() {
        let src = SourceText::new("[source,ruby]\n----\nputs 1\n----");
        let node = Node::new("listing", 2)
            .with_attribute("language", "ruby")
            .with_content("puts 1")
            .ending_at(4);
        let rule = listing_rule(ListingRules {
            language: Some(ValueSet::new(["rust", "java"], Severity::Warn)),
            ..ListingRules::default()
        });
        let ctx = BlockContext::new(&node, &rule, Locator::new(Path::new("d.adoc"), &src));

        let msgs = evaluate(&ctx).unwrap();
        assert_eq!(msgs[0].rule_id, "listing.language.allowed");
        assert_eq!(msgs[0].location.to_string(), "d.adoc:1:9-12");
    }

    #[test]
    fn line_and_callout_counts() {
        let code = "let a = 1; <1>\nlet b = 2; <2>\nlet c = a < b;";
        let src = SourceText::new(&format!("----\n{code}\n----"));
        let node = Node::new("listing", 1).with_content(code).ending_at(5);
        let rule = listing_rule(ListingRules {
            lines: Some(CountRule::new(None, Some(2), Severity::Warn)),
            callouts: Some(CountRule::new(Some(3), None, Severity::Info)),
            ..ListingRules::default()
        });
        let ctx = BlockContext::new(&node, &rule, Locator::new(Path::new("d.adoc"), &src));

        let ids: Vec<String> = evaluate(&ctx)
            .unwrap()
            .into_iter()
            .map(|m| m.rule_id)
            .collect();
        assert_eq!(ids, vec!["listing.lines.max", "listing.callouts.min"]);
    }

    #[test]
    fn callouts_need_digits_and_closing_bracket() {
        assert_eq!(callout_count("a <1> b <22> c <x> d < 3> <4"), 2);
    }
}
