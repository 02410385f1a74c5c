//! Paragraphs and delimited prose blocks.

use super::{line_count, BlockContext, NodeFault};
use crate::eval::{allowed, count, field, text, Target};
use crate::model::BlockConstraints;
use crate::types::ValidationMessage;

pub(super) fn paragraph(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Paragraph(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();
    let content = ctx.content_target("content");

    if let Some(lines) = &rules.lines {
        messages.extend(count::check(
            lines,
            line_count(ctx.node.content.as_deref()),
            "paragraph.lines",
            "Paragraph lines",
            &content.location,
        ));
    }
    if let (Some(sentences), Some(value)) = (&rules.sentences, content.normalized()) {
        let target = Target::new(
            "paragraph",
            "Paragraph",
            content.value,
            content.location.clone(),
        );
        messages.extend(text::check_sentences(
            sentences,
            &value,
            &target,
            &ctx.locator,
        ));
    }
    if let Some(rule) = &rules.content {
        messages.extend(field::check_text(rule, &content, &ctx.locator));
    }
    Ok(messages)
}

pub(super) fn admonition(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Admonition(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();

    if let Some(variant) = &rules.variant {
        let target = ctx.attribute_target("variant", "name", Some(0), "[{}]");
        messages.extend(allowed::check(variant, &target));
    }
    if let Some(title) = &rules.title {
        messages.extend(field::check_text(title, &ctx.title_target("title"), &ctx.locator));
    }
    if let Some(content) = &rules.content {
        messages.extend(field::check_text(
            content,
            &ctx.content_target("content"),
            &ctx.locator,
        ));
    }
    Ok(messages)
}

pub(super) fn sidebar(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Sidebar(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();
    if let Some(title) = &rules.title {
        messages.extend(field::check_text(title, &ctx.title_target("title"), &ctx.locator));
    }
    if let Some(content) = &rules.content {
        messages.extend(field::check_text(
            content,
            &ctx.content_target("content"),
            &ctx.locator,
        ));
    }
    Ok(messages)
}

pub(super) fn example(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Example(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();
    if let Some(title) = &rules.title {
        messages.extend(field::check_text(title, &ctx.title_target("title"), &ctx.locator));
    }
    if let Some(content) = &rules.content {
        messages.extend(field::check_text(
            content,
            &ctx.content_target("content"),
            &ctx.locator,
        ));
    }
    if let Some(collapsible) = &rules.collapsible {
        let target = ctx.attribute_target("collapsible", "collapsible", None, "[%{}]");
        messages.extend(allowed::check(collapsible, &target));
    }
    Ok(messages)
}

pub(super) fn pass(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Pass(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();
    if let Some(content) = &rules.content {
        messages.extend(field::check_text(
            content,
            &ctx.content_target("content"),
            &ctx.locator,
        ));
    }
    if let Some(reason) = &rules.reason {
        let target = ctx.attribute_target("reason", "reason", None, "[pass,{}]");
        messages.extend(field::check_text(reason, &target, &ctx.locator));
    }
    Ok(messages)
}
