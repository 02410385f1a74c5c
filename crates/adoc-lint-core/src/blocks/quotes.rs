//! Quote and verse blocks.

use super::{BlockContext, NodeFault};
use crate::eval::field;
use crate::model::BlockConstraints;
use crate::types::ValidationMessage;

pub(super) fn quote(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let (rules, style) = match ctx.rule.constraints() {
        BlockConstraints::Quote(rules) => (rules, "quote"),
        BlockConstraints::Verse(rules) => (rules, "verse"),
        _ => return Err(ctx.mismatch()),
    };
    let mut messages = Vec::new();

    if let Some(attribution) = &rules.attribution {
        let template = format!("[{style},{{}}]");
        let target = ctx.attribute_target("attribution", "attribution", Some(1), &template);
        messages.extend(field::check_text(attribution, &target, &ctx.locator));
    }
    if let Some(citation) = &rules.citation {
        let template = format!("[{style},,{{}}]");
        let target = ctx.attribute_target("citation", "citetitle", Some(2), &template);
        messages.extend(field::check_text(citation, &target, &ctx.locator));
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
