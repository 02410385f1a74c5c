//! Image, audio and video macros.

use super::{BlockContext, NodeFault};
use crate::eval::{allowed, count, field, Target};
use crate::model::BlockConstraints;
use crate::types::ValidationMessage;

pub(super) fn image(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Image(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();

    if let Some(url) = &rules.url {
        messages.extend(field::check_text(url, &target_url(ctx), &ctx.locator));
    }
    if let Some(alt) = &rules.alt {
        let target = ctx.attribute_target("alt", "alt", Some(0), "[{}]");
        messages.extend(field::check_text(alt, &target, &ctx.locator));
    }
    if let Some(width) = &rules.width {
        let target = ctx.attribute_target("width", "width", Some(1), "[{}]");
        messages.extend(count::check_numeric(width, &target));
    }
    if let Some(height) = &rules.height {
        let target = ctx.attribute_target("height", "height", Some(2), "[{}]");
        messages.extend(count::check_numeric(height, &target));
    }
    Ok(messages)
}

pub(super) fn audio(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Audio(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();

    if let Some(url) = &rules.url {
        messages.extend(field::check_text(url, &target_url(ctx), &ctx.locator));
    }
    if let Some(title) = &rules.title {
        messages.extend(field::check_text(title, &ctx.title_target("title"), &ctx.locator));
    }
    if let Some(options) = &rules.options {
        let target = ctx.attribute_target("options", "options", None, "[options=\"{}\"]");
        match target.normalized() {
            None => messages.extend(allowed::check(options, &target)),
            Some(value) => {
                for option in value.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                    let location = ctx
                        .locator
                        .find(target.location.start_line, target.location.end_line, option)
                        .unwrap_or_else(|| target.location.clone());
                    let single = Target::new(
                        target.rule_prefix.clone(),
                        "Audio option",
                        Some(option),
                        location,
                    );
                    messages.extend(allowed::check_value(options, option, &single));
                }
            }
        }
    }
    Ok(messages)
}

pub(super) fn video(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Video(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();

    if let Some(url) = &rules.url {
        messages.extend(field::check_text(url, &target_url(ctx), &ctx.locator));
    }
    if let Some(width) = &rules.width {
        let target = ctx.attribute_target("width", "width", None, "[{}]");
        messages.extend(count::check_numeric(width, &target));
    }
    if let Some(height) = &rules.height {
        let target = ctx.attribute_target("height", "height", None, "[{}]");
        messages.extend(count::check_numeric(height, &target));
    }
    if let Some(poster) = &rules.poster {
        let target = ctx.attribute_target("poster", "poster", None, "[{}]");
        messages.extend(field::check_text(poster, &target, &ctx.locator));
    }
    if let Some(caption) = &rules.caption {
        messages.extend(field::check_text(
            caption,
            &ctx.title_target("caption"),
            &ctx.locator,
        ));
    }
    Ok(messages)
}

/// The macro target (`image::<target>[...]`).
fn target_url<'a>(ctx: &BlockContext<'a>) -> Target<'a> {
    let node = ctx.node;
    let value = node.attribute("target");
    let location = value
        .and_then(|v| ctx.locator.find(node.line, node.line, v.trim()))
        .unwrap_or_else(|| ctx.node_location());
    Target::new(ctx.prefix("url"), ctx.label("url"), value, location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::evaluate;
    use crate::document::Node;
    use crate::model::{AudioRules, BlockRule, ImageRules, NumericRule, TextRule, ValueSet};
    use crate::source::{Locator, SourceText};
    use crate::types::{Placeholder, Severity};
    use std::path::Path;

    fn run(source: &str, node: &Node, constraints: BlockConstraints) -> Vec<ValidationMessage> {
        let src = SourceText::new(source);
        let rule = BlockRule::new(constraints, Severity::Error);
        let ctx = BlockContext::new(node, &rule, Locator::new(Path::new("m.adoc"), &src));
        evaluate(&ctx).unwrap()
    }

    #[test]
    fn image_alt_and_width() {
        let node = Node::new("image", 1)
            .with_attribute("target", "logo.png")
            .with_attribute("alt", "Logo")
            .with_attribute("width", "3000");
        let msgs = run(
            "image::logo.png[alt=\"Logo\",width=3000]",
            &node,
            BlockConstraints::Image(ImageRules {
                alt: Some(TextRule::new(Severity::Warn).min_length(5)),
                width: Some(NumericRule::new(None, Some(1200), Severity::Error)),
                ..ImageRules::default()
            }),
        );
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].rule_id, "image.alt.length.min");
        assert_eq!(msgs[0].location.to_string(), "m.adoc:1:22-25");
        assert_eq!(msgs[1].rule_id, "image.width.max");
        assert_eq!(msgs[1].location.to_string(), "m.adoc:1:34-37");
    }

    #[test]
    fn image_missing_alt_placeholder_in_brackets() {
        let node = Node::new("image", 1).with_attribute("target", "logo.png");
        let msgs = run(
            "image::logo.png[]",
            &node,
            BlockConstraints::Image(ImageRules {
                alt: Some(TextRule::new(Severity::Error).required()),
                url: Some(TextRule::new(Severity::Error).forbidden(
                    crate::model::Pattern::new(r"^http:").unwrap(),
                )),
                ..ImageRules::default()
            }),
        );
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].rule_id, "image.alt.required");
        assert_eq!(msgs[0].location.to_string(), "m.adoc:1:17-17");
        assert_eq!(msgs[0].placeholder, Some(Placeholder::inline("«alt»")));
    }

    #[test]
    fn each_audio_option_checked() {
        let node = Node::new("audio", 1)
            .with_attribute("target", "intro.mp3")
            .with_attribute("options", "autoplay,shuffle");
        let msgs = run(
            "audio::intro.mp3[options=\"autoplay,shuffle\"]",
            &node,
            BlockConstraints::Audio(AudioRules {
                options: Some(ValueSet::new(["autoplay", "loop"], Severity::Warn)),
                ..AudioRules::default()
            }),
        );
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].rule_id, "audio.options.allowed");
        assert_eq!(msgs[0].actual.as_deref(), Some("shuffle"));
        assert_eq!(msgs[0].location.to_string(), "m.adoc:1:36-42");
    }
}
