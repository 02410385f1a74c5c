//! Document header attribute validation.

use crate::document::Document;
use crate::eval::{field, Target};
use crate::model::MetadataAttributeRule;
use crate::source::Locator;
use crate::types::{FindingKind, SourceLocation, ValidationMessage};
use tracing::debug;

/// Checks every metadata rule against the document header.
///
/// Each attribute is checked independently. A missing required attribute
/// yields exactly one finding and nothing else; a present value is checked
/// for length and pattern separately.
#[must_use]
pub fn validate_metadata(
    document: &Document,
    rules: &[MetadataAttributeRule],
) -> Vec<ValidationMessage> {
    let locator = Locator::new(document.path(), &document.source);
    let mut messages = Vec::new();

    for rule in rules {
        let Some(entry) = document.attribute(rule.name()) else {
            if rule.is_required() {
                messages.push(missing(rule, locator.whole_line(document.header_line())));
            } else {
                debug!("Optional attribute '{}' absent", rule.name());
            }
            continue;
        };

        let location = locator
            .attribute_value(entry.line, &entry.name)
            .unwrap_or_else(|| locator.whole_line(entry.line));
        let target = Target::new(
            "metadata",
            format!("Attribute '{}'", rule.name()),
            Some(entry.value.as_str()),
            location,
        );
        if target.normalized().is_none() {
            if rule.is_required() {
                messages.push(missing(rule, target.location));
            }
            continue;
        }
        messages.extend(field::check_text(rule.rule(), &target, &locator));
    }
    messages
}

fn missing(rule: &MetadataAttributeRule, location: SourceLocation) -> ValidationMessage {
    ValidationMessage::new(
        rule.severity(),
        "metadata.required",
        format!("Missing required attribute '{}'", rule.name()),
        location,
    )
    .with_kind(FindingKind::MissingRequired)
    .with_expected(format!(":{}: <value>", rule.name()))
}
