//! Length bounds, measured in Unicode code points.

use super::Target;
use crate::model::TextRule;
use crate::source::char_len;
use crate::types::{FindingKind, Suggestion, ValidationMessage};

/// Checks `min_length` / `max_length` of a present value.
///
/// `value` must already be normalised.
#[must_use]
pub fn check(rule: &TextRule, value: &str, target: &Target<'_>) -> Option<ValidationMessage> {
    let length = char_len(value);
    let actual = format!("{value} (length: {length})");

    if let Some(min) = rule.min_length.filter(|min| length < *min) {
        return Some(
            ValidationMessage::new(
                rule.severity,
                target.rule_id("length.min"),
                format!("{} is too short", target.label),
                target.location.clone(),
            )
            .with_kind(FindingKind::LengthTooShort)
            .with_actual(actual)
            .with_expected(format!("Minimum length: {min}")),
        );
    }

    if let Some(max) = rule.max_length.filter(|max| length > *max) {
        return Some(
            ValidationMessage::new(
                rule.severity,
                target.rule_id("length.max"),
                format!("{} is too long", target.label),
                target.location.clone(),
            )
            .with_kind(FindingKind::LengthTooLong)
            .with_actual(actual)
            .with_expected(format!("Maximum length: {max}"))
            .with_suggestion(Suggestion::new(format!(
                "Shorten by {} character(s)",
                length - max
            ))),
        );
    }

    None
}
