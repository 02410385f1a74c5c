//! Set membership for enumerated values.

use super::Target;
use crate::model::ValueSet;
use crate::types::{FindingKind, Suggestion, ValidationMessage};

/// Checks a value set against the target.
///
/// An absent value yields a missing-value finding only when the set is
/// required.
#[must_use]
pub fn check(set: &ValueSet, target: &Target<'_>) -> Option<ValidationMessage> {
    let Some(value) = target.normalized() else {
        return set
            .required
            .then(|| super::field::missing(target, set.severity));
    };
    check_value(set, &value, target)
}

/// Checks one present value.
#[must_use]
pub fn check_value(set: &ValueSet, value: &str, target: &Target<'_>) -> Option<ValidationMessage> {
    if set.permits(value) {
        return None;
    }
    let expected = format!("One of: {}", set.allowed.join(", "));
    let suggestion = match set.allowed.iter().find(|a| a.eq_ignore_ascii_case(value)) {
        Some(close) => format!("Did you mean '{close}'?"),
        None => format!("Use one of the allowed values: {}", set.allowed.join(", ")),
    };
    Some(
        ValidationMessage::new(
            set.severity,
            target.rule_id("allowed"),
            format!("{} '{value}' is not allowed", target.label),
            target.location.clone(),
        )
        .with_kind(FindingKind::DisallowedValue)
        .with_actual(value)
        .with_expected(expected)
        .with_suggestion(Suggestion::new(suggestion)),
    )
}
