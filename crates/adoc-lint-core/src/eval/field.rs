//! Combined checks for a textual field: presence, length and patterns.

use super::{length, pattern, Target};
use crate::model::TextRule;
use crate::source::Locator;
use crate::types::{FindingKind, Severity, ValidationMessage};

/// Runs every check of a [`TextRule`] against a target.
///
/// An absent value yields one missing-value finding when required and
/// nothing otherwise. A present value is checked for length, required
/// pattern and forbidden pattern independently.
#[must_use]
pub fn check_text(
    rule: &TextRule,
    target: &Target<'_>,
    locator: &Locator<'_>,
) -> Vec<ValidationMessage> {
    let Some(value) = target.normalized() else {
        return if rule.required {
            vec![missing(target, rule.severity)]
        } else {
            Vec::new()
        };
    };

    let mut messages = Vec::new();
    messages.extend(length::check(rule, &value, target));
    if let Some(required) = &rule.pattern {
        messages.extend(pattern::check_required(
            required,
            rule.severity,
            &value,
            target,
        ));
    }
    if let Some(forbidden) = &rule.forbidden {
        messages.extend(pattern::check_forbidden(
            forbidden,
            rule.severity,
            &value,
            target,
            locator,
        ));
    }
    messages
}

/// A missing-value finding, carrying the target's placeholder if any.
#[must_use]
pub fn missing(target: &Target<'_>, severity: Severity) -> ValidationMessage {
    let message = ValidationMessage::new(
        severity,
        target.rule_id("required"),
        format!("{} is required", target.label),
        target.location.clone(),
    )
    .with_kind(FindingKind::MissingValue);
    match &target.placeholder {
        Some(placeholder) => message.with_placeholder(placeholder.clone()),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pattern;
    use crate::source::SourceText;
    use std::path::Path;

    #[test]
    fn checks_run_independently() {
        let src = SourceText::new(".draft TODO");
        let locator = Locator::new(Path::new("d.adoc"), &src);
        let location = locator.find(1, 1, "draft TODO").unwrap();
        let target = Target::new(
            "listing.title",
            "Listing title",
            Some("draft TODO"),
            location,
        );
        let rule = TextRule::new(Severity::Warn)
            .max_length(5)
            .pattern(Pattern::new("^[A-Z]").unwrap())
            .forbidden(Pattern::new("TODO").unwrap());

        let ids: Vec<String> = check_text(&rule, &target, &locator)
            .into_iter()
            .map(|m| m.rule_id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "listing.title.length.max",
                "listing.title.pattern",
                "listing.title.forbidden"
            ]
        );
    }

    #[test]
    fn absent_value_only_reports_when_required() {
        let src = SourceText::new("----");
        let locator = Locator::new(Path::new("d.adoc"), &src);
        let target = Target::new("listing.title", "Listing title", None, locator.line_start(1));
        let rule = TextRule::new(Severity::Info).min_length(4);
        assert!(check_text(&rule, &target, &locator).is_empty());

        let msgs = check_text(&rule.required(), &target, &locator);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].rule_id, "listing.title.required");
        assert_eq!(msgs[0].message, "Listing title is required");
    }
}
