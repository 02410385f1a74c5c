//! Required and forbidden regex patterns.

use super::Target;
use crate::model::Pattern;
use crate::source::Locator;
use crate::types::{FindingKind, Severity, ValidationMessage};

/// The whole value must match `pattern`.
#[must_use]
pub fn check_required(
    pattern: &Pattern,
    severity: Severity,
    value: &str,
    target: &Target<'_>,
) -> Option<ValidationMessage> {
    if pattern.is_match(value) {
        return None;
    }
    Some(
        ValidationMessage::new(
            severity,
            target.rule_id("pattern"),
            format!("{} does not match required pattern", target.label),
            target.location.clone(),
        )
        .with_kind(FindingKind::PatternMismatch)
        .with_actual(value)
        .with_expected(format!("Pattern: {pattern}")),
    )
}

/// Every match of `pattern` inside the value is a separate finding.
#[must_use]
pub fn check_forbidden(
    pattern: &Pattern,
    severity: Severity,
    value: &str,
    target: &Target<'_>,
    locator: &Locator<'_>,
) -> Vec<ValidationMessage> {
    locator
        .regex_matches(&target.location, value, pattern.regex())
        .into_iter()
        .map(|(location, matched)| {
            ValidationMessage::new(
                severity,
                target.rule_id("forbidden"),
                format!("{} contains forbidden text '{matched}'", target.label),
                location,
            )
            .with_kind(FindingKind::ForbiddenPattern)
            .with_actual(matched)
            .with_expected(format!("No match for: {pattern}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceText;
    use std::path::Path;

    #[test]
    fn mismatch_reports_pattern() {
        let src = SourceText::new("= Doc\n:author: john doe");
        let locator = Locator::new(Path::new("doc.adoc"), &src);
        let location = locator.attribute_value(2, "author").unwrap();
        let target = Target::new("metadata", "Attribute 'author'", Some("john doe"), location);
        let pattern = Pattern::new("^[A-Z][a-z]+ [A-Z][a-z]+$").unwrap();

        let msg = check_required(&pattern, Severity::Error, "john doe", &target).unwrap();
        assert_eq!(msg.rule_id, "metadata.pattern");
        assert_eq!(
            msg.message,
            "Attribute 'author' does not match required pattern"
        );
        assert_eq!(msg.location.to_string(), "doc.adoc:2:10-17");
        assert_eq!(
            msg.expected.as_deref(),
            Some("Pattern: ^[A-Z][a-z]+ [A-Z][a-z]+$")
        );
        assert!(check_required(&pattern, Severity::Error, "John Doe", &target).is_none());
    }

    #[test]
    fn each_forbidden_match_is_reported_separately() {
        let src = SourceText::new("Use TODO here and TODO there");
        let locator = Locator::new(Path::new("doc.adoc"), &src);
        let target = Target::new(
            "paragraph.content",
            "Paragraph content",
            Some("Use TODO here and TODO there"),
            locator.whole_line(1),
        );
        let pattern = Pattern::new("TODO").unwrap();

        let msgs = check_forbidden(
            &pattern,
            Severity::Warn,
            "Use TODO here and TODO there",
            &target,
            &locator,
        );
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].location.to_string(), "doc.adoc:1:5-8");
        assert_eq!(msgs[1].location.to_string(), "doc.adoc:1:19-22");
        assert_eq!(msgs[0].rule_id, "paragraph.content.forbidden");
    }
}
