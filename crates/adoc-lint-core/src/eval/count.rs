//! Min/max bounds over derived counts and numeric attributes.

use super::Target;
use crate::model::{CountRule, NumericRule};
use crate::types::{FindingKind, Severity, SourceLocation, ValidationMessage};

/// Checks a derived count (lines, items, rows, ...).
///
/// `rule_prefix` is e.g. `listing.lines`; `label` names the count in
/// messages, e.g. `Listing lines`.
#[must_use]
pub fn check(
    rule: &CountRule,
    actual: usize,
    rule_prefix: &str,
    label: &str,
    location: &SourceLocation,
) -> Option<ValidationMessage> {
    bounds(
        rule.min.map(to_u64),
        rule.max.map(to_u64),
        to_u64(actual),
        rule.severity,
        rule_prefix,
        label,
        location,
    )
}

/// Checks a numeric attribute such as `width`.
///
/// Values that are not non-negative integers are reported as a pattern
/// mismatch.
#[must_use]
pub fn check_numeric(rule: &NumericRule, target: &Target<'_>) -> Option<ValidationMessage> {
    let Some(value) = target.normalized() else {
        return rule
            .required
            .then(|| super::field::missing(target, rule.severity));
    };
    let digits = value.strip_suffix("px").unwrap_or(&value);
    let Ok(number) = digits.parse::<u64>() else {
        return Some(
            ValidationMessage::new(
                rule.severity,
                target.rule_id("pattern"),
                format!("{} is not a number", target.label),
                target.location.clone(),
            )
            .with_kind(FindingKind::PatternMismatch)
            .with_actual(value.as_str())
            .with_expected("A non-negative integer"),
        );
    };
    bounds(
        rule.min,
        rule.max,
        number,
        rule.severity,
        &target.rule_prefix,
        &target.label,
        &target.location,
    )
}

fn bounds(
    min: Option<u64>,
    max: Option<u64>,
    actual: u64,
    severity: Severity,
    rule_prefix: &str,
    label: &str,
    location: &SourceLocation,
) -> Option<ValidationMessage> {
    if let Some(min) = min.filter(|min| actual < *min) {
        return Some(
            ValidationMessage::new(
                severity,
                format!("{rule_prefix}.min"),
                format!("{label} ({actual}) is below the minimum of {min}"),
                location.clone(),
            )
            .with_kind(FindingKind::ValueTooSmall)
            .with_actual(actual.to_string())
            .with_expected(format!("Minimum: {min}")),
        );
    }
    if let Some(max) = max.filter(|max| actual > *max) {
        return Some(
            ValidationMessage::new(
                severity,
                format!("{rule_prefix}.max"),
                format!("{label} ({actual}) is above the maximum of {max}"),
                location.clone(),
            )
            .with_kind(FindingKind::ValueTooLarge)
            .with_actual(actual.to_string())
            .with_expected(format!("Maximum: {max}")),
        );
    }
    None
}

fn to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new("d.adoc", 7, 1, 4)
    }

    #[test]
    fn count_below_and_above() {
        let rule = CountRule::new(Some(2), Some(4), Severity::Warn);
        let msg = check(&rule, 1, "listing.lines", "Listing lines", &loc()).unwrap();
        assert_eq!(msg.rule_id, "listing.lines.min");
        assert_eq!(msg.message, "Listing lines (1) is below the minimum of 2");
        assert_eq!(msg.kind, Some(FindingKind::ValueTooSmall));

        let msg = check(&rule, 5, "listing.lines", "Listing lines", &loc()).unwrap();
        assert_eq!(msg.rule_id, "listing.lines.max");
        assert_eq!(msg.expected.as_deref(), Some("Maximum: 4"));

        assert!(check(&rule, 3, "listing.lines", "Listing lines", &loc()).is_none());
    }

    #[test]
    fn numeric_attribute() {
        let rule = NumericRule::new(Some(100), Some(800), Severity::Error);
        let target = Target::new("image.width", "Image width", Some("1200"), loc());
        let msg = check_numeric(&rule, &target).unwrap();
        assert_eq!(msg.rule_id, "image.width.max");

        let target = Target::new("image.width", "Image width", Some("400px"), loc());
        assert!(check_numeric(&rule, &target).is_none());

        let target = Target::new("image.width", "Image width", Some("wide"), loc());
        let msg = check_numeric(&rule, &target).unwrap();
        assert_eq!(msg.rule_id, "image.width.pattern");
        assert_eq!(msg.kind, Some(FindingKind::PatternMismatch));
    }

    #[test]
    fn numeric_missing_only_when_required() {
        let target = Target::new("image.height", "Image height", None, loc());
        let rule = NumericRule::new(None, None, Severity::Info);
        assert!(check_numeric(&rule, &target).is_none());
        let msg = check_numeric(&rule.required(), &target).unwrap();
        assert_eq!(msg.rule_id, "image.height.required");
    }
}
