//! Relative order of order-tagged siblings.

use crate::types::{FindingKind, Severity, SourceLocation, ValidationMessage};

/// Tracks the highest order tag seen so far in one sibling scope.
#[derive(Debug, Clone, Default)]
pub struct OrderTracker {
    highest: Option<(u32, String)>,
}

impl OrderTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an item and returns the name of an earlier item with a
    /// higher order tag, if any.
    pub fn record(&mut self, order: u32, name: &str) -> Option<String> {
        if let Some((seen, seen_name)) = &self.highest {
            if *seen > order {
                return Some(seen_name.clone());
            }
        }
        self.highest = Some((order, name.to_string()));
        None
    }
}

/// Builds an order-violation finding: `earlier` appears after `later`.
#[must_use]
pub fn violation(
    scope: &str,
    noun: &str,
    earlier: &str,
    later: &str,
    severity: Severity,
    location: SourceLocation,
) -> ValidationMessage {
    ValidationMessage::new(
        severity,
        format!("{scope}.order"),
        format!("{noun} order violation: {earlier} appears after {later}"),
        location,
    )
    .with_kind(FindingKind::OrderViolation)
    .with_expected(format!("{earlier} before {later}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_pair_is_reported_once() {
        let mut tracker = OrderTracker::new();
        assert_eq!(tracker.record(2, "installation"), None);
        assert_eq!(
            tracker.record(1, "introduction").as_deref(),
            Some("installation")
        );
    }

    #[test]
    fn equal_and_increasing_orders_pass() {
        let mut tracker = OrderTracker::new();
        assert_eq!(tracker.record(1, "a"), None);
        assert_eq!(tracker.record(1, "b"), None);
        assert_eq!(tracker.record(3, "c"), None);
    }

    #[test]
    fn violation_message() {
        let msg = violation(
            "section",
            "Section",
            "introduction",
            "installation",
            Severity::Error,
            SourceLocation::line("d.adoc", 8),
        );
        assert_eq!(msg.rule_id, "section.order");
        assert_eq!(
            msg.message,
            "Section order violation: introduction appears after installation"
        );
    }
}
