//! Occurrence counting within one sibling scope.

use crate::model::Occurrence;
use crate::types::{FindingKind, SourceLocation, ValidationMessage};
use std::collections::BTreeMap;

/// Count and locations of one rule's matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Number of matched nodes.
    pub count: usize,
    /// Location of each matched node, in document order.
    pub locations: Vec<SourceLocation>,
}

/// Call-scoped map from rule key to its tally.
///
/// One counter is created per parent scope and dropped when the scope is
/// done; counters are never shared between scopes or calls.
#[derive(Debug, Clone)]
pub struct OccurrenceCounter<K> {
    tallies: BTreeMap<K, Tally>,
}

impl<K: Ord + Copy> Default for OccurrenceCounter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Copy> OccurrenceCounter<K> {
    /// Creates an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tallies: BTreeMap::new(),
        }
    }

    /// Records one match.
    pub fn record(&mut self, key: K, location: SourceLocation) {
        let tally = self.tallies.entry(key).or_default();
        tally.count += 1;
        tally.locations.push(location);
    }

    /// Number of matches recorded for a key.
    #[must_use]
    pub fn count(&self, key: K) -> usize {
        self.tallies.get(&key).map_or(0, |t| t.count)
    }

    /// The tally of a key, if anything was recorded.
    #[must_use]
    pub fn tally(&self, key: K) -> Option<&Tally> {
        self.tallies.get(&key)
    }
}

/// What an occurrence rule applies to, for ids and messages.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    /// Rule id prefix: `section` or `block`.
    pub scope: &'a str,
    /// Capitalised noun: `Section` or `Block`.
    pub noun: &'a str,
    /// Rule name.
    pub name: &'a str,
}

/// Checks a tally against occurrence bounds.
///
/// Yields at most one finding: too few or too many, never both. Too few is
/// located at `scope_location`; too many at the first excess match.
#[must_use]
pub fn check(
    occurrence: &Occurrence,
    subject: Subject<'_>,
    tally: Option<&Tally>,
    scope_location: &SourceLocation,
) -> Option<ValidationMessage> {
    let count = tally.map_or(0, |t| t.count);
    if occurrence.admits(count) {
        return None;
    }

    let Subject { scope, noun, name } = subject;
    if count < occurrence.min {
        let min = occurrence.min;
        return Some(
            ValidationMessage::new(
                occurrence.severity,
                format!("{scope}.occurrence.min"),
                format!("{noun} '{name}' appears {count} time(s), at least {min} required"),
                scope_location.clone(),
            )
            .with_kind(FindingKind::OccurrenceTooFew)
            .with_actual(count.to_string())
            .with_expected(format!("Minimum occurrences: {min}")),
        );
    }

    let max = occurrence.max.unwrap_or(count);
    let location = tally
        .and_then(|t| t.locations.get(max))
        .unwrap_or(scope_location)
        .clone();
    Some(
        ValidationMessage::new(
            occurrence.severity,
            format!("{scope}.occurrence.max"),
            format!("{noun} '{name}' appears {count} time(s), at most {max} allowed"),
            location,
        )
        .with_kind(FindingKind::OccurrenceTooMany)
        .with_actual(count.to_string())
        .with_expected(format!("Maximum occurrences: {max}")),
    )
}
