//! Sentence and word splitting for prose constraints.
//!
//! A sentence ends after a run of `.`, `!` or `?` that is followed by
//! whitespace or the end of the text. Words are runs of non-whitespace.

use super::{count, Target};
use crate::model::SentenceRule;
use crate::source::{char_len, Locator};
use crate::types::ValidationMessage;

/// A sentence as a byte range of the text it was split from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    /// Sentence text, without surrounding whitespace.
    pub text: &'a str,
    /// Byte offset of `text` in the source string.
    pub start: usize,
}

impl Sentence<'_> {
    /// Number of words.
    #[must_use]
    pub fn word_count(&self) -> usize {
        word_count(self.text)
    }
}

/// Splits text into sentences.
#[must_use]
pub fn sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut found = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if start.is_none() && !c.is_whitespace() {
            start = Some(i);
        }
        if !is_terminator(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, d)) = chars.peek() {
            if !is_terminator(d) {
                break;
            }
            end = j + d.len_utf8();
            chars.next();
        }
        let at_boundary = chars.peek().map_or(true, |&(_, d)| d.is_whitespace());
        if at_boundary {
            if let Some(s) = start.take() {
                found.push(Sentence {
                    text: &text[s..end],
                    start: s,
                });
            }
        }
    }

    if let Some(s) = start {
        let tail = text[s..].trim_end();
        if !tail.is_empty() {
            found.push(Sentence {
                text: tail,
                start: s,
            });
        }
    }
    found
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Number of whitespace-separated words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Checks sentence count and words per sentence.
///
/// Word-count findings are located at the offending sentence.
#[must_use]
pub fn check_sentences(
    rule: &SentenceRule,
    value: &str,
    target: &Target<'_>,
    locator: &Locator<'_>,
) -> Vec<ValidationMessage> {
    let split = sentences(value);
    let mut messages = Vec::new();

    if let Some(bounds) = &rule.count {
        messages.extend(count::check(
            bounds,
            split.len(),
            &target.rule_id("sentences"),
            &format!("{} sentences", target.label),
            &target.location,
        ));
    }

    if let Some(bounds) = &rule.words {
        for sentence in &split {
            let begin = char_len(&value[..sentence.start]);
            let location = locator.narrow(
                &target.location,
                value,
                begin,
                begin + char_len(sentence.text),
            );
            messages.extend(count::check(
                bounds,
                sentence.word_count(),
                &target.rule_id("sentences.words"),
                &format!("{} sentence words", target.label),
                &location,
            ));
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CountRule;
    use crate::source::SourceText;
    use crate::types::Severity;
    use std::path::Path;

    #[test]
    fn splits_on_terminator_runs() {
        let found: Vec<&str> = sentences("One. Two?! Three...  Four")
            .iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(found, vec!["One.", "Two?!", "Three...", "Four"]);
    }

    #[test]
    fn terminator_inside_word_does_not_split() {
        let found: Vec<&str> = sentences("Version 1.2 is out.\nUpgrade now.")
            .iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(found, vec!["Version 1.2 is out.", "Upgrade now."]);
    }

    #[test]
    fn empty_text_has_no_sentences() {
        assert!(sentences("   ").is_empty());
        assert_eq!(word_count("  a  b\nc "), 3);
    }

    #[test]
    fn word_limit_locates_sentence() {
        let text = "Short one. This sentence has far too many words.";
        let src = SourceText::new(text);
        let locator = Locator::new(Path::new("p.adoc"), &src);
        let target = Target::new(
            "paragraph",
            "Paragraph",
            Some(text),
            locator.content(1, 1, text).unwrap(),
        );
        let rule = SentenceRule {
            count: Some(CountRule::new(None, Some(1), Severity::Info)),
            words: Some(CountRule::new(None, Some(5), Severity::Warn)),
        };

        let msgs = check_sentences(&rule, text, &target, &locator);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].rule_id, "paragraph.sentences.max");
        assert_eq!(msgs[1].rule_id, "paragraph.sentences.words.max");
        assert_eq!(msgs[1].location.to_string(), "p.adoc:1:12-48");
    }
}
