//! Backtracking recursive-descent grammar for header field values.
//!
//! Every production is a method on [`HeaderParser`] with the shape
//! `parse_x(&mut self, index) -> usize`. A production returns the index
//! just past the text it matched, or `index` itself when it does not
//! match. Nothing here returns an error for a syntax mismatch, so
//! productions compose with plain equality checks:
//!
//! - **Sequence**: run the parts left to right; if one fails, roll the
//!   token log back and return the start of the whole sequence.
//! - **Ordered choice**: first alternative that advances wins.
//! - **Repetition**: loop until the part stops advancing.
//! - **Optional**: a failed attempt is the same as an absent one.
//!
//! When token recording is enabled the parser keeps a [`TokenLog`] of the
//! comment, phrase and atom spans it matched. Failed alternatives truncate
//! the log back to their checkpoint, so only the winning parse remains.
//!
//! # Example
//!
//! ```
//! use mailfield::grammar::HeaderParser;
//!
//! let value = "Joe Q. Public <john.q.public@example.com>";
//! let mut parser = HeaderParser::new(value);
//! assert_eq!(parser.parse_address_list(0), value.len());
//!
//! let mut parser = HeaderParser::new("(unbalanced");
//! assert_eq!(parser.parse_cfws(0), 0);
//! ```

mod address;
mod chars;
mod datetime;
mod fields;
mod language;
mod lexical;
mod mime;
mod tokener;

use std::fmt;

use crate::config::ParserConfig;

pub use chars::*;
pub use tokener::{Checkpoint, Token, TokenKind, TokenLog};

/// Signature shared by every whole-field production.
pub type Production = for<'a> fn(&mut HeaderParser<'a>, usize) -> usize;

/// A named whole-field production.
#[derive(Clone, Copy)]
pub struct Grammar {
    name: &'static str,
    production: Production,
}

impl Grammar {
    /// Wraps a production under a display name.
    #[must_use]
    pub const fn new(name: &'static str, production: Production) -> Self {
        Self { name, production }
    }

    /// Returns the display name of the production.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the production against a parser at `index`.
    pub fn apply(&self, parser: &mut HeaderParser<'_>, index: usize) -> usize {
        (self.production)(parser, index)
    }

    /// Returns true if the production consumes the whole of `value`.
    #[must_use]
    pub fn matches(&self, value: &str, config: &ParserConfig) -> bool {
        let mut parser = HeaderParser::new(value).with_config(config);
        self.apply(&mut parser, 0) == value.len()
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Grammar").field(&self.name).finish()
    }
}

impl PartialEq for Grammar {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Grammar {}

/// Parser state for one top-level parse of a header value.
///
/// Holds the input, the end bound, the optional token log and the current
/// comment nesting depth. Indices are byte offsets into the input.
#[derive(Debug)]
pub struct HeaderParser<'a> {
    text: &'a str,
    end: usize,
    log: Option<TokenLog>,
    depth: usize,
    max_depth: usize,
}

impl<'a> HeaderParser<'a> {
    /// Creates a parser over the whole of `text` without token recording.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            end: text.len(),
            log: None,
            depth: 0,
            max_depth: crate::config::DEFAULT_MAX_COMMENT_DEPTH,
        }
    }

    /// Restricts matching to `text[..end]`.
    ///
    /// # Panics
    ///
    /// Panics if `end` is past the end of the text or not on a character
    /// boundary.
    #[must_use]
    pub fn with_end(mut self, end: usize) -> Self {
        assert!(
            self.text.is_char_boundary(end),
            "end index {end} out of bounds for text of length {}",
            self.text.len()
        );
        self.end = end;
        self
    }

    /// Applies limits from a configuration.
    #[must_use]
    pub const fn with_config(mut self, config: &ParserConfig) -> Self {
        self.max_depth = config.max_comment_depth;
        self
    }

    /// Enables token recording.
    #[must_use]
    pub fn recording(mut self) -> Self {
        self.log = Some(TokenLog::new());
        self
    }

    /// Returns the input text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the end bound.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Returns the token log, if recording.
    #[must_use]
    pub const fn tokens(&self) -> Option<&TokenLog> {
        self.log.as_ref()
    }

    /// Consumes the parser and returns its recorded tokens, sorted.
    #[must_use]
    pub fn into_sorted_tokens(self) -> Vec<Token> {
        self.log.map(TokenLog::into_sorted).unwrap_or_default()
    }

    // ---- state ----

    /// Captures the token log length.
    fn checkpoint(&self) -> Checkpoint {
        self.log
            .as_ref()
            .map_or(Checkpoint::EMPTY, TokenLog::checkpoint)
    }

    /// Rolls the token log back and reports "no match" for `start`.
    fn fail(&mut self, start: usize, checkpoint: Checkpoint) -> usize {
        if let Some(log) = self.log.as_mut() {
            log.rollback(checkpoint);
        }
        start
    }

    fn commit(&mut self, kind: TokenKind, start: usize, end: usize) {
        if let Some(log) = self.log.as_mut() {
            log.commit(kind, start, end);
        }
    }

    // ---- byte access ----

    fn byte(&self, index: usize) -> Option<u8> {
        if index < self.end {
            self.text.as_bytes().get(index).copied()
        } else {
            None
        }
    }

    fn is(&self, index: usize, expected: u8) -> bool {
        self.byte(index) == Some(expected)
    }

    fn skip_while(&self, mut index: usize, pred: fn(u8) -> bool) -> usize {
        while self.byte(index).is_some_and(pred) {
            index += 1;
        }
        index
    }

    /// Matches one ASCII byte.
    fn char_at(&self, index: usize, expected: u8) -> usize {
        if self.is(index, expected) {
            index + 1
        } else {
            index
        }
    }

    /// Steps over one whole character.
    fn skip_char(&self, index: usize) -> usize {
        self.byte(index)
            .map_or(index, |b| (index + utf8_len(b)).min(self.end))
    }

    /// Matches `word` ignoring ASCII case.
    fn keyword(&self, index: usize, word: &str) -> usize {
        let end = index + word.len();
        if end <= self.end
            && self.text.as_bytes()[index..end].eq_ignore_ascii_case(word.as_bytes())
        {
            end
        } else {
            index
        }
    }

    /// Matches `min..=max` ASCII digits.
    fn digits(&self, index: usize, min: usize, max: usize) -> usize {
        let mut i = index;
        while i - index < max && self.byte(i).is_some_and(|b| b.is_ascii_digit()) {
            i += 1;
        }
        if i - index >= min { i } else { index }
    }

    /// Matches the first keyword of `table` that is not followed by another
    /// `continues` byte.
    fn keyword_from(&self, index: usize, table: &[&str], continues: fn(u8) -> bool) -> usize {
        for word in table {
            let end = self.keyword(index, word);
            if end != index && !self.byte(end).is_some_and(continues) {
                return end;
            }
        }
        index
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_with_end_limits_matching() {
        let mut parser = HeaderParser::new("abc def").with_end(3);
        assert_eq!(parser.parse_atom(0), 3);
        assert_eq!(parser.parse_atom(3), 3);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_with_end_out_of_bounds() {
        let _ = HeaderParser::new("abc").with_end(4);
    }

    #[test]
    fn test_index_past_end_is_no_match() {
        let mut parser = HeaderParser::new("abc");
        assert_eq!(parser.parse_atom(10), 10);
        assert_eq!(parser.parse_cfws(10), 10);
    }

    #[test]
    fn test_grammar_matches_full_value() {
        let grammar = Grammar::new("address-list", |p, i| p.parse_address_list(i));
        let config = ParserConfig::default();
        assert!(grammar.matches("a@example.com, b@example.com", &config));
        assert!(!grammar.matches("a@example.com,, <", &config));
        assert_eq!(format!("{grammar:?}"), "Grammar(\"address-list\")");
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let parser = HeaderParser::new("PaSs rest");
        assert_eq!(parser.keyword(0, "pass"), 4);
        assert_eq!(parser.keyword(0, "fail"), 0);
        assert_eq!(parser.keyword(6, "restless"), 6);
    }
}
