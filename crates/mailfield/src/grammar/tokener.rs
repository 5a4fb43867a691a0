//! Token log recorded while a header value is validated.
//!
//! The log is append-only. A checkpoint is just the length of the log, and
//! rolling back truncates to it, so abandoned alternatives leave nothing
//! behind. Tokens are sorted once, after the whole parse succeeded.

/// Kind of span recorded during a parse.
///
/// The declaration order is the tie-break order for tokens that start at
/// the same index: a phrase is seen before the comment or atom it begins
/// with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    /// A `phrase` (display names, keywords, group names).
    Phrase,
    /// A parenthesised `comment`, parentheses included.
    Comment,
    /// The `1*atext` run of an `atom`, surrounding CFWS excluded.
    Atom,
}

/// A recorded span of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// What was matched.
    pub kind: TokenKind,
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset just past the last byte.
    pub end: usize,
}

/// Opaque saved length of a [`TokenLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Checkpoint of an empty (or absent) log.
    pub const EMPTY: Self = Self(0);
}

/// Append-only log of tokens with truncating rollback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLog {
    tokens: Vec<Token>,
}

impl TokenLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state for a later [`rollback`](Self::rollback).
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.tokens.len())
    }

    /// Drops every token committed after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.tokens.truncate(checkpoint.0);
    }

    /// Records a fully matched span.
    pub fn commit(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token { kind, start, end });
    }

    /// Number of recorded tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in commit order.
    #[must_use]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens ordered by start index, then kind.
    #[must_use]
    pub fn sorted_tokens(&self) -> Vec<Token> {
        self.clone().into_sorted()
    }

    /// Consumes the log and returns its tokens ordered by start, then kind.
    #[must_use]
    pub fn into_sorted(mut self) -> Vec<Token> {
        self.tokens.sort_by_key(|t| (t.start, t.kind));
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_truncates() {
        let mut log = TokenLog::new();
        log.commit(TokenKind::Atom, 0, 3);
        let checkpoint = log.checkpoint();
        log.commit(TokenKind::Comment, 4, 9);
        log.commit(TokenKind::Phrase, 0, 9);
        assert_eq!(log.len(), 3);

        log.rollback(checkpoint);
        assert_eq!(log.len(), 1);
        assert_eq!(log.as_slice()[0].kind, TokenKind::Atom);
    }

    #[test]
    fn test_sorted_by_start_then_kind() {
        let mut log = TokenLog::new();
        log.commit(TokenKind::Comment, 5, 8);
        log.commit(TokenKind::Atom, 0, 3);
        log.commit(TokenKind::Phrase, 0, 9);

        let sorted = log.sorted_tokens();
        let kinds: Vec<_> = sorted.iter().map(|t| (t.start, t.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (0, TokenKind::Phrase),
                (0, TokenKind::Atom),
                (5, TokenKind::Comment)
            ]
        );
    }

    #[test]
    fn test_empty_checkpoint() {
        let mut log = TokenLog::new();
        log.commit(TokenKind::Atom, 0, 1);
        log.rollback(Checkpoint::EMPTY);
        assert!(log.is_empty());
    }
}
