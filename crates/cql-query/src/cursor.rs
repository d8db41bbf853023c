//! Position-addressable view over a token sequence with checkpoint/rollback support.
//!
//! The parser expresses all backtracking through the bookmark stack: an attempt calls
//! [`TokenCursor::bookmark`] first, then [`TokenCursor::drop_bookmark`] when it succeeds or
//! [`TokenCursor::revert_to_bookmark`] when it fails.

use crate::{error::ParseError, lexer::Token};

/// A cursor over a token sequence.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    /// Tokens being parsed.
    tokens: Vec<Token<'a>>,
    /// Index of the current token.
    position: usize,
    /// Saved positions, most recent last.
    bookmarks: Vec<usize>,
    /// Highest index examined so far; `tokens.len()` once the end has been probed.
    furthest: usize,
}

impl<'a> TokenCursor<'a> {
    /// Creates a cursor positioned at the first token.
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens,
            position: 0,
            bookmarks: Vec::new(),
            furthest: 0,
        }
    }

    /// Returns the current token without consuming it.
    pub fn peek(&mut self) -> Result<Token<'a>, ParseError> {
        self.safe_peek()
            .ok_or_else(|| ParseError::new("unexpected end of query"))
    }

    /// Consumes and returns the current token.
    pub fn next_token(&mut self) -> Result<Token<'a>, ParseError> {
        self.safe_next()
            .ok_or_else(|| ParseError::new("unexpected end of query"))
    }

    /// Returns the current token, or `None` when exhausted.
    pub fn safe_peek(&mut self) -> Option<Token<'a>> {
        self.furthest = self.furthest.max(self.position);
        self.tokens.get(self.position).copied()
    }

    /// Consumes and returns the current token, or `None` when exhausted.
    pub fn safe_next(&mut self) -> Option<Token<'a>> {
        let token = self.safe_peek()?;
        self.position += 1;
        Some(token)
    }

    /// Returns true if at least one token remains.
    pub fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if there are no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the token at `index`.
    pub fn get(&self, index: usize) -> Option<Token<'a>> {
        self.tokens.get(index).copied()
    }

    /// Highest token index examined by any peek or consume.
    ///
    /// Equals [`len`](Self::len) if the parser ran into the end of the input.
    pub fn furthest(&self) -> usize {
        self.furthest
    }

    /// Saves the current position on the bookmark stack.
    pub fn bookmark(&mut self) {
        self.bookmarks.push(self.position);
    }

    /// Pops the most recent bookmark and restores its position.
    pub fn revert_to_bookmark(&mut self) {
        debug_assert!(!self.bookmarks.is_empty(), "revert without bookmark");
        if let Some(position) = self.bookmarks.pop() {
            self.position = position;
        }
    }

    /// Pops the most recent bookmark, keeping the current position.
    pub fn drop_bookmark(&mut self) {
        debug_assert!(!self.bookmarks.is_empty(), "drop without bookmark");
        self.bookmarks.pop();
    }
}
