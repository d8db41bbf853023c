//! CQL lexer (tokenizer).
//!
//! Splits a query string into a flat sequence of tokens. Tokens are string slices of the input,
//! classified only by their shape:
//!
//! - punctuation: `(`, `)`, `>=`, `<>`, `<=`, `==`, `>`, `<`, `=`, `/`
//! - quoted strings: `"..."`, where `\"` does not terminate the string
//! - bare strings: any run of characters other than `" ( ) > = < /` and whitespace
//!
//! Quotes are kept on quoted tokens; unescaping happens when the parser builds a term.

use std::{borrow::Cow, fmt, sync::LazyLock};

use regex::Regex;

use crate::error::TokenizerError;

/// Characters that cannot start a bare term.
pub(crate) const STRUCTURAL_CHARS: [char; 6] = ['(', ')', '>', '=', '<', '/'];

/// Matches one token at the start of the remaining input, after optional whitespace.
///
/// Alternatives are tried in order, so two-character comparators win over their one-character
/// prefixes. In a quoted string, a run of backslashes swallows the character after it, which
/// means a quote preceded by a backslash never closes the string.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(\(|\)|>=|<>|<=|==|>|<|=|/|"(?:[^"\\]|\\+[^\\])*"|[^"()>=<\s/]+)"#,
    )
    .expect("token pattern is a valid regex")
});

/// A single lexical token: a slice of the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a>(&'a str);

impl<'a> Token<'a> {
    /// Wraps a string slice as a token.
    pub fn new(text: &'a str) -> Self {
        Self(text)
    }

    /// Returns the token text.
    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// Returns true for a double-quoted string token.
    pub fn is_quoted(&self) -> bool {
        self.0.len() >= 2 && self.0.starts_with('"') && self.0.ends_with('"')
    }

    /// Returns true if the token starts with a character that cannot begin a term.
    pub fn starts_with_structural(&self) -> bool {
        self.0.starts_with(STRUCTURAL_CHARS)
    }
}

impl PartialEq<&str> for Token<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Quotes a term for output if it would not survive tokenizing as a single bare token.
///
/// Empty terms and terms containing `"`, a structural character or whitespace are wrapped in
/// double quotes with inner quotes escaped as `\"`.
pub(crate) fn quote_term(term: &str) -> Cow<'_, str> {
    let needs_quotes = term.is_empty()
        || term
            .chars()
            .any(|c| c == '"' || c.is_whitespace() || STRUCTURAL_CHARS.contains(&c));
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", term.replace('"', "\\\"")))
    } else {
        Cow::Borrowed(term)
    }
}

/// Tokenizes a CQL query string.
///
/// Every non-whitespace character of the input must be covered by a token; the first fragment
/// that no token shape matches (typically an unterminated quoted string) is reported as a
/// [`TokenizerError`].
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, TokenizerError> {
    let mut tokens = Vec::new();
    let mut position = 0;

    while let Some(captures) = TOKEN_PATTERN.captures(&input[position..]) {
        let (Some(whole), Some(token)) = (captures.get(0), captures.get(1)) else {
            break;
        };
        tokens.push(Token(&input[position + token.start()..position + token.end()]));
        position += whole.end();
    }

    let rest = &input[position..];
    let trimmed = rest.trim_start();
    if !trimmed.is_empty() {
        let offset = position + (rest.len() - trimmed.len());
        return Err(TokenizerError::new("unrecognized token", offset, input));
    }

    Ok(tokens)
}
