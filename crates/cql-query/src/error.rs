//! Error types for CQL tokenizing, parsing and normalization.
//!
//! There are three non-overlapping failure classes:
//!
//! - [`TokenizerError`]: the raw text contains a fragment no token shape matches.
//! - [`ParseError`]: the token sequence does not match the grammar.
//! - [`UnsupportedCql`]: the input is valid CQL but uses a feature this parser rejects.

use std::{error::Error as StdError, fmt};

use thiserror::Error;

use crate::ast::Node;

/// Tokenizer error with position information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerError {
    /// Error message.
    pub message: String,
    /// The unrecognized fragment of input.
    pub fragment: String,
    /// Byte position in input where the fragment starts.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl TokenizerError {
    /// Creates a new tokenizer error for the fragment starting at `position`.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            fragment: input[position..].trim_end().to_string(),
            position,
            input: input.to_string(),
        }
    }

    /// Formats the error with a position indicator showing where the error occurred.
    pub fn format_with_context(&self) -> String {
        let mut result = String::new();
        result.push_str(&format!("{}: {}\n", self.message, self.fragment));
        result.push_str(&format!("  {}\n", self.input));
        result.push_str(&format!("  {}^", " ".repeat(self.position)));
        result
    }
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_context())
    }
}

impl StdError for TokenizerError {}

/// The token sequence does not match the CQL grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// The offending token, if the error points at one.
    pub token: Option<String>,
    /// Index of the offending token in the token sequence.
    pub token_index: Option<usize>,
    /// The partial result, for trailing-token errors.
    pub partial: Option<Box<Node>>,
}

impl ParseError {
    /// Creates a parse error that carries only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            token: None,
            token_index: None,
            partial: None,
        }
    }

    /// Creates a parse error pointing at a token.
    pub fn at_token(message: impl Into<String>, token: &str, index: usize) -> Self {
        Self {
            message: message.into(),
            token: Some(token.to_string()),
            token_index: Some(index),
            partial: None,
        }
    }

    /// Attaches the partially parsed tree.
    pub fn with_partial(mut self, partial: Node) -> Self {
        self.partial = Some(Box::new(partial));
        self
    }
}

/// Valid CQL that uses a feature this implementation deliberately does not support.
///
/// Unlike [`ParseError`], this is never recovered by backtracking: it aborts the parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported CQL: {feature}")]
pub struct UnsupportedCql {
    /// Description of the rejected feature.
    pub feature: String,
    /// The token that triggered the rejection.
    pub token: Option<String>,
}

impl UnsupportedCql {
    /// Creates a capability rejection for `feature`, triggered by `token`.
    pub fn new(feature: impl Into<String>, token: Option<&str>) -> Self {
        Self {
            feature: feature.into(),
            token: token.map(str::to_string),
        }
    }
}

/// Any error produced while turning CQL text into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CqlError {
    /// The input could not be tokenized.
    #[error(transparent)]
    Tokenize(#[from] TokenizerError),
    /// The tokens do not match the grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The query uses an unsupported CQL feature.
    #[error(transparent)]
    Unsupported(#[from] UnsupportedCql),
}

impl CqlError {
    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        match self {
            Self::Tokenize(err) => &err.message,
            Self::Parse(err) => &err.message,
            Self::Unsupported(err) => &err.feature,
        }
    }

    /// Returns true if this is a capability rejection rather than malformed input.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Tokenize(err) if err.fragment.starts_with('"') => {
                Some("Add a closing quote (\") to complete the term")
            }
            Self::Parse(err) if err.message.contains("end of query") => {
                Some("The query ends early; check for a missing term or closing parenthesis")
            }
            Self::Unsupported(err) if err.feature.contains("prox") => {
                Some("Proximity searches are not supported; use AND instead")
            }
            Self::Unsupported(err) if err.feature.contains("prefix") => {
                Some("Remove the '>' prefix assignment and use plain index names")
            }
            Self::Unsupported(err) if err.feature.contains("modifier") => {
                Some("Only a single '/boost=<number>' modifier on a relation is supported")
            }
            _ => None,
        }
    }
}
