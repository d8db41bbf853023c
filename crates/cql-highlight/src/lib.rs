//! Syntax highlighting and terminal colors for cql.
//!
//! This crate provides syntax-highlighted output of CQL queries and of the TOML and JSON the
//! CLI prints, as well as styled terminal output for headers and status messages.

#![warn(missing_docs)]

use cql_query::{DEFAULT_COMPARITORS, Token, tokenize};
use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Boolean operators, including the unsupported `prox`.
const BOOLEANS: [&str; 4] = ["and", "or", "not", "prox"];

/// A syntax highlighter that can highlight code for terminal output.
pub struct Highlighter {
    /// The syntax set containing language definitions (including TOML and JSON).
    syntax_set: SyntaxSet,
    /// The theme set containing color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme to use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a new highlighter with the default theme (Dracula).
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML content for terminal output.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights JSON content for terminal output.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, "json")
    }

    /// Highlights content with the specified syntax for terminal output.
    ///
    /// If the syntax is not found, returns the content unchanged.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&escaped);
        }
        output.push_str(colors::RESET);
        output
    }
}

/// Highlights a CQL query token by token, keeping its spacing.
///
/// Booleans are bold cyan, comparitors and modifier slashes yellow, quoted terms green and
/// parentheses dim. Input that does not tokenize is returned unchanged.
pub fn highlight_cql(query: &str) -> String {
    let Ok(tokens) = tokenize(query) else {
        return query.to_string();
    };

    let mut output = String::with_capacity(query.len() * 2);
    let mut position = 0;
    for token in tokens {
        let text = token.as_str();
        // Only whitespace separates tokens, so the next occurrence is the token itself.
        let Some(offset) = query[position..].find(text) else {
            break;
        };
        output.push_str(&query[position..position + offset]);
        output.push_str(&paint_token(token));
        position += offset + text.len();
    }
    output.push_str(&query[position..]);
    output
}

/// Styles a single token by its lexical class.
fn paint_token(token: Token<'_>) -> String {
    let text = token.as_str();
    let lower = text.to_lowercase();
    if BOOLEANS.contains(&lower.as_str()) {
        header(text)
    } else if text == "/" || DEFAULT_COMPARITORS.contains(&lower.as_str()) {
        warning(text)
    } else if text == "(" || text == ")" {
        dim(text)
    } else if token.is_quoted() {
        success(text)
    } else {
        text.to_string()
    }
}

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (for success).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (for warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text (for errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a success message (green).
pub fn success(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Formats text as an error (red).
pub fn error(text: &str) -> String {
    format!("{}{}{}", colors::RED, text, colors::RESET)
}
