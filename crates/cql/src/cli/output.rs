//! Styled output and error reporting for CLI commands.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use cql_config::ConfigError;
pub use cql_highlight::{dim, subheader, warning};
use cql_highlight::{Highlighter, highlight_cql};
use cql_query::CqlError;

/// Exit status for tokenizer and grammar errors.
const PARSE_FAILURE: u8 = 1;
/// Exit status for valid CQL that uses an unsupported feature.
const UNSUPPORTED: u8 = 2;
/// Exit status for unreadable or invalid configuration.
const CONFIG_FAILURE: u8 = 3;

/// Returns true when stdout is a terminal and output should be colored.
pub fn use_color() -> bool {
    io::stdout().is_terminal()
}

/// Applies `style` only when writing to a terminal.
pub fn styled(style: fn(&str) -> String, text: &str) -> String {
    if use_color() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Prints a CQL query, highlighted on a terminal.
pub fn print_cql(cql: &str) {
    if use_color() {
        println!("{}", highlight_cql(cql));
    } else {
        println!("{cql}");
    }
}

/// Prints JSON text, highlighted on a terminal.
pub fn print_json(json: &str) {
    if use_color() {
        println!("{}", Highlighter::new().highlight_json(json));
    } else {
        println!("{json}");
    }
}

/// Prints TOML text, highlighted on a terminal.
pub fn print_toml(toml: &str) {
    if use_color() {
        print!("{}", Highlighter::new().highlight_toml(toml));
    } else {
        print!("{toml}");
    }
}

/// Reports a query error on stderr and returns its exit code.
pub fn report_cql_error(err: &CqlError) -> ExitCode {
    match err {
        CqlError::Tokenize(e) => eprintln!("error: {}", e.format_with_context()),
        CqlError::Parse(_) | CqlError::Unsupported(_) => eprintln!("error: {err}"),
    }
    if let Some(hint) = err.suggestion() {
        eprintln!("hint: {hint}");
    }
    ExitCode::from(cql_error_status(err))
}

/// Reports a configuration error on stderr and returns its exit code.
pub fn report_config_error(err: &ConfigError) -> ExitCode {
    eprintln!("error: {}", config_error_message(err));
    ExitCode::from(CONFIG_FAILURE)
}

/// Describes a configuration error; failures other than serialization happened while loading.
fn config_error_message(err: &ConfigError) -> String {
    match err {
        ConfigError::SerializeToml { .. } => err.to_string(),
        _ => format!("failed to load configuration: {err}"),
    }
}

/// Maps a query error to its exit status.
fn cql_error_status(err: &CqlError) -> u8 {
    if err.is_unsupported() {
        UNSUPPORTED
    } else {
        PARSE_FAILURE
    }
}
