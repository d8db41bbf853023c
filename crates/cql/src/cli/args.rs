//! Clap argument definitions for the `cql` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use cql_config::OutputFormat;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "cql")]
#[command(about = "Parse, normalize and convert Contextual Query Language queries")]
pub struct Cli {
    /// Use this configuration file instead of discovering .cql.toml files
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v for debug logging, -vv for trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Supported `cql` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a query and print its syntax tree
    Parse(QueryArgs),

    /// Normalize a query into a boolean query expression
    #[command(after_help = "\
OUTPUT FORMATS:
  pretty     Indented tree, negated operands prefixed with '!' (default)
  compact    Single line, e.g. OR[AND[a, b], !c]
  json       The mapping form {operator, operands, must_not} / {index, relation, term, boost, must_not}

EXAMPLES:
  cql expr 'a and b or c'
  cql expr --compact 'title = dune not author = frank'
  cql expr --json 'title =/boost=2 dune'")]
    Expr(ExprCommand),

    /// Print a query in canonical CQL form
    Format(QueryArgs),

    /// Convert a query to Lucene query syntax
    Lucene(QueryArgs),

    /// Validate configuration and show effective settings
    Check,

    /// Initialize cql configuration in current directory
    Init(InitCommand),
}

/// A single CQL query argument.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// CQL query text
    pub query: String,
}

/// Arguments for `cql expr`.
#[derive(Args, Debug, Clone)]
pub struct ExprCommand {
    /// CQL query text
    pub query: String,

    /// Output the JSON mapping form
    #[arg(long, conflicts_with = "compact")]
    pub json: bool,

    /// Output the single-line form
    #[arg(long)]
    pub compact: bool,
}

impl ExprCommand {
    /// Returns the output format, preferring flags over the configured default.
    pub fn format(&self, configured: OutputFormat) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.compact {
            OutputFormat::Compact
        } else {
            configured
        }
    }
}

/// Arguments for `cql init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.cql.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn expr_flags_override_configured_format() {
        let cli = Cli::try_parse_from(["cql", "expr", "--json", "a"]).unwrap();
        let Commands::Expr(cmd) = cli.command else {
            panic!("expected expr command");
        };
        assert_eq!(cmd.format(OutputFormat::Compact), OutputFormat::Json);

        let cli = Cli::try_parse_from(["cql", "expr", "a"]).unwrap();
        let Commands::Expr(cmd) = cli.command else {
            panic!("expected expr command");
        };
        assert_eq!(cmd.format(OutputFormat::Compact), OutputFormat::Compact);
    }

    #[test]
    fn json_conflicts_with_compact() {
        assert!(Cli::try_parse_from(["cql", "expr", "--json", "--compact", "a"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cql", "parse", "a", "-vv", "--config", "x.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
