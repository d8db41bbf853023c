//! Command implementations and dispatch.

pub mod check;
pub mod expr;
pub mod format;
pub mod init;
pub mod lucene;
pub mod parse;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
        Commands::Expr(cmd) => expr::run(ctx, &cmd),
        Commands::Format(cmd) => format::run(ctx, &cmd),
        Commands::Lucene(cmd) => lucene::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Init(cmd) => init::run(ctx, &cmd),
    }
}
