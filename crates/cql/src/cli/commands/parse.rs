//! Implementation of `cql parse`.

use std::process::ExitCode;

use crate::cli::{args::QueryArgs, context::CommandContext};

/// Prints the syntax tree of a query.
pub fn run(ctx: &CommandContext, cmd: &QueryArgs) -> ExitCode {
    match ctx.parse(&cmd.query) {
        Ok(node) => {
            println!("{}", node.pretty_print());
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}
