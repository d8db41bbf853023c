//! Implementation of `cql format`.

use std::process::ExitCode;

use cql_query::to_cql_string;

use crate::cli::{args::QueryArgs, context::CommandContext, output::print_cql};

/// Prints a query in canonical CQL form.
pub fn run(ctx: &CommandContext, cmd: &QueryArgs) -> ExitCode {
    match ctx.parse(&cmd.query) {
        Ok(node) => {
            print_cql(&to_cql_string(&node));
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}
