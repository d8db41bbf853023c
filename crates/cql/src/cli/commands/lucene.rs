//! Implementation of `cql lucene`.

use std::process::ExitCode;

use cql_query::{CqlError, to_lucene_string};

use crate::cli::{args::QueryArgs, context::CommandContext, output::report_cql_error};

/// Prints a query in Lucene query syntax.
pub fn run(ctx: &CommandContext, cmd: &QueryArgs) -> ExitCode {
    let node = match ctx.parse(&cmd.query) {
        Ok(node) => node,
        Err(code) => return code,
    };
    match to_lucene_string(&node) {
        Ok(lucene) => {
            println!("{lucene}");
            ExitCode::SUCCESS
        }
        Err(e) => report_cql_error(&CqlError::from(e)),
    }
}
