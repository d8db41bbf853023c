//! Implementation of `cql expr`.

use std::process::ExitCode;

use cql_config::OutputFormat;
use cql_query::{QueryExpression, to_query_expression};

use crate::cli::{
    args::ExprCommand,
    context::CommandContext,
    output::{print_json, report_cql_error},
};

/// Normalizes a query and prints the resulting query expression.
pub fn run(ctx: &CommandContext, cmd: &ExprCommand) -> ExitCode {
    let node = match ctx.parse(&cmd.query) {
        Ok(node) => node,
        Err(code) => return code,
    };
    let expression = match to_query_expression(&node) {
        Ok(expression) => expression,
        Err(e) => return report_cql_error(&e),
    };

    match cmd.format(ctx.config.output.format) {
        OutputFormat::Pretty => println!("{}", expression.render(true)),
        OutputFormat::Compact => println!("{expression}"),
        OutputFormat::Json => return print_mapping(&expression),
    }
    ExitCode::SUCCESS
}

/// Prints the JSON mapping form of an expression.
fn print_mapping(expression: &QueryExpression) -> ExitCode {
    let json = expression
        .as_mapping()
        .and_then(|mapping| serde_json::to_string_pretty(&mapping));
    match json {
        Ok(json) => {
            print_json(&json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}
