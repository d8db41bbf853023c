//! Implementation of `cql init`.

use std::{fs, process::ExitCode};

use cql_config::{CONFIG_FILENAME, config_template, global_config_path};

use crate::cli::{
    args::InitCommand,
    context::CommandContext,
    output::{print_toml, styled, subheader},
};

/// Writes a commented-out `.cql.toml` template.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let cwd = &ctx.cwd;

    let is_home_dir = global_config_path()
        .and_then(|p| p.parent().map(|h| h == cwd))
        .unwrap_or(false);

    let config_path = if cmd.global || is_home_dir {
        match global_config_path() {
            Some(path) => path,
            None => {
                eprintln!("error: could not determine home directory");
                return ExitCode::FAILURE;
            }
        }
    } else {
        cwd.join(CONFIG_FILENAME)
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let template = config_template();
    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", styled(subheader, "Configuration written:"));
    print_toml(&template);

    ExitCode::SUCCESS
}
