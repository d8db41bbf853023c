//! Implementation of `cql check`.

use std::process::ExitCode;

use cql_config::{ConfigWarning, is_global_config};

use crate::cli::{
    context::CommandContext,
    output::{dim, print_toml, report_config_error, styled, subheader, warning},
};

/// Shows configuration files, validation warnings and the effective settings.
///
/// Warnings do not change the exit status: the configuration is still usable.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    if config.sources.is_empty() {
        println!("{}", styled(dim, "No configuration files found, using defaults."));
        println!(
            "Run {} to create a configuration file.",
            styled(subheader, "cql init")
        );
    } else {
        println!("{}", styled(subheader, "Config files:"));
        for path in &config.sources {
            let scope = if is_global_config(path) {
                "global"
            } else {
                "local"
            };
            println!(
                "   {} {}",
                path.display(),
                styled(dim, &format!("({scope})"))
            );
        }
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
    } else {
        println!(
            "{}",
            styled(subheader, &format!("Warnings ({}):", warnings.len()))
        );
        for w in &warnings {
            println!("   {}", styled(warning, &w.to_string()));
        }
        print_hints(&warnings);
    }
    println!();

    println!("{}", styled(subheader, "Effective settings:"));
    match config.settings_to_toml() {
        Ok(toml) => print_toml(&toml),
        Err(e) => return report_config_error(&e),
    }
    ExitCode::SUCCESS
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|warning| match warning {
            ConfigWarning::BoostNotAllowed | ConfigWarning::ModifierNeverAccepted { .. } => {
                "Set modifier_names = [\"boost\"] or remove it to allow boosting."
            }
            ConfigWarning::EqualsDisabled => "Add \"=\" to [parser] comparitors.",
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    println!();
    println!("{}", styled(subheader, "Hints:"));
    for hint in hints {
        println!("   - {hint}");
    }
}
