//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence rules
//! and checking comparitor names against the CQL comparitor set.

use std::path::{Path, PathBuf};

use cql_query::ParserOptions;

use crate::{
    Config, ConfigError, OutputSettings, ParserSettings,
    parse::{RawConfig, RawOutputSettings, RawParserSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config). For every setting the first file that defines it
/// wins; lists are replaced, never concatenated.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let parser = merge_parser_settings(configs)?;
    let output = merge_output_settings(configs);
    let sources = configs.iter().map(|c| c.path.clone()).collect();

    Ok(Config {
        parser,
        output,
        sources,
    })
}

/// Merges parser settings, validating each comparitor list where it is defined.
fn merge_parser_settings(configs: &[ParsedConfig]) -> Result<ParserSettings, ConfigError> {
    let mut result = ParserSettings::default();

    // Lowest precedence first, so higher precedence overwrites.
    for parsed in configs.iter().rev() {
        if let Some(ref parser) = parsed.config.parser {
            apply_raw_parser(&mut result, parser, &parsed.path)?;
        }
    }

    Ok(result)
}

/// Applies raw parser settings to result, overwriting any present values.
fn apply_raw_parser(
    result: &mut ParserSettings,
    raw: &RawParserSettings,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(ref comparitors) = raw.comparitors {
        result.comparitors = normalize_comparitors(comparitors, path)?;
    }
    if let Some(ref names) = raw.modifier_names {
        result.modifier_names = Some(names.iter().map(|n| n.to_lowercase()).collect());
    }
    Ok(())
}

/// Lower-cases and checks a comparitor list.
fn normalize_comparitors(comparitors: &[String], path: &Path) -> Result<Vec<String>, ConfigError> {
    if comparitors.is_empty() {
        return Err(ConfigError::NoComparitors {
            path: path.to_path_buf(),
        });
    }

    let mut result = Vec::with_capacity(comparitors.len());
    for comparitor in comparitors {
        if !ParserOptions::is_cql_comparitor(comparitor) {
            return Err(ConfigError::UnknownComparitor {
                comparitor: comparitor.clone(),
                path: path.to_path_buf(),
            });
        }
        let lower = comparitor.to_lowercase();
        if !result.contains(&lower) {
            result.push(lower);
        }
    }
    Ok(result)
}

/// Merges output settings.
fn merge_output_settings(configs: &[ParsedConfig]) -> OutputSettings {
    let mut result = OutputSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref output) = parsed.config.output {
            apply_raw_output(&mut result, output);
        }
    }

    result
}

/// Applies raw output settings to result.
fn apply_raw_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(format) = raw.format {
        result.format = format;
    }
}
