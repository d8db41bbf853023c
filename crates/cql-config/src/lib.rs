//! Configuration system for cql.
//!
//! cql uses TOML configuration files named `.cql.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.cql.toml` files found,
//! then loading `~/.cql.toml` as the global config with lowest precedence.
//!
//! ```toml
//! [parser]
//! comparitors = ["=", "exact"]
//! modifier_names = ["boost"]
//!
//! [output]
//! format = "compact"
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use cql_query::{AllowList, DEFAULT_COMPARITORS, ParserOptions};
pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawOutputSettings, RawParserSettings, parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::config_template;
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for cql.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Parser settings.
    pub parser: ParserSettings,
    /// Output settings.
    pub output: OutputSettings,
    /// Files the configuration was loaded from, highest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.cql.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Builds the parser configuration described by these settings.
    pub fn parser_options(&self) -> ParserOptions {
        let modifier_names = match self.parser.modifier_names {
            Some(ref names) => AllowList::only(names),
            None => AllowList::Any,
        };
        ParserOptions::default()
            .with_comparitors(&self.parser.comparitors)
            .with_modifier_names(modifier_names)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output uses the same layout as a `.cql.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            parser: &self.parser,
            output: &self.output,
        };
        toml::to_string_pretty(&serializable).map_err(|source| ConfigError::SerializeToml { source })
    }
}

/// Settings that control which CQL the parser accepts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParserSettings {
    /// Enabled comparitors, lower case.
    pub comparitors: Vec<String>,
    /// Allowed modifier names, lower case; `None` allows any name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_names: Option<Vec<String>>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            comparitors: DEFAULT_COMPARITORS.iter().map(|c| c.to_string()).collect(),
            modifier_names: None,
        }
    }
}

/// Settings for printing results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// How query expressions are printed.
    pub format: OutputFormat,
}

/// Query expression output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree, one node per line.
    #[default]
    Pretty,
    /// Single line `AND[a, b]` form.
    Compact,
    /// The JSON mapping form.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Compact => f.write_str("compact"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Borrowed view of the settings in file layout.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// `[parser]` section.
    parser: &'a ParserSettings,
    /// `[output]` section.
    output: &'a OutputSettings,
}
