//! Configuration file parsing.
//!
//! Parses individual `.cql.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::{ConfigError, OutputFormat};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Parser settings section.
    pub parser: Option<RawParserSettings>,
    /// Output settings section.
    pub output: Option<RawOutputSettings>,
}

/// Raw parser settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawParserSettings {
    /// Comparitors the parser accepts.
    pub comparitors: Option<Vec<String>>,
    /// Modifier names the parser accepts.
    pub modifier_names: Option<Vec<String>>,
}

/// Raw output settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOutputSettings {
    /// How query expressions are printed.
    pub format: Option<OutputFormat>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.parser.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
root = true

[parser]
comparitors = ["=", "exact"]
modifier_names = ["boost"]

[output]
format = "json"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.root, Some(true));
        let parser = config.parser.unwrap();
        assert_eq!(
            parser.comparitors,
            Some(vec!["=".to_string(), "exact".to_string()])
        );
        assert_eq!(parser.modifier_names, Some(vec!["boost".to_string()]));
        assert_eq!(config.output.unwrap().format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_parse_partial_parser_settings() {
        let toml = r#"
[parser]
comparitors = ["any"]
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let parser = config.parser.unwrap();
        assert_eq!(parser.comparitors, Some(vec!["any".to_string()]));
        assert!(parser.modifier_names.is_none());
    }

    #[test]
    fn test_parse_unknown_format_fails() {
        let toml = r#"
[output]
format = "xml"
"#;
        let err = parse_config_str(toml, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(parse_config("[parser").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = parse_config_file(Path::new("/nonexistent/.cql.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
