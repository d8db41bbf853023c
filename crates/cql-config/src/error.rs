//! Error types for cql configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A configured comparitor is not part of CQL.
    #[error("unknown comparitor '{comparitor}' in {path}")]
    UnknownComparitor {
        /// The comparitor as written.
        comparitor: String,
        /// File that configured it.
        path: PathBuf,
    },

    /// The comparitor list is empty, so no relation could ever be parsed.
    #[error("no comparitors enabled in {path}")]
    NoComparitors {
        /// File that configured the empty list.
        path: PathBuf,
    },

    /// Failed to serialize the effective settings.
    #[error("failed to serialize settings: {source}")]
    SerializeToml {
        /// Underlying TOML serialization error.
        source: ser::Error,
    },
}
