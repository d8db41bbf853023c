//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use cql_config::Config;
use cql_query::{Node, parse_with};
use log::debug;

use crate::cli::output::{report_config_error, report_cql_error};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    ///
    /// An explicit config file replaces discovery entirely.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let loaded = match explicit {
            Some(path) => Config::load_from_files(&[path.to_path_buf()]),
            None => Config::load(&cwd),
        };
        let config = loaded.map_err(|e| report_config_error(&e))?;
        debug!("configuration loaded from {:?}", config.sources);
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Parses a query with the configured parser options, reporting failures.
    pub fn parse(&self, query: &str) -> Result<Node, ExitCode> {
        parse_with(query, &self.config.parser_options()).map_err(|e| report_cql_error(&e))
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}
