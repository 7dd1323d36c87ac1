#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Parses the declarative TOML configuration file into `RunnerConfig` and
//! validates it statically before the engine ever sees it.

mod validate;

use rcr_core::RunnerConfig;
use std::path::Path;
use thiserror::Error;

pub use validate::validate_config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("duplicate group name: {0}")]
    DuplicateGroupName(String),

    #[error("duplicate command name '{command}' in group '{group}'")]
    DuplicateCommandName { group: String, command: String },

    #[error("reserved variable name cannot be defined in {location}: {name}")]
    ReservedNameInBinding { location: String, name: String },

    #[error("group '{0}' has an empty name")]
    EmptyGroupName(String),
}

/// Load and validate a runner config from a TOML file.
pub fn load_config(path: &Path) -> Result<RunnerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content, &path.display().to_string())
}

/// Parse and validate a runner config from an in-memory TOML string.
pub fn parse_config(content: &str, source_name: &str) -> Result<RunnerConfig, ConfigError> {
    let config: RunnerConfig =
        toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: source_name.to_string(),
            source: Box::new(source),
        })?;
    validate_config(&config)?;
    Ok(config)
}
