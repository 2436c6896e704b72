use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::types::Config;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "INFRAWRAP_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// `INFRAWRAP_CONFIG` wins; otherwise `infrawrap/config.toml` under
    /// `dirs::config_dir()`, falling back to the current directory.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("infrawrap").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - Command names are non-empty and contain no whitespace
    /// - Argument names are unique within a command
    /// - Flag names are unique within a command
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, command) in &self.commands {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ConfigError::ValidationError {
                    message: format!("invalid command name '{}'", name),
                });
            }

            let mut seen = HashSet::new();
            for slot in &command.arguments {
                if !seen.insert(slot.name.as_str()) {
                    return Err(ConfigError::ValidationError {
                        message: format!(
                            "command '{}' declares argument '{}' more than once",
                            name, slot.name
                        ),
                    });
                }
            }

            let mut seen = HashSet::new();
            for flag in &command.flags {
                if !seen.insert(flag.name.as_str()) {
                    return Err(ConfigError::ValidationError {
                        message: format!(
                            "command '{}' declares flag '{}' more than once",
                            name, flag.name
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}
