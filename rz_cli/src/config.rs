//! Command-line configuration management.
//!
//! All environment variable reads go through here and produce a validated
//! configuration.

use std::path::PathBuf;

use ritsuzen::constants::{DEFAULT_GROUP_SIZE, DEFAULT_ROUNDS_COUNT, ROUNDS_OPTIONS};

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory the application data is stored in
    pub data_dir: PathBuf,
    /// Rounds count for new competitions
    pub default_rounds: u32,
    /// Group size used by `group` without an explicit size
    pub group_size: usize,
    /// Rotation setting for new competitions
    pub rotation: bool,
    /// Handicap setting for new competitions
    pub handicap: bool,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./ritsuzen-data"),
            default_rounds: DEFAULT_ROUNDS_COUNT,
            group_size: DEFAULT_GROUP_SIZE,
            rotation: true,
            handicap: false,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unparsable value
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = match lookup("RITSUZEN_DATA_DIR") {
            Some(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::MissingRequired {
                    var: "RITSUZEN_DATA_DIR".to_string(),
                    hint: "Unset it to use ./ritsuzen-data or point it at a directory".to_string(),
                });
            }
            Some(dir) => PathBuf::from(dir),
            None => defaults.data_dir,
        };

        Ok(Self {
            data_dir,
            default_rounds: parse_env_or(&lookup, "RITSUZEN_DEFAULT_ROUNDS", defaults.default_rounds)?,
            group_size: parse_env_or(&lookup, "RITSUZEN_GROUP_SIZE", defaults.group_size)?,
            rotation: parse_env_or(&lookup, "RITSUZEN_ROTATION", defaults.rotation)?,
            handicap: parse_env_or(&lookup, "RITSUZEN_HANDICAP", defaults.handicap)?,
            log_filter: lookup("RITSUZEN_LOG").unwrap_or(defaults.log_filter),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ROUNDS_OPTIONS.contains(&self.default_rounds) {
            return Err(ConfigError::Invalid {
                var: "RITSUZEN_DEFAULT_ROUNDS".to_string(),
                reason: format!("Must be one of {ROUNDS_OPTIONS:?}"),
            });
        }

        if self.group_size == 0 {
            return Err(ConfigError::Invalid {
                var: "RITSUZEN_GROUP_SIZE".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse a variable, falling back to `default` when it is unset
fn parse_env_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Cannot parse '{value}'"),
        }),
    }
}
