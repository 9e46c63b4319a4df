//! Environment-driven configuration for the persistence layer.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory.

use crate::logging::default_log_level;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DATABASE_PATH_VAR: &str = "HRTRACK_DATABASE_PATH";
pub const LOG_LEVEL_VAR: &str = "HRTRACK_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "HRTRACK_LOG_DIR";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Store connection settings plus the logging options that go with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file. Plays the role of the connection string.
    pub database_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl StoreConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    /// Loads settings from `.env` and the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = lookup(DATABASE_PATH_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(DATABASE_PATH_VAR))?;

        let mut config = Self::new(database_path);

        if let Some(level) = lookup(LOG_LEVEL_VAR).filter(|value| !value.trim().is_empty()) {
            config.log_level = level.trim().to_ascii_lowercase();
        }

        if let Some(dir) = lookup(LOG_DIR_VAR).filter(|value| !value.trim().is_empty()) {
            let dir = PathBuf::from(dir.trim());
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid {
                    name: LOG_DIR_VAR,
                    reason: format!("expected an absolute path, got `{}`", dir.display()),
                });
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn database_path_is_required() {
        let err = StoreConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(DATABASE_PATH_VAR));

        let err = StoreConfig::from_lookup(lookup_from(&[(DATABASE_PATH_VAR, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(DATABASE_PATH_VAR));
    }

    #[test]
    fn optional_values_fall_back_to_defaults() {
        let config =
            StoreConfig::from_lookup(lookup_from(&[(DATABASE_PATH_VAR, "hr.sqlite3")])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("hr.sqlite3"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn log_settings_are_normalized() {
        let log_dir = std::env::temp_dir().join("hrtrack-config-test");
        let log_dir_text = log_dir.to_str().unwrap().to_string();
        let config = StoreConfig::from_lookup(lookup_from(&[
            (DATABASE_PATH_VAR, "hr.sqlite3"),
            (LOG_LEVEL_VAR, " WARN "),
            (LOG_DIR_VAR, log_dir_text.as_str()),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[
            (DATABASE_PATH_VAR, "hr.sqlite3"),
            (LOG_DIR_VAR, "logs"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name, .. } if name == LOG_DIR_VAR));
    }
}
