//! Clinic configuration loaded from TOML.
//!
//! ```toml
//! database_path = "/var/lib/clinic/clinic.db"
//! week_starts_on = "sunday"
//! ```

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClinicConfig {
    /// SQLite file for the store; in-memory when absent
    pub database_path: Option<PathBuf>,
    /// First weekday of the calendar week
    #[serde(deserialize_with = "weekday_from_name")]
    pub week_starts_on: Weekday,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            week_starts_on: Weekday::Sun,
        }
    }
}

impl ClinicConfig {
    /// Config for a store at `path` with default calendar settings.
    pub fn with_database(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded clinic config");
        Ok(config)
    }
}

fn weekday_from_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
    let name = String::deserialize(deserializer)?;
    name.trim()
        .parse()
        .map_err(|_| serde::de::Error::custom(format!("unknown weekday: {:?}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClinicConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClinicConfig::default());
        assert_eq!(config.week_starts_on, Weekday::Sun);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_parse() {
        let config = ClinicConfig::from_toml_str(
            r#"
            database_path = "/tmp/clinic.db"
            week_starts_on = "Monday"
            "#,
        )
        .unwrap();
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/clinic.db")));
        assert_eq!(config.week_starts_on, Weekday::Mon);
    }

    #[test]
    fn test_rejects_bad_weekday() {
        assert!(ClinicConfig::from_toml_str(r#"week_starts_on = "someday""#).is_err());
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(ClinicConfig::from_toml_str(r#"colour = "blue""#).is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"week_starts_on = "sat""#).unwrap();

        let config = ClinicConfig::load(file.path()).unwrap();
        assert_eq!(config.week_starts_on, Weekday::Sat);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ClinicConfig::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
