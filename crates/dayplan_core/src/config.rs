//! Runtime configuration supplied by the host application.
//!
//! # Invariants
//! - `data_dir` is absolute; database and logs live underneath it.
//! - `calendar_window_days` is at least one day. It is the span the
//!   calendar view shows when the caller does not pick a preset.

use crate::calendar::aggregator::CalendarWindow;
use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_FILE_NAME: &str = "dayplan.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    #[serde(default = "default_level_owned")]
    pub log_level: String,
    #[serde(default = "default_window_days")]
    pub calendar_window_days: u32,
}

impl CoreConfig {
    /// Config rooted at `data_dir` with defaults for everything else.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: default_level_owned(),
            calendar_window_days: default_window_days(),
        }
    }

    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir cannot be empty".to_string()));
        }
        if !self.data_dir.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "data_dir must be an absolute path, got `{}`",
                self.data_dir.display()
            )));
        }
        if self.calendar_window_days == 0 {
            return Err(ConfigError::Invalid(
                "calendar_window_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn default_level_owned() -> String {
    default_log_level().to_string()
}

fn default_window_days() -> u32 {
    CalendarWindow::default().days()
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use std::path::PathBuf;

    #[test]
    fn json_fills_defaults() {
        let config = CoreConfig::from_json_str(r#"{"data_dir":"/var/dayplan"}"#).unwrap();
        assert_eq!(config.calendar_window_days, 3);
        assert_eq!(config.db_path(), PathBuf::from("/var/dayplan/dayplan.sqlite3"));
        assert_eq!(config.log_dir(), PathBuf::from("/var/dayplan/logs"));
    }

    #[test]
    fn explicit_window_overrides_the_three_day_default() {
        let config = CoreConfig::from_json_str(
            r#"{"data_dir":"/var/dayplan","calendar_window_days":14,"log_level":"warn"}"#,
        )
        .unwrap();
        assert_eq!(config.calendar_window_days, 14);
        assert_eq!(config.log_level, "warn");
        assert_eq!(CoreConfig::new("/var/dayplan").calendar_window_days, 3);
    }

    #[test]
    fn rejects_relative_dir_and_zero_window() {
        let err = CoreConfig::from_json_str(r#"{"data_dir":"data"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("absolute")));

        let err = CoreConfig::from_json_str(
            r#"{"data_dir":"/var/dayplan","calendar_window_days":0}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = CoreConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
