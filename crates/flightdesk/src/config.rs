//! Configuration management for flightdesk.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "flightdesk";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "flightdesk.db";

/// Largest accepted rest buffer, one year.
pub const MAX_REST_BUFFER_HOURS: u32 = 8760;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLIGHTDESK_`, `__` between sections)
/// 2. TOML config file at `~/.config/flightdesk/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Scheduling rules.
    pub schedule: ScheduleConfig,
    /// Input and output formats.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/flightdesk/flightdesk.db`
    pub database_path: Option<PathBuf>,
}

/// Scheduling rules applied by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Rest buffer added before departure and after arrival when checking
    /// pilot availability.
    pub rest_buffer_hours: u32,
    /// Reject flights whose expected arrival is not after their departure.
    pub require_arrival_after_departure: bool,
}

/// Formats used to read and print instants and dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// `chrono` format for instants.
    pub datetime_format: String,
    /// `chrono` format for calendar dates.
    pub date_format: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            rest_buffer_hours: 24,
            require_arrival_after_departure: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            datetime_format: "%H:%M %d/%m/%Y".to_string(),
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl ScheduleConfig {
    /// The rest buffer as a duration.
    #[must_use]
    pub fn rest_buffer(&self) -> Duration {
        Duration::hours(i64::from(self.rest_buffer_hours))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FLIGHTDESK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the rest buffer exceeds [`MAX_REST_BUFFER_HOURS`],
    /// or if a display format is empty or cannot read back what it prints.
    pub fn validate(&self) -> Result<()> {
        if self.schedule.rest_buffer_hours > MAX_REST_BUFFER_HOURS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "schedule.rest_buffer_hours must be at most {MAX_REST_BUFFER_HOURS}, got {}",
                    self.schedule.rest_buffer_hours
                ),
            });
        }

        let sample = NaiveDate::from_ymd_opt(2024, 12, 31)
            .and_then(|date| date.and_hms_opt(23, 45, 0))
            .ok_or_else(|| Error::internal("invalid sample instant"))?;

        let datetime_format = &self.display.datetime_format;
        if datetime_format.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "display.datetime_format must not be empty".to_string(),
            });
        }
        let printed = sample.format(datetime_format).to_string();
        if NaiveDateTime::parse_from_str(&printed, datetime_format).ok() != Some(sample) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "display.datetime_format '{datetime_format}' must include date, hour and minute"
                ),
            });
        }

        let date_format = &self.display.date_format;
        if date_format.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "display.date_format must not be empty".to_string(),
            });
        }
        let printed = sample.date().format(date_format).to_string();
        if NaiveDate::parse_from_str(&printed, date_format).ok() != Some(sample.date()) {
            return Err(Error::ConfigValidation {
                message: format!("display.date_format '{date_format}' must include a full date"),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.schedule.rest_buffer_hours, 24);
        assert!(!config.schedule.require_arrival_after_departure);
        assert_eq!(config.display.datetime_format, "%H:%M %d/%m/%Y");
        assert_eq!(config.display.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_rest_buffer() {
        let schedule = ScheduleConfig::default();
        assert_eq!(schedule.rest_buffer(), Duration::days(1));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rest_buffer_bound() {
        let mut config = Config::default();
        config.schedule.rest_buffer_hours = MAX_REST_BUFFER_HOURS;
        assert!(config.validate().is_ok());

        config.schedule.rest_buffer_hours = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
        assert!(err.to_string().contains("rest_buffer_hours"));
    }

    #[test]
    fn test_load_rejects_huge_rest_buffer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[schedule]\nrest_buffer_hours = 4294967295").unwrap();

        let err = Config::load_from(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_validate_empty_datetime_format() {
        let mut config = Config::default();
        config.display.datetime_format = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("datetime_format"));
    }

    #[test]
    fn test_validate_datetime_format_without_time() {
        let mut config = Config::default();
        config.display.datetime_format = "%d/%m/%Y".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("hour and minute"));
    }

    #[test]
    fn test_validate_date_format_without_year() {
        let mut config = Config::default();
        config.display.date_format = "%d/%m".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("date_format"));
    }

    #[test]
    fn test_validate_iso_formats() {
        let mut config = Config::default();
        config.display.datetime_format = "%Y-%m-%d %H:%M".to_string();
        config.display.date_format = "%Y-%m-%d".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config
            .database_path()
            .to_string_lossy()
            .contains("flightdesk.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("flightdesk"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[storage]
database_path = "/tmp/flights.db"

[schedule]
rest_buffer_hours = 12
require_arrival_after_departure = true
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/flights.db"));
        assert_eq!(config.schedule.rest_buffer_hours, 12);
        assert!(config.schedule.require_arrival_after_departure);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_format() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\ndate_format = \"\"").unwrap();

        let err = Config::load_from(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_schedule_config_deserialize_partial() {
        let json = r#"{"rest_buffer_hours": 6}"#;
        let schedule: ScheduleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.rest_buffer_hours, 6);
        assert!(!schedule.require_arrival_after_departure);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("rest_buffer_hours"));
        assert!(json.contains("datetime_format"));
    }
}
