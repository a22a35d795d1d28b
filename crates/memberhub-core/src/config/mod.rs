//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file overlaid with `MEMBERHUB__*` environment
//! variables. Each sub-module represents a logical configuration section.

pub mod api;
pub mod logging;
pub mod table;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::logging::LoggingConfig;
use self::table::TableConfig;

use crate::error::AppError;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Administration API connection settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// List view defaults.
    #[serde(default)]
    pub table: TableConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Reads `path` (or [`DEFAULT_CONFIG_PATH`]) if it exists, then applies
    /// environment variables prefixed with `MEMBERHUB` using `__` as the
    /// section separator, e.g. `MEMBERHUB__API__BASE_URL`.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let file = path.unwrap_or(DEFAULT_CONFIG_PATH);
        let config = config::Config::builder()
            .add_source(config::File::with_name(file).required(path.is_some()))
            .add_source(
                config::Environment::with_prefix("MEMBERHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject values that would make every request invalid.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::configuration("api.base_url must not be empty"));
        }
        if self.table.page_size == 0 {
            return Err(AppError::configuration("table.page_size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.table.page_size, 10);
        assert_eq!(config.table.debounce_ms, 300);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = AppConfig::default();
        config.table.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let config = AppConfig::load(None).expect("defaults");
        assert_eq!(config.logging.level, "info");
    }
}
