//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use barberdesk_core::validation::validate_slot_duration;
use barberdesk_core::DEFAULT_SLOT_DURATION_MINUTES;
use serde::{Deserialize, Serialize};

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Slot length used when a request omits `slotDuration`
    pub default_slot_duration: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ApiConfig {
            port: parse_or(&lookup, "BARBERDESK_PORT", 8080)?,

            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./barberdesk.db")),

            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,

            default_slot_duration: parse_or(
                &lookup,
                "DEFAULT_SLOT_DURATION",
                DEFAULT_SLOT_DURATION_MINUTES,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        validate_slot_duration(config.default_slot_duration)
            .map_err(|_| ConfigError::InvalidValue("DEFAULT_SLOT_DURATION".to_string()))?;

        Ok(config)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: 8080,
            database_path: PathBuf::from("./barberdesk.db"),
            db_max_connections: 5,
            default_slot_duration: DEFAULT_SLOT_DURATION_MINUTES,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, PathBuf::from("./barberdesk.db"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.default_slot_duration, 30);
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("BARBERDESK_PORT", "9000"),
            ("DATABASE_PATH", "/var/lib/barberdesk/shop.db"),
            ("DEFAULT_SLOT_DURATION", "45"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_path, PathBuf::from("/var/lib/barberdesk/shop.db"));
        assert_eq!(config.default_slot_duration, 45);
    }

    #[test]
    fn test_invalid_values() {
        let err = from_pairs(&[("BARBERDESK_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == "BARBERDESK_PORT"));

        let err = from_pairs(&[("DEFAULT_SLOT_DURATION", "3")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == "DEFAULT_SLOT_DURATION"));

        assert!(from_pairs(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
    }
}
