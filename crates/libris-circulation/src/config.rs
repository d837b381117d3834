//! # Library Configuration
//!
//! Configuration for opening a [`Library`](crate::Library).
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     LIBRIS_DB_PATH=/srv/libris/libris.db                               │
//! │     LIBRIS_MAX_CONNECTIONS=8                                           │
//! │     LIBRIS_FINE_PER_DAY_CENTS=50                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     explicit path, or libris.toml in the platform config dir           │
//! │     ~/.config/libris/libris.toml (Linux)                               │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     libris.db in the platform data dir, 1.00 per overdue day           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/srv/libris/libris.db"
//! max_connections = 5
//!
//! [circulation]
//! fine_per_day_cents = 100
//! ```

use std::path::{Path, PathBuf};

use libris_core::{Money, DEFAULT_FINE_PER_DAY_CENTS};
use libris_db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::engine::CirculationSettings;

const CONFIG_FILE_NAME: &str = "libris.toml";
const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML.
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Database Settings
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. `":memory:"` opens a private in-memory database.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("org", "libris", "libris")
        .map(|dirs| dirs.data_dir().join("libris.db"))
        .unwrap_or_else(|| PathBuf::from("libris.db"))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseSettings {
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == IN_MEMORY_PATH
    }

    /// Pool configuration for libris-db.
    pub fn to_db_config(&self) -> DbConfig {
        if self.is_in_memory() {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.path).max_connections(self.max_connections)
        }
    }
}

// =============================================================================
// Circulation Settings
// =============================================================================

/// `[circulation]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CirculationConfig {
    /// Fine per overdue day, in cents.
    #[serde(default = "default_fine_per_day_cents")]
    pub fine_per_day_cents: i64,
}

fn default_fine_per_day_cents() -> i64 {
    DEFAULT_FINE_PER_DAY_CENTS
}

impl Default for CirculationConfig {
    fn default() -> Self {
        CirculationConfig {
            fine_per_day_cents: default_fine_per_day_cents(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete library configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub circulation: CirculationConfig,
}

impl LibraryConfig {
    /// Defaults with a private in-memory database (tests, demos).
    pub fn in_memory() -> Self {
        LibraryConfig {
            database: DatabaseSettings {
                path: PathBuf::from(IN_MEMORY_PATH),
                max_connections: 1,
            },
            circulation: CirculationConfig::default(),
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `libris.toml` in the config dir)
    /// 3. Environment variables
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading library config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file without applying overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        info!(?path, "Library config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.circulation.fine_per_day_cents < 0 {
            return Err(ConfigError::Invalid(
                "circulation.fine_per_day_cents must not be negative".into(),
            ));
        }

        Ok(())
    }

    /// Engine settings derived from the `[circulation]` section.
    pub fn circulation_settings(&self) -> CirculationSettings {
        CirculationSettings {
            fine_per_day: Money::from_cents(self.circulation.fine_per_day_cents),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `LIBRIS_*` overrides read through `lookup`.
    ///
    /// Values that fail to parse are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("LIBRIS_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("LIBRIS_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid LIBRIS_MAX_CONNECTIONS"),
            }
        }

        if let Some(fine) = lookup("LIBRIS_FINE_PER_DAY_CENTS") {
            match fine.parse::<i64>() {
                Ok(cents) => {
                    debug!(cents, "Overriding fine per day from environment");
                    self.circulation.fine_per_day_cents = cents;
                }
                Err(_) => warn!(value = %fine, "Ignoring invalid LIBRIS_FINE_PER_DAY_CENTS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "libris", "libris")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = LibraryConfig::default();
        assert_eq!(config.circulation.fine_per_day_cents, 100);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.validate().is_ok());
        assert_eq!(config.circulation_settings().fine_per_day, Money::from_units(1));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: LibraryConfig = toml::from_str(
            r#"
            [circulation]
            fine_per_day_cents = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.circulation.fine_per_day_cents, 25);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("LIBRIS_DB_PATH", ":memory:"),
            ("LIBRIS_MAX_CONNECTIONS", "not-a-number"),
            ("LIBRIS_FINE_PER_DAY_CENTS", "250"),
        ]
        .into_iter()
        .collect();

        let mut config = LibraryConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert!(config.database.is_in_memory());
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.circulation.fine_per_day_cents, 250);
    }

    #[test]
    fn test_validation() {
        let mut config = LibraryConfig::in_memory();
        assert!(config.validate().is_ok());

        config.circulation.fine_per_day_cents = -1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.circulation.fine_per_day_cents = 0;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_in_memory_maps_to_single_connection_pool() {
        let db_config = LibraryConfig::in_memory().database.to_db_config();
        assert!(db_config.is_in_memory());
        assert_eq!(db_config.max_connections, 1);
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir()
            .join(format!("libris-config-test-{}", std::process::id()))
            .join(CONFIG_FILE_NAME);

        let mut config = LibraryConfig::in_memory();
        config.circulation.fine_per_day_cents = 40;
        config.save(&path).unwrap();

        let loaded = LibraryConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("libris-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[circulation\nfine_per_day_cents = ").unwrap();

        let result = LibraryConfig::load(Some(path.clone()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        let _ = std::fs::remove_file(&path);
    }
}
