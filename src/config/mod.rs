//! Application configuration module
//!
//! Typed configuration loaded from environment variables using the `config`
//! and `dotenvy` crates. Variables use the `GROW_JOURNAL` prefix and nested
//! values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use grow_journal::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Journal stored in {}", config.store.data_dir.display());
//! ```

mod error;
mod store;
mod telemetry;
mod user;

pub use error::{ConfigError, ValidationError};
pub use store::{StoreConfig, MAX_CHANNEL_CAPACITY};
pub use telemetry::{LogFormat, TelemetryConfig};
pub use user::UserConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Document store location and snapshot buffering
    #[serde(default)]
    pub store: StoreConfig,

    /// Log filter and output format
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Account the journal belongs to
    pub user: UserConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present
    /// 2. Reads environment variables with `GROW_JOURNAL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `GROW_JOURNAL__STORE__DATA_DIR=/var/lib/grow` -> `store.data_dir`
    /// - `GROW_JOURNAL__USER__USER_ID=abc` -> `user.user_id`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `user.user_id` is missing or a value cannot
    /// be parsed into its expected type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GROW_JOURNAL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.store.validate()?;
        self.telemetry.validate()?;
        self.user.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("GROW_JOURNAL__USER__USER_ID", "grower-1");
    }

    fn clear_env() {
        env::remove_var("GROW_JOURNAL__USER__USER_ID");
        env::remove_var("GROW_JOURNAL__STORE__DATA_DIR");
        env::remove_var("GROW_JOURNAL__STORE__SNAPSHOT_CHANNEL_CAPACITY");
        env::remove_var("GROW_JOURNAL__TELEMETRY__LOG_FORMAT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.user.user_id, "grower-1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.store.data_dir, PathBuf::from("./data"));
        assert_eq!(config.store.snapshot_channel_capacity, 64);
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("GROW_JOURNAL__STORE__DATA_DIR", "/tmp/grow");
        env::set_var("GROW_JOURNAL__STORE__SNAPSHOT_CHANNEL_CAPACITY", "8");
        env::set_var("GROW_JOURNAL__TELEMETRY__LOG_FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.store.data_dir, PathBuf::from("/tmp/grow"));
        assert_eq!(config.store.snapshot_channel_capacity, 8);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_user_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
