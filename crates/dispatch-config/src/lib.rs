//! # dispatch-config
//!
//! Layered configuration loading for the dispatch assignment engine using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DISPATCH_*` prefix, `__` as separator)
//! 2. Project-level `.dispatch/config.toml`
//! 3. User-level `~/.config/dispatch/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DISPATCH_DATABASE__PATH` -> `database.path`,
//! `DISPATCH_ENGINE__MAX_ATTEMPTS` -> `engine.max_attempts`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use dispatch_config::DispatchConfig;
//!
//! let config = DispatchConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind);
//! ```

mod database;
mod engine;
mod error;
mod server;

pub use database::DatabaseConfig;
pub use engine::EngineConfig;
pub use error::ConfigError;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl DispatchConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".dispatch/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("DISPATCH_").split("__"))
    }

    /// Reject values that would make the engine unusable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.engine.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.engine.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.request_timeout_ms".into(),
                reason: "must be positive".into(),
            });
        }
        if self.engine.base_delay_ms > self.engine.max_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "engine.base_delay_ms".into(),
                reason: format!(
                    "{} exceeds engine.max_delay_ms ({})",
                    self.engine.base_delay_ms, self.engine.max_delay_ms
                ),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dispatch").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DispatchConfig::default();
        config.validate().unwrap();
        assert_eq!(config.engine.max_attempts, 4);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = DispatchConfig::figment();
        let config: DispatchConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.engine.request_timeout_ms, 5000);
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let mut config = DispatchConfig::default();
        config.engine.max_attempts = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "engine.max_attempts"));
    }
}
