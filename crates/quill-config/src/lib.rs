//! # quill-config
//!
//! Layered configuration loading for Quill using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`QUILL_*` prefix, `__` as separator)
//! 2. Project-level `.quill/config.toml`
//! 3. User-level `~/.config/quill/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `QUILL_DATABASE__PATH` -> `database.path`,
//! `QUILL_WRITER__QUEUE_CAPACITY` -> `writer.queue_capacity`, etc.
//!
//! ```no_run
//! use quill_config::QuillConfig;
//!
//! let config = QuillConfig::load_with_dotenv().expect("config");
//! println!("audit log at {}", config.database.path);
//! ```

mod database;
mod error;
mod general;
mod writer;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use writer::WriterConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QuillConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub writer: WriterConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl QuillConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`load_with_dotenv`](Self::load_with_dotenv)
    /// for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the current directory, then [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction or validation fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".quill/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("QUILL_").split("__"))
    }

    /// Reject values the service cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(invalid("database.path", "must not be empty"));
        }
        if self.writer.queue_capacity == 0 {
            return Err(invalid("writer.queue_capacity", "must be greater than 0"));
        }
        if self.general.default_limit == 0 {
            return Err(invalid("general.default_limit", "must be greater than 0"));
        }
        if self.general.export_limit == 0 {
            return Err(invalid("general.export_limit", "must be greater than 0"));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("quill").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
