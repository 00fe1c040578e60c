//! # tracker-config
//!
//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TRACKER_*` prefix, `__` as separator)
//! 2. Deployment variables `DATABASE_URL`, `ADMIN_USERNAME`, `ADMIN_EMAIL`, `ADMIN_PASSWORD`
//! 3. `tracker.toml` in the working directory, or an explicit path
//! 4. Built-in defaults
//!
//! Figment maps `TRACKER_SERVER__PORT` -> `server.port` and
//! `TRACKER_POMODORO__WORK_MINUTES` -> `pomodoro.work_minutes`.

mod admin;
mod database;
mod error;
mod general;
mod pomodoro;
mod server;

pub use admin::AdminConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use pomodoro::PomodoroConfig;
pub use server::ServerConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tracker.toml";

const LEGACY_VARS: [&str; 4] = ["DATABASE_URL", "ADMIN_USERNAME", "ADMIN_EMAIL", "ADMIN_PASSWORD"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TrackerConfig {
    /// Load and validate configuration from every source.
    ///
    /// `path` replaces the default `tracker.toml`; a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a source cannot be parsed or a value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(
                Env::raw()
                    .only(&LEGACY_VARS)
                    .map(|key| key.as_str().replacen('_', ".", 1).into()),
            )
            .merge(Env::prefixed("TRACKER_").split("__"))
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be > 0"));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::invalid("database.url", "must not be empty"));
        }
        if self.admin.username.trim().is_empty() {
            return Err(ConfigError::invalid("admin.username", "must not be empty"));
        }
        if self.admin.password.len() < 6 {
            return Err(ConfigError::invalid(
                "admin.password",
                "must be at least 6 characters",
            ));
        }
        if self.general.users_per_page == 0 {
            return Err(ConfigError::invalid("general.users_per_page", "must be > 0"));
        }
        self.pomodoro.settings()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = TrackerConfig::default();
        config.validate().expect("defaults are valid");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.url, "sqlite://tracker.sqlite3");
        assert_eq!(config.general.users_per_page, 20);
        assert!(config.admin.uses_default_password());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = TrackerConfig::default();
        config.general.users_per_page = 0;
        let err = config.validate().expect_err("invalid");
        assert!(err.to_string().contains("general.users_per_page"));
    }
}
