//! Service configuration
//!
//! Values are layered: built-in defaults, then an optional
//! `config/account.{toml,yaml,json}` file, then `ACCOUNT_*` environment
//! variables with `__` between nested keys (`ACCOUNT_JWT__SECRET`,
//! `ACCOUNT_STORAGE__BACKEND`, ...). The PostgreSQL connection itself is
//! configured through `common::database::DatabaseConfig::from_env`.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::jwt::JwtConfig;

const ENV_PREFIX: &str = "ACCOUNT";
const CONFIG_FILE: &str = "config/account";

/// Top-level service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_address: String,
}

/// Which [`crate::repositories::UserRepository`] adapter to run with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Upper bound on a single repository call, in seconds
    pub timeout_secs: u64,
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from the optional file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder(Some(CONFIG_FILE))?.build()?.try_deserialize()
    }

    /// Load configuration from the environment only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder(None)?.build()?.try_deserialize()
    }

    fn builder(
        file: Option<&str>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.bind_address", "0.0.0.0:3000")?
            .set_default("storage.backend", "postgres")?
            .set_default("storage.timeout_secs", 5)?
            .set_default(
                "jwt.token_expiry_secs",
                crate::jwt::DEFAULT_TOKEN_EXPIRY_SECS,
            )?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }

        Ok(builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        ))
    }
}
