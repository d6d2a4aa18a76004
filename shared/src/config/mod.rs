//! Configuration module with sub-modules per concern
//!
//! - `backend` - hosted backend URL, service credential and OTP table
//! - `database` - MySQL pool settings for the SQL secret store
//! - `environment` - environment detection and logging configuration
//! - `server` - HTTP listener and CORS configuration
//! - `verification` - code length, lifetime and hashing cost

pub mod backend;
pub mod database;
pub mod environment;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use backend::BackendConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};
pub use verification::VerificationConfig;

/// Configuration loading failures, reported at start-up
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Which implementation backs the secret (OTP record) store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretStoreKind {
    /// Hosted backend REST interface
    #[default]
    Rest,
    /// MySQL table via sqlx
    Mysql,
    /// In-process store, development only
    Memory,
}

impl std::str::FromStr for SecretStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rest" | "backend" => Ok(SecretStoreKind::Rest),
            "mysql" => Ok(SecretStoreKind::Mysql),
            "memory" => Ok(SecretStoreKind::Memory),
            other => Err(format!("unknown secret store: {}", other)),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Hosted backend configuration
    pub backend: BackendConfig,

    /// Secret store selection
    pub secret_store: SecretStoreKind,

    /// Present only when `secret_store` is `mysql`
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Verification settings
    pub verification: VerificationConfig,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(&|key| std::env::var(key).ok())
    }

    /// Assemble the configuration through a variable lookup
    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = Environment::from_vars(vars);

        let secret_store = match vars("SECRET_STORE") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                key: "SECRET_STORE",
                reason,
            })?,
            None => SecretStoreKind::default(),
        };
        if secret_store == SecretStoreKind::Memory && environment.is_production() {
            return Err(ConfigError::Invalid {
                key: "SECRET_STORE",
                reason: "the in-memory store is not allowed in production".to_string(),
            });
        }

        let database = match secret_store {
            SecretStoreKind::Mysql => Some(DatabaseConfig::from_vars(vars)?),
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig::from_vars(vars),
            backend: BackendConfig::from_vars(vars)?,
            secret_store,
            database,
            verification: VerificationConfig::from_vars(vars)?,
            cors: CorsConfig::from_vars(vars, environment)?,
            logging: LoggingConfig::for_environment(environment),
        })
    }
}
