//! Server configuration module

use serde::{Deserialize, Serialize};

use super::environment::Environment;
use super::ConfigError;

/// Port used when neither `PORT` nor `SERVER_PORT` holds a valid number
pub const DEFAULT_PORT: u16 = 5000;

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Maximum JSON payload size in bytes
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: DEFAULT_PORT,
            workers: 0, // Use all CPU cores
            max_payload_size: default_max_payload_size(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Build from environment variables through a lookup
    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = vars("PORT")
            .or_else(|| vars("SERVER_PORT"))
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            host: vars("SERVER_HOST").unwrap_or(defaults.host),
            port,
            workers: vars("SERVER_WORKERS")
                .and_then(|w| w.parse().ok())
                .unwrap_or(defaults.workers),
            max_payload_size: defaults.max_payload_size,
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
///
/// Methods are not configurable: the front-end only ever needs
/// `GET, POST, PUT, DELETE, OPTIONS`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Allow credentials
    #[serde(default = "default_allow_credentials")]
    pub allow_credentials: bool,

    /// Max age for preflight cache in seconds
    #[serde(default = "default_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            allow_credentials: default_allow_credentials(),
            max_age: default_max_age(),
        }
    }
}

impl CorsConfig {
    /// Local front-end dev servers
    pub fn development() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            ..Default::default()
        }
    }

    /// Build from `ALLOWED_ORIGINS` (comma separated) and `CORS_MAX_AGE`
    ///
    /// Each origin must be `http(s)://host[:port]`; a wildcard is rejected
    /// since credentials are always allowed.
    pub fn from_vars(
        vars: &dyn Fn(&str) -> Option<String>,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let base = if environment.is_production() {
            Self::default()
        } else {
            Self::development()
        };

        let configured: Vec<String> = vars("ALLOWED_ORIGINS")
            .map(|list| {
                list.split(',')
                    .map(|origin| origin.trim().trim_end_matches('/').to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if let Some(bad) = configured.iter().find(|origin| !is_valid_origin(origin)) {
            return Err(ConfigError::Invalid {
                key: "ALLOWED_ORIGINS",
                reason: format!("{:?} is not an http(s) origin", bad),
            });
        }

        Ok(Self {
            allowed_origins: if configured.is_empty() {
                base.allowed_origins
            } else {
                configured
            },
            max_age: vars("CORS_MAX_AGE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.max_age),
            ..base
        })
    }
}

/// `scheme://host[:port]` with no path, query or credentials
fn is_valid_origin(origin: &str) -> bool {
    let authority = match origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
    {
        Some(authority) => authority,
        None => return false,
    };

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    let port_ok = port.map_or(true, |p| p.parse::<u16>().is_ok());

    host_ok && port_ok
}

fn default_max_payload_size() -> usize {
    16 * 1024 // 16 KB, the verify body is two short strings
}

fn default_allow_credentials() -> bool {
    true
}

fn default_max_age() -> usize {
    3600
}
