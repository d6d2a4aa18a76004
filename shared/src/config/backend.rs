//! Hosted backend configuration (secret table + admin identity API)

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Connection settings for the hosted backend
#[derive(Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL, e.g. `https://project.backend.example`
    pub url: String,

    /// Privileged service credential; bypasses row-level security
    #[serde(skip_serializing)]
    pub service_key: String,

    /// Table holding issued OTP records
    #[serde(default = "default_otp_table")]
    pub otp_table: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

// The service key must never reach a log line.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .field("otp_table", &self.otp_table)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl BackendConfig {
    /// Create a configuration with default table and timeout
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_key: service_key.into(),
            otp_table: default_otp_table(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// Build from `BACKEND_URL`, `BACKEND_SERVICE_KEY`, `OTP_TABLE`, `BACKEND_TIMEOUT_SECS`
    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = required(vars, "BACKEND_URL")?;
        let service_key = required(vars, "BACKEND_SERVICE_KEY")?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            service_key,
            otp_table: vars("OTP_TABLE")
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(default_otp_table),
            request_timeout_secs: vars("BACKEND_TIMEOUT_SECS")
                .and_then(|t| t.parse().ok())
                .unwrap_or_else(default_request_timeout),
        })
    }
}

fn required(vars: &dyn Fn(&str) -> Option<String>, key: &'static str) -> Result<String, ConfigError> {
    vars(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn default_otp_table() -> String {
    String::from("otps")
}

fn default_request_timeout() -> u64 {
    10
}
