//! OTP issuance and verification settings

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Matches `bcrypt::DEFAULT_COST`
pub const DEFAULT_HASH_COST: u32 = 12;

/// Upper bound for `superseded_scan_limit`
pub const MAX_SUPERSEDED_SCAN_LIMIT: usize = 10;

/// Settings shared by code issuance and verification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of digits in an issued code
    pub code_length: usize,

    /// Minutes an issued code stays eligible
    pub code_ttl_minutes: i64,

    /// bcrypt cost used when hashing issued codes
    pub hash_cost: u32,

    /// Older unconsumed records inspected when classifying a mismatch
    ///
    /// A wrong code costs one bcrypt verify for the newest record plus up to
    /// this many more, each at `hash_cost`. Nothing rate-limits attempts, so
    /// keep it small; 0 turns the scan off.
    pub superseded_scan_limit: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            code_ttl_minutes: 10,
            hash_cost: DEFAULT_HASH_COST,
            superseded_scan_limit: 3,
        }
    }
}

impl VerificationConfig {
    /// Build from `OTP_CODE_LENGTH`, `OTP_TTL_MINUTES`, `OTP_HASH_COST`, `OTP_SUPERSEDED_SCAN_LIMIT`
    pub fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            code_length: parse_or(vars, "OTP_CODE_LENGTH", defaults.code_length)?,
            code_ttl_minutes: parse_or(vars, "OTP_TTL_MINUTES", defaults.code_ttl_minutes)?,
            hash_cost: parse_or(vars, "OTP_HASH_COST", defaults.hash_cost)?,
            superseded_scan_limit: parse_or(
                vars,
                "OTP_SUPERSEDED_SCAN_LIMIT",
                defaults.superseded_scan_limit,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the issuer cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=12).contains(&self.code_length) {
            return Err(ConfigError::Invalid {
                key: "OTP_CODE_LENGTH",
                reason: "must be between 4 and 12".to_string(),
            });
        }
        if self.code_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "OTP_TTL_MINUTES",
                reason: "must be positive".to_string(),
            });
        }
        if !(4..=31).contains(&self.hash_cost) {
            return Err(ConfigError::Invalid {
                key: "OTP_HASH_COST",
                reason: "must be between 4 and 31".to_string(),
            });
        }
        if self.superseded_scan_limit > MAX_SUPERSEDED_SCAN_LIMIT {
            return Err(ConfigError::Invalid {
                key: "OTP_SUPERSEDED_SCAN_LIMIT",
                reason: format!("must be at most {}", MAX_SUPERSEDED_SCAN_LIMIT),
            });
        }
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(
    vars: &dyn Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match vars(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            reason: format!("cannot parse {:?}", raw),
        }),
    }
}
