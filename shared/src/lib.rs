//! Shared utilities and common types for the OTP verification server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The JSON error body returned by every failing endpoint
//! - Email normalization and masking helpers

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, BackendConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    LoggingConfig, SecretStoreKind, ServerConfig, VerificationConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::email::{mask_email, normalize_email};
