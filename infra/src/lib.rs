//! # Infrastructure Layer
//!
//! Concrete implementations of the OTP store interfaces defined in `ov_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Backend**: REST adapters for the hosted backend (OTP table and admin identity API)
//! - **Database**: MySQL implementation of the secret store using SQLx
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL secret store (default)

use ov_core::errors::DomainError;

/// Backend module - REST adapters for the hosted backend
pub mod backend;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

pub use backend::{BackendClient, RestIdentityStore, RestSecretStore};
#[cfg(feature = "mysql")]
pub use database::{create_pool, MySqlSecretStore};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Transport error or timeout talking to the backend
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend answered with a payload we cannot interpret
    #[error("Unexpected backend payload: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Decode(_) | InfrastructureError::Config(_) => {
                DomainError::internal(error.to_string())
            }
            _ => DomainError::transient(error.to_string()),
        }
    }
}
