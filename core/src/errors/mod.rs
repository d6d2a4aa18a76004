//! Domain error taxonomy for the verification protocol.
//!
//! `NotFound`, `Expired` and `InvalidCode` are expected outcomes of a
//! verification attempt, not faults. `Transient` covers store and network
//! failures; the whole operation is safe to retry from the caller.

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing or empty field: {field}")]
    BadRequest { field: &'static str },

    #[error("No outstanding verification code for this email")]
    NotFound,

    #[error("Verification code has expired")]
    Expired,

    #[error("Invalid verification code")]
    InvalidCode,

    #[error("Verification code was already redeemed by another request")]
    AlreadyConsumed,

    #[error("No account exists for this email")]
    AccountNotFound,

    #[error("Store unavailable: {message}")]
    Transient { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Build a transient store failure
    pub fn transient(message: impl Into<String>) -> Self {
        DomainError::Transient {
            message: message.into(),
        }
    }

    /// Build an internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying the whole operation unchanged could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Transient { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
