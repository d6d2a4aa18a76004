//! OTP route handlers
//!
//! This module contains the email confirmation endpoint and the state it
//! shares across workers.

use std::sync::Arc;

use ov_core::repositories::{IdentityStore, SecretStore};
use ov_core::services::verification::VerificationService;

pub mod verify_otp;

pub use verify_otp::verify_otp;

/// Application state that holds shared services
pub struct AppState<S, I>
where
    S: SecretStore,
    I: IdentityStore,
{
    pub verification_service: Arc<VerificationService<S, I>>,
}

impl<S, I> AppState<S, I>
where
    S: SecretStore,
    I: IdentityStore,
{
    pub fn new(verification_service: VerificationService<S, I>) -> Self {
        Self {
            verification_service: Arc::new(verification_service),
        }
    }
}
