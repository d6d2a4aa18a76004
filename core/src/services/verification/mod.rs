//! Verification service module for email one-time codes
//!
//! This module provides the OTP workflow:
//! - Code issuance (generation, bcrypt hashing, storage)
//! - Verification against the newest outstanding record
//! - Single-use consumption through a conditional store update
//! - Confirming the owning account in the identity store

mod hashing;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use ov_shared::config::VerificationConfig as VerificationServiceConfig;
pub use service::VerificationService;
pub use traits::{Clock, FixedClock, SystemClock};
pub use types::{IssuedCode, VerificationOutcome};
