//! # OTP Verification Core
//!
//! Domain layer for single-use email confirmation codes. This crate contains
//! the record and account entities, the store interfaces the verification
//! protocol runs against, in-memory store implementations, the error taxonomy
//! and the verification service itself.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
