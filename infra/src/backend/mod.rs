//! REST adapters for the hosted backend
//!
//! The backend exposes two surfaces the verification protocol needs:
//! - a PostgREST-style table interface under `/rest/v1/{table}` holding OTP records
//! - an admin identity API under `/auth/v1/admin/users` holding user accounts
//!
//! Every call is authenticated with the privileged service key.

pub mod client;
pub mod identity_store;
pub mod secret_store;

#[cfg(test)]
mod tests;

pub use client::BackendClient;
pub use identity_store::RestIdentityStore;
pub use secret_store::RestSecretStore;
