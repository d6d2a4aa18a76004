//! Identity store trait defining the account operations verification needs.

use async_trait::async_trait;

use crate::domain::entities::identity_account::IdentityAccount;
use crate::errors::DomainResult;

/// Repository trait for user accounts held by the external identity provider
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find the account registered under `email`
    ///
    /// # Arguments
    /// * `email` - Normalized email; matching must be case-insensitive
    ///
    /// # Returns
    /// * `Ok(Some(IdentityAccount))` - Account found
    /// * `Ok(None)` - No account uses this email
    /// * `Err(DomainError)` - Store unreachable or returned garbage
    async fn find_account_by_email(&self, email: &str) -> DomainResult<Option<IdentityAccount>>;

    /// Set `email_confirmed = true` on the account
    ///
    /// Must be idempotent: confirming an already-confirmed account succeeds.
    async fn set_email_confirmed(&self, account_id: &str) -> DomainResult<()>;
}
