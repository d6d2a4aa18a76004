//! Secret store trait defining access to issued OTP records.
//!
//! The store is external (a hosted table or a SQL database); the verification
//! service only reads records, inserts new ones and flips `consumed`.

use async_trait::async_trait;

use crate::domain::entities::otp_record::{NewOtpRecord, OtpRecord};
use crate::errors::DomainResult;

/// Repository trait for OTP record persistence operations
///
/// Implementations report connectivity problems as `DomainError::Transient`.
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use ov_core::domain::entities::{NewOtpRecord, OtpRecord};
/// use ov_core::errors::DomainResult;
/// use ov_core::repositories::SecretStore;
///
/// struct TableSecretStore {
///     // HTTP client or connection pool
/// }
///
/// #[async_trait]
/// impl SecretStore for TableSecretStore {
///     async fn find_unconsumed(&self, email: &str, limit: usize) -> DomainResult<Vec<OtpRecord>> {
///         Ok(Vec::new())
///     }
///
///     async fn mark_consumed_if_unconsumed(&self, id: &str) -> DomainResult<bool> {
///         Ok(false)
///     }
///
///     async fn insert(&self, record: NewOtpRecord) -> DomainResult<OtpRecord> {
///         Ok(record.into_record("generated-id"))
///     }
/// }
/// ```
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Find records for `email` whose `consumed` flag is false or absent
    ///
    /// # Arguments
    /// * `email` - Normalized email; matching must be case-insensitive
    /// * `limit` - Maximum number of records to return
    ///
    /// # Returns
    /// Records ordered by `issued_at`, newest first. Expired records are
    /// included; callers decide what expiry means for them.
    async fn find_unconsumed(&self, email: &str, limit: usize) -> DomainResult<Vec<OtpRecord>>;

    /// Mark a record consumed, but only if it is still unconsumed
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the transition
    /// * `Ok(false)` - The record was already consumed (or no longer exists)
    async fn mark_consumed_if_unconsumed(&self, id: &str) -> DomainResult<bool>;

    /// Insert a freshly issued record
    async fn insert(&self, record: NewOtpRecord) -> DomainResult<OtpRecord>;
}
