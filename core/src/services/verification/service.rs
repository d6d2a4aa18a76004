//! Main verification service implementation

use chrono::Duration;
use std::sync::Arc;

use ov_shared::{mask_email, normalize_email};

use crate::domain::entities::otp_record::{NewOtpRecord, OtpRecord};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{IdentityStore, SecretStore};

use super::hashing;
use super::traits::{Clock, SystemClock};
use super::types::{IssuedCode, VerificationOutcome};
use super::VerificationServiceConfig;

/// Verification service for email one-time codes
///
/// Holds no state between requests; everything lives in the two stores.
pub struct VerificationService<S: SecretStore, I: IdentityStore> {
    /// Store holding issued OTP records
    secret_store: Arc<S>,
    /// Store holding user accounts
    identity_store: Arc<I>,
    /// Service configuration
    config: VerificationServiceConfig,
    /// Time source for expiry decisions
    clock: Arc<dyn Clock>,
}

impl<S: SecretStore, I: IdentityStore> VerificationService<S, I> {
    /// Create a new verification service using the system clock
    ///
    /// # Arguments
    ///
    /// * `secret_store` - OTP record store implementation
    /// * `identity_store` - Account store implementation
    /// * `config` - Service configuration
    pub fn new(
        secret_store: Arc<S>,
        identity_store: Arc<I>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            secret_store,
            identity_store,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Verify a submitted code and confirm the owning account
    ///
    /// This method:
    /// 1. Normalizes the email and rejects empty input
    /// 2. Loads the newest unconsumed record for the email
    /// 3. Rejects it if expired
    /// 4. Checks the code against the bcrypt hash (failed attempts do not consume)
    /// 5. Consumes the record with a conditional update
    /// 6. Finds the account and sets its email as confirmed
    ///
    /// # Arguments
    ///
    /// * `email` - Email the code was sent to
    /// * `code` - Plaintext code submitted by the user
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationOutcome)` - The record was consumed and the account confirmed
    /// * `Err(DomainError)` - One of the verification outcomes or a store failure
    pub async fn verify(&self, email: &str, code: &str) -> DomainResult<VerificationOutcome> {
        let email = normalize_email(email);
        let code = code.trim();
        if email.is_empty() {
            return Err(DomainError::BadRequest { field: "email" });
        }
        if code.is_empty() {
            return Err(DomainError::BadRequest { field: "otp" });
        }
        let masked = mask_email(&email);

        let record = self
            .secret_store
            .find_unconsumed(&email, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                tracing::info!(email = %masked, event = "otp_not_found", "No outstanding code for email");
                DomainError::NotFound
            })?;

        let now = self.clock.now();
        if record.is_expired_at(now) {
            tracing::info!(
                email = %masked,
                otp_id = %record.id,
                expired_at = %record.expires_at,
                event = "otp_expired",
                "Newest code for email has expired"
            );
            return Err(DomainError::Expired);
        }

        if !hashing::verify_code(code.to_string(), record.secret_hash.clone()).await? {
            if self.matches_superseded(&email, &record, code).await? {
                tracing::info!(
                    email = %masked,
                    event = "otp_superseded",
                    "Code belongs to an older record that a newer code replaced"
                );
                return Err(DomainError::NotFound);
            }
            tracing::warn!(
                email = %masked,
                otp_id = %record.id,
                event = "otp_invalid_code",
                "Submitted code does not match"
            );
            return Err(DomainError::InvalidCode);
        }

        if !self.secret_store.mark_consumed_if_unconsumed(&record.id).await? {
            tracing::warn!(
                email = %masked,
                otp_id = %record.id,
                event = "otp_already_consumed",
                "Another request redeemed this code first"
            );
            return Err(DomainError::AlreadyConsumed);
        }
        tracing::debug!(otp_id = %record.id, event = "otp_consumed", "Marked code as consumed");

        let account = match self.identity_store.find_account_by_email(&email).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                tracing::error!(
                    email = %masked,
                    otp_id = %record.id,
                    event = "account_not_found_after_consume",
                    "Code was valid but no account exists for the email"
                );
                return Err(DomainError::AccountNotFound);
            }
            Err(e) => return Err(self.confirmation_failed(&masked, &record, e)),
        };

        let was_already_confirmed = account.email_confirmed;
        if let Err(e) = self.identity_store.set_email_confirmed(&account.id).await {
            return Err(self.confirmation_failed(&masked, &record, e));
        }

        tracing::info!(
            email = %masked,
            otp_id = %record.id,
            account_id = %account.id,
            was_already_confirmed,
            event = "otp_verified",
            "Email confirmed"
        );

        Ok(VerificationOutcome {
            otp_id: record.id,
            account_id: account.id,
            was_already_confirmed,
        })
    }

    /// Issue a new code for an email
    ///
    /// Earlier records for the same email are left as they are; only the
    /// newest one can be redeemed.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedCode)` - The stored record plus the plaintext for delivery
    /// * `Err(DomainError)` - Empty email, hashing failure or store failure
    pub async fn issue(&self, email: &str) -> DomainResult<IssuedCode> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(DomainError::BadRequest { field: "email" });
        }

        let code = hashing::generate_code(self.config.code_length);
        let secret_hash = hashing::hash_code(code.clone(), self.config.hash_cost).await?;
        let issued_at = self.clock.now();

        let record = self
            .secret_store
            .insert(NewOtpRecord {
                owner_email: email.clone(),
                secret_hash,
                issued_at,
                expires_at: issued_at + Duration::minutes(self.config.code_ttl_minutes),
            })
            .await
            .map_err(|e| {
                tracing::error!(
                    email = %mask_email(&email),
                    error = %e,
                    event = "otp_storage_failed",
                    "Failed to store issued code"
                );
                e
            })?;

        tracing::info!(
            email = %mask_email(&email),
            otp_id = %record.id,
            expires_at = %record.expires_at,
            event = "otp_issued",
            "Issued verification code"
        );

        Ok(IssuedCode { record, code })
    }

    /// Whether `code` matches one of the older, still-eligible records
    async fn matches_superseded(
        &self,
        email: &str,
        newest: &OtpRecord,
        code: &str,
    ) -> DomainResult<bool> {
        let limit = self.config.superseded_scan_limit;
        if limit == 0 {
            return Ok(false);
        }

        let now = self.clock.now();
        let older = self.secret_store.find_unconsumed(email, limit + 1).await?;
        for record in older
            .into_iter()
            .filter(|r| r.id != newest.id && r.is_eligible_at(now))
            .take(limit)
        {
            if hashing::verify_code(code.to_string(), record.secret_hash).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The record is consumed but the account is not confirmed
    fn confirmation_failed(&self, masked: &str, record: &OtpRecord, error: DomainError) -> DomainError {
        tracing::error!(
            email = %masked,
            otp_id = %record.id,
            error = %error,
            event = "confirmation_failed_after_consume",
            "Code consumed but account confirmation failed; user must request a new code"
        );
        error
    }
}
