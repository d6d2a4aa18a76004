//! Types for verification service results

use crate::domain::entities::otp_record::OtpRecord;

/// Result of a successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// The record that was consumed
    pub otp_id: String,
    /// The account whose email is now confirmed
    pub account_id: String,
    /// The account was already confirmed before this call
    pub was_already_confirmed: bool,
}

/// Result of issuing a code
///
/// Carries the plaintext code for out-of-band delivery; it is never stored.
#[derive(Clone)]
pub struct IssuedCode {
    /// The stored record (hash only)
    pub record: OtpRecord,
    /// Plaintext code to deliver to the user
    pub code: String,
}

impl std::fmt::Debug for IssuedCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedCode")
            .field("record", &self.record.id)
            .field("code", &"<redacted>")
            .finish()
    }
}
