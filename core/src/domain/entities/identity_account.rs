//! Identity account entity, as held by the identity store.

use serde::{Deserialize, Serialize};

/// A user account whose email confirmation this service flips
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityAccount {
    /// Opaque identifier assigned by the identity store
    pub id: String,
    /// Account email, matched case-insensitively against `OtpRecord::owner_email`
    pub email: String,
    /// Whether the email address has been confirmed
    pub email_confirmed: bool,
}
