//! OTP record entity, as held by the secret store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A hashed, time-limited one-time code issued for an email address
///
/// Lifecycle: Issued -> (Consumed | Expired). `Consumed` is terminal and only
/// reached through a successful verification; `Expired` is detected at read
/// time and never swept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Opaque identifier assigned by the store
    pub id: String,

    /// Email the code was sent to; compared case-insensitively
    pub owner_email: String,

    /// bcrypt hash of the delivered code
    pub secret_hash: String,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp after which the code can no longer be verified
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been redeemed; absent means not yet
    #[serde(default)]
    pub consumed: Option<bool>,
}

impl OtpRecord {
    /// Absent is treated as not consumed
    pub fn is_consumed(&self) -> bool {
        self.consumed.unwrap_or(false)
    }

    /// A record stays valid only while `expires_at` is strictly in the future
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Neither consumed nor expired at `now`
    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_consumed() && !self.is_expired_at(now)
    }
}

/// Fields supplied when issuing a record; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOtpRecord {
    /// Normalized owner email
    pub owner_email: String,
    /// bcrypt hash of the code
    pub secret_hash: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewOtpRecord {
    /// Materialize the record with a store-assigned id
    pub fn into_record(self, id: impl Into<String>) -> OtpRecord {
        OtpRecord {
            id: id.into(),
            owner_email: self.owner_email,
            secret_hash: self.secret_hash,
            issued_at: self.issued_at,
            expires_at: self.expires_at,
            consumed: Some(false),
        }
    }
}
