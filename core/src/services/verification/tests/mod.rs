
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

use crate::domain::entities::otp_record::OtpRecord;
use crate::repositories::{MockIdentityStore, MockSecretStore};
use crate::services::verification::{FixedClock, VerificationService, VerificationServiceConfig};

/// Lowest bcrypt cost, keeps tests fast
pub(super) const TEST_HASH_COST: u32 = 4;

pub(super) struct Harness {
    pub service: VerificationService<MockSecretStore, MockIdentityStore>,
    pub secrets: Arc<MockSecretStore>,
    pub identities: Arc<MockIdentityStore>,
    pub clock: Arc<FixedClock>,
}

pub(super) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub(super) fn harness() -> Harness {
    let secrets = Arc::new(MockSecretStore::new());
    let identities = Arc::new(MockIdentityStore::new());
    let clock = Arc::new(FixedClock::new(start_time()));
    let config = VerificationServiceConfig {
        hash_cost: TEST_HASH_COST,
        ..Default::default()
    };

    let service = VerificationService::new(secrets.clone(), identities.clone(), config)
        .with_clock(clock.clone());

    Harness {
        service,
        secrets,
        identities,
        clock,
    }
}

/// A record for `code`, issued `issued_minutes_ago` and valid for `ttl_minutes`
pub(super) fn record_for(
    id: &str,
    email: &str,
    code: &str,
    issued_minutes_ago: i64,
    ttl_minutes: i64,
) -> OtpRecord {
    let issued_at = start_time() - Duration::minutes(issued_minutes_ago);
    OtpRecord {
        id: id.to_string(),
        owner_email: email.to_string(),
        secret_hash: bcrypt::hash(code, TEST_HASH_COST).unwrap(),
        issued_at,
        expires_at: issued_at + Duration::minutes(ttl_minutes),
        consumed: None,
    }
}
