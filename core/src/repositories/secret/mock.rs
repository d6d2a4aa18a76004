//! In-memory implementation of SecretStore for testing and local development

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use ov_shared::normalize_email;

use crate::domain::entities::otp_record::{NewOtpRecord, OtpRecord};
use crate::errors::{DomainError, DomainResult};

use super::trait_::SecretStore;

/// Mock secret store backed by a vector of records
#[derive(Clone, Default)]
pub struct MockSecretStore {
    records: Arc<RwLock<Vec<OtpRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockSecretStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: Vec<OtpRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            unavailable: Arc::default(),
        }
    }

    /// Add a record as-is, keeping its id and consumed flag
    pub async fn seed(&self, record: OtpRecord) {
        self.records.write().await.push(record);
    }

    /// Look up a record by id regardless of state
    pub async fn get(&self, id: &str) -> Option<OtpRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Snapshot of every stored record
    pub async fn records(&self) -> Vec<OtpRecord> {
        self.records.read().await.clone()
    }

    /// Make every subsequent call fail with `DomainError::Transient`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::transient("secret store unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SecretStore for MockSecretStore {
    async fn find_unconsumed(&self, email: &str, limit: usize) -> DomainResult<Vec<OtpRecord>> {
        self.check_available()?;
        let key = normalize_email(email);
        let records = self.records.read().await;

        let mut matching: Vec<OtpRecord> = records
            .iter()
            .filter(|r| !r.is_consumed() && normalize_email(&r.owner_email) == key)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn mark_consumed_if_unconsumed(&self, id: &str) -> DomainResult<bool> {
        self.check_available()?;
        let mut records = self.records.write().await;

        match records.iter_mut().find(|r| r.id == id) {
            Some(record) if !record.is_consumed() => {
                record.consumed = Some(true);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert(&self, record: NewOtpRecord) -> DomainResult<OtpRecord> {
        self.check_available()?;
        let record = record.into_record(Uuid::new_v4().to_string());
        self.records.write().await.push(record.clone());
        Ok(record)
    }
}
