//! In-memory implementation of IdentityStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use ov_shared::normalize_email;

use crate::domain::entities::identity_account::IdentityAccount;
use crate::errors::{DomainError, DomainResult};

use super::trait_::IdentityStore;

/// Mock identity store keyed by account id
#[derive(Clone, Default)]
pub struct MockIdentityStore {
    accounts: Arc<RwLock<HashMap<String, IdentityAccount>>>,
    unavailable: Arc<AtomicBool>,
    fail_confirmation: Arc<AtomicBool>,
    confirm_calls: Arc<AtomicUsize>,
}

impl MockIdentityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an unconfirmed account and return it
    pub async fn add_account(&self, email: &str) -> IdentityAccount {
        let account = IdentityAccount {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            email_confirmed: false,
        };
        self.accounts
            .write()
            .await
            .insert(account.id.clone(), account.clone());
        account
    }

    /// Look up an account by id
    pub async fn get(&self, id: &str) -> Option<IdentityAccount> {
        self.accounts.read().await.get(id).cloned()
    }

    /// Number of `set_email_confirmed` calls received
    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail with `DomainError::Transient`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make only `set_email_confirmed` fail
    pub fn set_fail_confirmation(&self, fail: bool) {
        self.fail_confirmation.store(fail, Ordering::SeqCst);
    }

    fn check_available(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::transient("identity store unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for MockIdentityStore {
    async fn find_account_by_email(&self, email: &str) -> DomainResult<Option<IdentityAccount>> {
        self.check_available()?;
        let key = normalize_email(email);
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| normalize_email(&a.email) == key)
            .cloned())
    }

    async fn set_email_confirmed(&self, account_id: &str) -> DomainResult<()> {
        self.check_available()?;
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_confirmation.load(Ordering::SeqCst) {
            return Err(DomainError::transient("identity store rejected the update"));
        }

        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(account_id) {
            Some(account) => {
                account.email_confirmed = true;
                Ok(())
            }
            None => Err(DomainError::AccountNotFound),
        }
    }
}
