//! REST implementation of the IdentityStore trait over the admin users API.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use ov_core::domain::entities::identity_account::IdentityAccount;
use ov_core::errors::{DomainError, DomainResult};
use ov_core::repositories::IdentityStore;
use ov_shared::normalize_email;

use super::client::BackendClient;
use crate::InfrastructureError;

/// Users requested per page when scanning for an email
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Upper bound on pages scanned by a single lookup
const MAX_PAGES: usize = 1000;

/// Identity store backed by the hosted backend's admin API
#[derive(Debug, Clone)]
pub struct RestIdentityStore {
    client: BackendClient,
    page_size: usize,
}

impl RestIdentityStore {
    /// Create a new REST identity store
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the page size used when listing users
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[derive(Debug, Deserialize)]
struct UsersPage {
    #[serde(default)]
    users: Vec<AdminUser>,
}

#[derive(Debug, Deserialize)]
struct AdminUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_confirmed_at: Option<String>,
}

impl AdminUser {
    fn into_account(self) -> IdentityAccount {
        IdentityAccount {
            id: self.id,
            email: self.email.unwrap_or_default(),
            email_confirmed: self.email_confirmed_at.is_some(),
        }
    }
}

#[async_trait]
impl IdentityStore for RestIdentityStore {
    async fn find_account_by_email(&self, email: &str) -> DomainResult<Option<IdentityAccount>> {
        let key = normalize_email(email);

        for page in 1..=MAX_PAGES {
            let request = self
                .client
                .request(Method::GET, "/auth/v1/admin/users")
                .query(&[("page", page), ("per_page", self.page_size)]);
            let listing: UsersPage = self.client.send_json(request).await?;
            let returned = listing.users.len();

            let found = listing.users.into_iter().find(|user| {
                user.email
                    .as_deref()
                    .map(|e| normalize_email(e) == key)
                    .unwrap_or(false)
            });
            if let Some(user) = found {
                tracing::debug!(account_id = %user.id, page, "Found account for email");
                return Ok(Some(user.into_account()));
            }

            if returned < self.page_size {
                return Ok(None);
            }
        }

        tracing::warn!(max_pages = MAX_PAGES, "Stopped scanning user pages without a match");
        Ok(None)
    }

    async fn set_email_confirmed(&self, account_id: &str) -> DomainResult<()> {
        let request = self
            .client
            .request(Method::PUT, &format!("/auth/v1/admin/users/{}", account_id))
            .json(&serde_json::json!({ "email_confirm": true }));
        match self.client.send(request).await {
            Ok(()) => {}
            Err(InfrastructureError::Status { status: 404, .. }) => {
                return Err(DomainError::AccountNotFound)
            }
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(account_id = %account_id, "Set email confirmed");
        Ok(())
    }
}
