//! Authenticated HTTP client for the hosted backend

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use ov_shared::config::BackendConfig;

use crate::InfrastructureError;

/// HTTP client carrying the service credentials on every request
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client from the backend configuration
    ///
    /// # Errors
    /// * `InfrastructureError::Config` - The service key is not a valid header value
    /// * `InfrastructureError::Http` - The TLS backend could not be initialized
    pub fn new(config: &BackendConfig) -> Result<Self, InfrastructureError> {
        let mut apikey = HeaderValue::from_str(&config.service_key)
            .map_err(|_| InfrastructureError::Config("service key is not a valid header value".to_string()))?;
        apikey.set_sensitive(true);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key))
            .map_err(|_| InfrastructureError::Config("service key is not a valid header value".to_string()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("apikey"), apikey);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        tracing::info!(
            backend_url = %config.url,
            timeout_secs = config.request_timeout_secs,
            "Backend client initialized"
        );

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request against a path relative to the base URL
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send a request and decode a JSON response body
    ///
    /// Non-2xx statuses become `InfrastructureError::Status` with the response body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, InfrastructureError> {
        let response = Self::check_status(request.send().await?).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| InfrastructureError::Decode(e.to_string()))
    }

    /// Send a request and discard the response body
    pub async fn send(&self, request: RequestBuilder) -> Result<(), InfrastructureError> {
        Self::check_status(request.send().await?).await?;
        Ok(())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, InfrastructureError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Backend request failed");
        Err(InfrastructureError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
