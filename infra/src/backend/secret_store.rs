//! REST implementation of the SecretStore trait.
//!
//! Records live in a table on the backend's PostgREST-style interface with
//! columns `id, email, otp_hash, created_at, expires_at, consumed`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Method;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use ov_core::domain::entities::otp_record::{NewOtpRecord, OtpRecord};
use ov_core::errors::DomainResult;
use ov_core::repositories::SecretStore;
use ov_shared::normalize_email;

use super::client::BackendClient;

/// Filter matching rows that have not been redeemed; `consumed` may be NULL
const UNCONSUMED_FILTER: &str = "(consumed.is.null,consumed.eq.false)";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Secret store backed by the hosted backend's table interface
#[derive(Debug, Clone)]
pub struct RestSecretStore {
    client: BackendClient,
    table: String,
}

impl RestSecretStore {
    /// Create a new REST secret store
    ///
    /// # Arguments
    /// * `client` - Authenticated backend client
    /// * `table` - Name of the table holding OTP records
    pub fn new(client: BackendClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    fn path(&self) -> String {
        format!("/rest/v1/{}", self.table)
    }
}

/// Row shape on the wire
#[derive(Debug, Deserialize)]
struct OtpRow {
    #[serde(deserialize_with = "id_as_string")]
    id: String,
    email: String,
    otp_hash: String,
    #[serde(deserialize_with = "timestamp")]
    created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp")]
    expires_at: DateTime<Utc>,
    #[serde(default)]
    consumed: Option<bool>,
}

impl From<OtpRow> for OtpRecord {
    fn from(row: OtpRow) -> Self {
        OtpRecord {
            id: row.id,
            owner_email: row.email,
            secret_hash: row.otp_hash,
            issued_at: row.created_at,
            expires_at: row.expires_at,
            consumed: row.consumed,
        }
    }
}

#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    email: &'a str,
    otp_hash: &'a str,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    consumed: bool,
}

#[derive(Debug, Serialize)]
struct ConsumePatch {
    consumed: bool,
}

/// Ids may be integers or uuids depending on the table definition
fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!("unsupported id value: {}", other))),
    }
}

/// Accepts RFC 3339 and zone-less timestamps; the latter are taken as UTC
fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Build an `ilike` pattern for `value`
///
/// LIKE metacharacters are escaped. PostgREST rewrites every `*` to `%`, even
/// after a backslash, so a `*` goes out as the single-character wildcard `_`.
/// The pattern can then over-match, and callers must compare the returned
/// emails themselves.
pub(crate) fn ilike_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '*' => escaped.push('_'),
            '\\' | '%' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

#[async_trait]
impl SecretStore for RestSecretStore {
    async fn find_unconsumed(&self, email: &str, limit: usize) -> DomainResult<Vec<OtpRecord>> {
        let email = normalize_email(email);
        let mut query = vec![
            ("select", "*".to_string()),
            ("email", format!("ilike.{}", ilike_pattern(&email))),
            ("or", UNCONSUMED_FILTER.to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        // A wildcard may match other addresses; the limit is applied after filtering
        if !email.contains('*') {
            query.push(("limit", limit.to_string()));
        }

        let request = self.client.request(Method::GET, &self.path()).query(&query);
        let rows: Vec<OtpRow> = self.client.send_json(request).await?;

        tracing::debug!(table = %self.table, rows = rows.len(), "Loaded unconsumed OTP records");
        Ok(rows
            .into_iter()
            .filter(|row| normalize_email(&row.email) == email)
            .take(limit)
            .map(OtpRecord::from)
            .collect())
    }

    async fn mark_consumed_if_unconsumed(&self, id: &str) -> DomainResult<bool> {
        let query = [
            ("id", format!("eq.{}", id)),
            ("or", UNCONSUMED_FILTER.to_string()),
        ];

        let request = self
            .client
            .request(Method::PATCH, &self.path())
            .query(&query)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&ConsumePatch { consumed: true });
        let updated: Vec<OtpRow> = self.client.send_json(request).await?;

        // An empty representation means the filter matched nothing: someone got there first
        Ok(!updated.is_empty())
    }

    async fn insert(&self, record: NewOtpRecord) -> DomainResult<OtpRecord> {
        let body = InsertRow {
            email: &record.owner_email,
            otp_hash: &record.secret_hash,
            created_at: record.issued_at,
            expires_at: record.expires_at,
            consumed: false,
        };

        let request = self
            .client
            .request(Method::POST, &self.path())
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&body);
        let rows: Vec<OtpRow> = self.client.send_json(request).await?;

        let row = rows.into_iter().next().ok_or_else(|| {
            crate::InfrastructureError::Decode("insert returned no rows".to_string())
        })?;
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ilike_pattern_metacharacters() {
        assert_eq!(ilike_pattern("alice@example.com"), "alice@example.com");
        assert_eq!(ilike_pattern("a_b@example.com"), "a\\_b@example.com");
        assert_eq!(ilike_pattern("100%@x.io"), "100\\%@x.io");
        assert_eq!(ilike_pattern("a\\c@x.io"), "a\\\\c@x.io");
    }

    #[test]
    fn test_ilike_pattern_never_sends_asterisk() {
        let pattern = ilike_pattern("a*b@example.com");
        assert_eq!(pattern, "a_b@example.com");
        assert!(!pattern.contains('*'));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_timestamp("2024-05-01T12:00:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T14:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 12:00:00.000"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_row_conversion_keeps_absent_consumed() {
        let row: OtpRow = serde_json::from_value(serde_json::json!({
            "id": 42,
            "email": "alice@example.com",
            "otp_hash": "$2b$04$hash",
            "created_at": "2024-05-01T12:00:00+00:00",
            "expires_at": "2024-05-01T12:10:00+00:00"
        }))
        .unwrap();

        let record = OtpRecord::from(row);
        assert_eq!(record.id, "42");
        assert_eq!(record.consumed, None);
        assert!(!record.is_consumed());
    }
}
