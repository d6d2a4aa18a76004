//! MySQL implementation of the SecretStore trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ov_core::domain::entities::otp_record::{NewOtpRecord, OtpRecord};
use ov_core::errors::{DomainError, DomainResult};
use ov_core::repositories::SecretStore;
use ov_shared::normalize_email;

use crate::InfrastructureError;

/// MySQL implementation of SecretStore over the `otp_codes` table
pub struct MySqlSecretStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSecretStore {
    /// Create a new MySQL secret store
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to OtpRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> DomainResult<OtpRecord> {
        let column = |name: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", name, e),
        };

        Ok(OtpRecord {
            id: row.try_get("id").map_err(|e| column("id", e))?,
            owner_email: row.try_get("email").map_err(|e| column("email", e))?,
            secret_hash: row.try_get("otp_hash").map_err(|e| column("otp_hash", e))?,
            issued_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column("created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column("expires_at", e))?,
            consumed: row
                .try_get::<Option<bool>, _>("consumed")
                .map_err(|e| column("consumed", e))?,
        })
    }
}

#[async_trait]
impl SecretStore for MySqlSecretStore {
    async fn find_unconsumed(&self, email: &str, limit: usize) -> DomainResult<Vec<OtpRecord>> {
        let query = r#"
            SELECT id, email, otp_hash, created_at, expires_at, consumed
            FROM otp_codes
            WHERE LOWER(email) = ? AND (consumed IS NULL OR consumed = FALSE)
            ORDER BY created_at DESC
            LIMIT ?
        "#;

        let rows = sqlx::query(query)
            .bind(normalize_email(email))
            .bind(limit as u64)
            .fetch_all(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn mark_consumed_if_unconsumed(&self, id: &str) -> DomainResult<bool> {
        let query = r#"
            UPDATE otp_codes
            SET consumed = TRUE
            WHERE id = ? AND (consumed IS NULL OR consumed = FALSE)
        "#;

        let result = sqlx::query(query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert(&self, record: NewOtpRecord) -> DomainResult<OtpRecord> {
        let record = record.into_record(Uuid::new_v4().to_string());

        let query = r#"
            INSERT INTO otp_codes (
                id, email, otp_hash, created_at, expires_at, consumed
            ) VALUES (?, ?, ?, ?, ?, FALSE)
        "#;

        sqlx::query(query)
            .bind(&record.id)
            .bind(&record.owner_email)
            .bind(&record.secret_hash)
            .bind(record.issued_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(otp_id = %record.id, error = %e, "Failed to insert OTP record");
                InfrastructureError::from(e)
            })?;

        Ok(record)
    }
}
