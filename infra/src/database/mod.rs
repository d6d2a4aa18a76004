//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool creation
//! - The MySQL secret store over the `otp_codes` table
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE otp_codes (
//!     id          CHAR(36)     NOT NULL PRIMARY KEY,
//!     email       VARCHAR(320) NOT NULL,
//!     otp_hash    VARCHAR(100) NOT NULL,
//!     created_at  TIMESTAMP(6) NOT NULL,
//!     expires_at  TIMESTAMP(6) NOT NULL,
//!     consumed    BOOLEAN      NULL DEFAULT FALSE,
//!     INDEX idx_otp_codes_email_created (email, created_at)
//! );
//! ```

pub mod connection;
pub mod secret_store;


// Re-export commonly used types
pub use connection::create_pool;
pub use secret_store::MySqlSecretStore;
