//! Code generation and bcrypt hashing
//!
//! Hashing and verification run on the blocking pool.

use rand::{rngs::OsRng, Rng};

use crate::errors::{DomainError, DomainResult};

/// Generate a numeric code of `length` digits from the OS CSPRNG
pub(crate) fn generate_code(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Hash a plaintext code
pub(crate) async fn hash_code(code: String, cost: u32) -> DomainResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(code, cost))
        .await
        .map_err(|e| DomainError::internal(format!("hashing task failed: {}", e)))?
        .map_err(|e| DomainError::internal(format!("failed to hash code: {}", e)))
}

/// Check a plaintext code against a stored bcrypt hash
///
/// A hash that cannot be parsed is an internal error, never a mismatch.
pub(crate) async fn verify_code(code: String, hash: String) -> DomainResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(code, &hash))
        .await
        .map_err(|e| DomainError::internal(format!("verification task failed: {}", e)))?
        .map_err(|e| DomainError::internal(format!("stored hash is unusable: {}", e)))
}
