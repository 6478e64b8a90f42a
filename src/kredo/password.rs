//! Password hashing policy.
//!
//! bcrypt with a random per-call salt embedded in the digest string, so
//! verification needs nothing beyond the digest itself. Hashing is
//! intentionally expensive and runs on the blocking thread pool to keep
//! request scheduling unaffected.

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

/// Work factor applied at registration time.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a plaintext password with the given cost.
///
/// # Errors
/// Returns an error if the blocking task is cancelled or bcrypt fails.
pub async fn hash(password: SecretString, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password.expose_secret(), cost))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")
}

/// Verify a plaintext password against a stored digest.
///
/// # Errors
/// Returns an error if the blocking task is cancelled or the digest is
/// not a valid bcrypt string.
pub async fn verify(password: SecretString, digest: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password.expose_secret(), &digest))
        .await
        .context("password verification task failed")?
        .context("failed to verify password")
}
