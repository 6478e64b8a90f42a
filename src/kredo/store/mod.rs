//! Credential store adapter.
//!
//! The store is an external collaborator keyed by username; the service
//! only needs a point lookup and an insert. Uniqueness of `username` is
//! enforced here (constraint in Postgres, lock in the memory store), so a
//! duplicate insert is reported as its own error instead of racing the
//! caller's existence check.

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryUserStore;
pub use self::postgres::{valid_identifier, PgUserStore};

use async_trait::async_trait;
use thiserror::Error;

/// A stored user record.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

/// A record to be inserted, hash already computed.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The uniqueness constraint on `username` rejected the insert.
    #[error("user already exists")]
    Duplicate,

    /// The store could not be reached or the operation failed.
    #[error("credential store unavailable")]
    Unavailable(#[source] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Point lookup by username. Absence is a normal outcome, not a fault.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a new record and return the store-assigned id.
    async fn insert(&self, user: NewUser) -> Result<String, StoreError>;
}
