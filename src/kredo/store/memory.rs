//! In-memory credential store.
//!
//! Backs tests and local development. The map mutex makes the
//! check-and-insert atomic, giving the same exactly-one-wins guarantee as
//! the unique constraint in Postgres.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::{NewUser, StoreError, UserRecord, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self
            .users
            .lock()
            .map_err(|_| StoreError::Unavailable(anyhow::anyhow!("store lock poisoned")))?;

        Ok(users.get(username).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<String, StoreError> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| StoreError::Unavailable(anyhow::anyhow!("store lock poisoned")))?;

        if users.contains_key(&user.username) {
            return Err(StoreError::Duplicate);
        }

        let id = Uuid::new_v4().to_string();
        users.insert(
            user.username.clone(),
            UserRecord {
                id: id.clone(),
                username: user.username,
                password_hash: user.password_hash,
            },
        );

        Ok(id)
    }
}
