//! Credential service: registration and authentication policy.

use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::kredo::password;
use crate::kredo::store::{NewUser, StoreError, UserStore};

#[derive(Debug, Error)]
pub enum CredentialError {
    /// Registration attempted for a username already present.
    #[error("user already exists")]
    AlreadyExists,

    /// Unknown username or wrong password. The two cases are deliberately
    /// indistinguishable so login responses cannot be used to enumerate
    /// usernames.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The store could not be reached. Surfaced as a server error and
    /// never retried here.
    #[error("credential store unavailable")]
    StoreUnavailable(#[source] anyhow::Error),

    /// bcrypt failed, either hashing a new password or reading a stored
    /// digest.
    #[error("password hashing failed")]
    Hash(#[source] anyhow::Error),
}

pub struct CredentialService {
    store: Arc<dyn UserStore>,
    cost: u32,
}

impl CredentialService {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            cost: password::HASH_COST,
        }
    }

    /// Override the bcrypt cost. Tests use the minimum cost to stay fast.
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Register a new user and return the store-assigned id.
    ///
    /// The existence lookup is only a fast path; the store's uniqueness
    /// constraint is the authoritative check, so two concurrent
    /// registrations for the same username cannot both succeed.
    ///
    /// # Errors
    /// `AlreadyExists` if the username is taken, `StoreUnavailable` or
    /// `Hash` on infrastructure faults.
    pub async fn register(
        &self,
        username: &str,
        password: SecretString,
    ) -> Result<String, CredentialError> {
        if self.lookup(username).await?.is_some() {
            debug!("username already registered");
            return Err(CredentialError::AlreadyExists);
        }

        let password_hash = password::hash(password, self.cost)
            .await
            .map_err(CredentialError::Hash)?;

        match self
            .store
            .insert(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await
        {
            Ok(user_id) => Ok(user_id),
            // Lost the race between lookup and insert
            Err(StoreError::Duplicate) => Err(CredentialError::AlreadyExists),
            Err(StoreError::Unavailable(err)) => Err(CredentialError::StoreUnavailable(err)),
        }
    }

    /// Verify a username/password pair against the store.
    ///
    /// # Errors
    /// `InvalidCredentials` for an unknown username or a wrong password,
    /// `StoreUnavailable` or `Hash` on infrastructure faults.
    pub async fn authenticate(
        &self,
        username: &str,
        password: SecretString,
    ) -> Result<(), CredentialError> {
        let Some(user) = self.lookup(username).await? else {
            debug!("unknown username");
            return Err(CredentialError::InvalidCredentials);
        };

        let verified = password::verify(password, user.password_hash)
            .await
            .map_err(CredentialError::Hash)?;

        if verified {
            Ok(())
        } else {
            debug!("password mismatch");
            Err(CredentialError::InvalidCredentials)
        }
    }

    async fn lookup(
        &self,
        username: &str,
    ) -> Result<Option<crate::kredo::store::UserRecord>, CredentialError> {
        self.store
            .find_by_username(username)
            .await
            .map_err(|err| match err {
                StoreError::Unavailable(err) => CredentialError::StoreUnavailable(err),
                // find never reports a duplicate; treat it as a store fault
                StoreError::Duplicate => {
                    CredentialError::StoreUnavailable(anyhow::anyhow!("unexpected duplicate"))
                }
            })
    }
}
