//! PostgreSQL-backed credential store.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::{NewUser, StoreError, UserRecord, UserStore};

pub struct PgUserStore {
    pool: PgPool,
    select_query: String,
    insert_query: String,
}

impl PgUserStore {
    /// Build a store over the given pool and table.
    ///
    /// The table name is interpolated into the statements, so it must be a
    /// bare SQL identifier (the CLI validates this before we get here).
    ///
    /// # Errors
    /// Returns an error if the table name is not a bare identifier.
    pub fn new(pool: PgPool, users_table: &str) -> Result<Self, StoreError> {
        if !valid_identifier(users_table) {
            return Err(StoreError::Unavailable(anyhow!(
                "invalid users table name: {users_table}"
            )));
        }

        Ok(Self {
            pool,
            select_query: format!(
                "SELECT id, username, password_hash FROM {users_table} WHERE username = $1"
            ),
            insert_query: format!(
                "INSERT INTO {users_table} (username, password_hash) VALUES ($1, $2) RETURNING id"
            ),
        })
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = self.select_query.as_str()
        );
        let row = sqlx::query(&self.select_query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| StoreError::Unavailable(err.into()))?;

        Ok(row.map(|row| UserRecord {
            id: row.get::<Uuid, _>("id").to_string(),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn insert(&self, user: NewUser) -> Result<String, StoreError> {
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = self.insert_query.as_str()
        );
        let row = sqlx::query(&self.insert_query)
            .bind(&user.username)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(row.get::<Uuid, _>("id").to_string()),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Duplicate),
            Err(err) => Err(StoreError::Unavailable(err.into())),
        }
    }
}

/// Whether `name` is safe to interpolate into a statement as a table
/// name. Shared with the CLI validator so the two checks cannot drift.
pub fn valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// SQLSTATE 23505: unique_violation
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
