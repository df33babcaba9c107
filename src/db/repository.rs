//! Repository pattern for the `users` table.
//!
//! [`UserStore`] is the seam the HTTP handlers depend on. Two sqlx-backed
//! implementations exist: [`PgUserStore`] for production and
//! [`SqliteUserStore`] for local development and tests. Both use the same
//! numbered-parameter SQL; only the schema DDL differs.

use async_trait::async_trait;
use sqlx::{PgPool, SqlitePool};
use tracing::{debug, instrument};

use super::models::UserRow;
use crate::error::ServiceError;

const SELECT_USERS: &str =
    "SELECT id, name, email, createTimestamp AS created_at FROM users ORDER BY id";

const SELECT_USER_BY_ID: &str =
    "SELECT id, name, email, createTimestamp AS created_at FROM users WHERE id = $1";

const INSERT_USER: &str = r#"
    INSERT INTO users (name, email)
    VALUES ($1, $2)
    RETURNING id, name, email, createTimestamp AS created_at
"#;

const PG_CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name TEXT,
        email TEXT,
        createTimestamp TIMESTAMP DEFAULT NOW()
    )
"#;

const SQLITE_CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        email TEXT,
        createTimestamp TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Row-level access to the `users` table.
///
/// Implementations must be safe to share across concurrently running
/// request handlers.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns every user, ordered by id.
    async fn list_users(&self) -> Result<Vec<UserRow>, ServiceError>;

    /// Returns the user with the given id, if any.
    async fn get_user(&self, id: i64) -> Result<Option<UserRow>, ServiceError>;

    /// Inserts a user and returns it with the store-assigned id and timestamp.
    async fn insert_user(&self, name: &str, email: &str) -> Result<UserRow, ServiceError>;

    /// Creates the `users` table if it does not exist yet.
    async fn ensure_schema(&self) -> Result<(), ServiceError>;

    /// Checks that the store accepts queries.
    async fn ping(&self) -> Result<(), ServiceError>;
}

/// Postgres-backed [`UserStore`].
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserRow>, ServiceError> {
        let users = sqlx::query_as::<_, UserRow>(SELECT_USERS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ServiceError::database("Failed to list users", Some(Box::new(e))))?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> Result<Option<UserRow>, ServiceError> {
        sqlx::query_as::<_, UserRow>(SELECT_USER_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                ServiceError::database(format!("Failed to query user {id}"), Some(Box::new(e)))
            })
    }

    #[instrument(skip(self, email))]
    async fn insert_user(&self, name: &str, email: &str) -> Result<UserRow, ServiceError> {
        sqlx::query_as::<_, UserRow>(INSERT_USER)
            .bind(name)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ServiceError::database("Failed to insert user", Some(Box::new(e))))
    }

    async fn ensure_schema(&self) -> Result<(), ServiceError> {
        sqlx::query(PG_CREATE_USERS)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                ServiceError::database("Failed to create users table", Some(Box::new(e)))
            })?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::database("Health check failed", Some(Box::new(e))))?;
        Ok(())
    }
}

/// SQLite-backed [`UserStore`].
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserRow>, ServiceError> {
        let users = sqlx::query_as::<_, UserRow>(SELECT_USERS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ServiceError::database("Failed to list users", Some(Box::new(e))))?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> Result<Option<UserRow>, ServiceError> {
        sqlx::query_as::<_, UserRow>(SELECT_USER_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                ServiceError::database(format!("Failed to query user {id}"), Some(Box::new(e)))
            })
    }

    #[instrument(skip(self, email))]
    async fn insert_user(&self, name: &str, email: &str) -> Result<UserRow, ServiceError> {
        sqlx::query_as::<_, UserRow>(INSERT_USER)
            .bind(name)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ServiceError::database("Failed to insert user", Some(Box::new(e))))
    }

    async fn ensure_schema(&self) -> Result<(), ServiceError> {
        sqlx::query(SQLITE_CREATE_USERS)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                ServiceError::database("Failed to create users table", Some(Box::new(e)))
            })?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::database("Health check failed", Some(Box::new(e))))?;
        Ok(())
    }
}
