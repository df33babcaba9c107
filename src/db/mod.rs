//! Database module for the `users` table.
//!
//! # Architecture
//!
//! - `models`: Data structures that map to database tables
//! - `repository`: The [`UserStore`] trait and its sqlx implementations
//! - Connection pooling; the backend is picked from the URL scheme
//!
//! Startup follows the same sequence for every backend: build a lazy pool,
//! poll the store until it answers, then create the table if it is missing.

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    PgPool, SqlitePool,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ServiceError;

pub mod models;
pub mod repository;

pub use repository::{PgUserStore, SqliteUserStore, UserStore};

/// How long to wait for the store to come up at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Maximum number of ping attempts
    pub attempts: u32,
    /// Delay between failed attempts
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval: Duration::from_secs(1),
        }
    }
}

/// Opens the store named by `database_url`, waits for it and ensures the schema.
///
/// `postgres://` and `postgresql://` URLs use Postgres; `sqlite:` URLs use SQLite.
///
/// # Example
///
/// ```no_run
/// use coin_users_api::db::{connect, ReadinessPolicy};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = connect("sqlite::memory:", ReadinessPolicy::default()).await?;
///     let users = store.list_users().await?;
///     assert!(users.is_empty());
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// Returns a database error if the URL cannot be parsed or names an unknown
/// backend, if the store never becomes ready, or if the table cannot be created.
pub async fn connect(
    database_url: &str,
    readiness: ReadinessPolicy,
) -> Result<Arc<dyn UserStore>, ServiceError> {
    let store: Arc<dyn UserStore> =
        if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            Arc::new(PgUserStore::new(create_pg_pool(database_url)?))
        } else if database_url.starts_with("sqlite:") {
            Arc::new(SqliteUserStore::new(create_sqlite_pool(database_url).await?))
        } else {
            return Err(ServiceError::database(
                "Unsupported DATABASE_URL scheme, expected postgres:// or sqlite:",
                None,
            ));
        };

    wait_until_ready(store.as_ref(), readiness).await?;

    info!("Ensuring users table exists");
    store.ensure_schema().await?;

    Ok(store)
}

/// Creates a lazily connecting Postgres pool.
///
/// # Errors
///
/// Returns a database error if the URL is malformed.
pub fn create_pg_pool(database_url: &str) -> Result<PgPool, ServiceError> {
    info!("Configuring Postgres connection pool");

    let options = PgConnectOptions::from_str(database_url).map_err(|e| {
        ServiceError::database("Failed to parse Postgres DATABASE_URL", Some(Box::new(e)))
    })?;

    Ok(PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy_with(options))
}

/// Creates a SQLite pool, creating the database file if missing.
///
/// In-memory databases are limited to one connection so every query sees
/// the same database.
///
/// # Errors
///
/// Returns a database error if the URL is malformed or the file cannot be opened.
pub async fn create_sqlite_pool(database_url: &str) -> Result<SqlitePool, ServiceError> {
    info!(database_url, "Connecting to SQLite database");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| {
            ServiceError::database(
                format!("Failed to parse database URL: {database_url}"),
                Some(Box::new(e)),
            )
        })?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(30));

    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|e| {
            ServiceError::database(
                format!("Failed to connect to database at {database_url}"),
                Some(Box::new(e)),
            )
        })
}

/// Pings the store until it answers or the policy's attempts run out.
///
/// # Errors
///
/// Returns the last ping failure, wrapped, once every attempt has failed.
pub async fn wait_until_ready(
    store: &dyn UserStore,
    policy: ReadinessPolicy,
) -> Result<(), ServiceError> {
    let mut last_error = None;

    for attempt in 1..=policy.attempts {
        match store.ping().await {
            Ok(()) => {
                info!(attempt, "Database is ready");
                return Ok(());
            }
            Err(e) => {
                warn!(attempt, max_attempts = policy.attempts, error = %e, "Database not ready");
                last_error = Some(e);
                if attempt < policy.attempts {
                    tokio::time::sleep(policy.interval).await;
                }
            }
        }
    }

    Err(ServiceError::database(
        format!("Database not ready after {} attempts", policy.attempts),
        last_error.map(|e| Box::new(e) as crate::error::BoxedSource),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::UserRow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Store whose ping fails a fixed number of times before succeeding.
    struct FlakyStore {
        failures_left: AtomicU32,
        pings: AtomicU32,
    }

    impl FlakyStore {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(failures),
                pings: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl UserStore for FlakyStore {
        async fn list_users(&self) -> Result<Vec<UserRow>, ServiceError> {
            Ok(Vec::new())
        }

        async fn get_user(&self, _id: i64) -> Result<Option<UserRow>, ServiceError> {
            Ok(None)
        }

        async fn insert_user(&self, _name: &str, _email: &str) -> Result<UserRow, ServiceError> {
            Err(ServiceError::database("read-only", None))
        }

        async fn ensure_schema(&self) -> Result<(), ServiceError> {
            Ok(())
        }

        async fn ping(&self) -> Result<(), ServiceError> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(ServiceError::database("connection refused", None));
            }
            Ok(())
        }
    }

    fn fast_policy(attempts: u32) -> ReadinessPolicy {
        ReadinessPolicy {
            attempts,
            interval: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_default_readiness_policy() {
        let policy = ReadinessPolicy::default();
        assert_eq!(policy.attempts, 30);
        assert_eq!(policy.interval, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_wait_until_ready_tolerates_slow_start() {
        let store = FlakyStore::new(3);

        wait_until_ready(&store, fast_policy(5))
            .await
            .expect("Store should become ready");

        assert_eq!(store.pings.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_wait_until_ready_gives_up() {
        let store = FlakyStore::new(10);

        let result = wait_until_ready(&store, fast_policy(3)).await;

        assert!(matches!(result, Err(ServiceError::DatabaseError { .. })));
        assert_eq!(store.pings.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_connect_sqlite_memory() {
        let store = connect("sqlite::memory:", fast_policy(1))
            .await
            .expect("Failed to connect");

        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connect_rejects_unknown_scheme() {
        let result = connect("mysql://localhost/users", fast_policy(1)).await;
        assert!(matches!(result, Err(ServiceError::DatabaseError { .. })));
    }

    #[test]
    fn test_create_pg_pool_rejects_malformed_url() {
        assert!(create_pg_pool("postgres://user@host:notaport/db").is_err());
    }
}
