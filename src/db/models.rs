//! Database models that map to SQL tables.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Represents a row of the `users` table.
///
/// `created_at` maps to the `createTimestamp` column; queries alias it so
/// Postgres (which folds unquoted identifiers to lower case) and SQLite
/// produce the same column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRow {
    /// Store-assigned identifier
    pub id: i32,
    /// Display name, never empty when inserted through the API
    pub name: String,
    /// Email address, not validated beyond being non-empty
    pub email: String,
    /// Insert time as recorded by the store
    pub created_at: NaiveDateTime,
}
