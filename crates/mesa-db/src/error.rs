//! # Database Error Types
//!
//! [`DbError`] is everything the persistence layer can report. Repositories
//! return it directly; `mesa-engine` wraps it and decides which variants are
//! user-facing (a [`UniqueViolation`] from the active-slot index surfaces as
//! a slot conflict, a [`NotFound`] as a 404-shaped error) and which are
//! plain failures.
//!
//! Most variants are produced by the [`From<sqlx::Error>`] conversion, so
//! repository code can lean on `?` and only construct errors by hand for the
//! zero-rows-affected cases.
//!
//! [`UniqueViolation`]: DbError::UniqueViolation
//! [`NotFound`]: DbError::NotFound

use thiserror::Error;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// The row a query targeted does not exist.
    ///
    /// Raised when a lookup finds nothing or an UPDATE/DELETE touches zero
    /// rows. `entity` names the kind ("Reservation", "Table", "User") and
    /// `id` is whatever key the caller searched by.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected a write.
    ///
    /// The two indexes that matter here are `restaurant_tables.table_number`
    /// and `idx_reservations_active_slot`, the partial index that makes
    /// SQLite the arbiter when two inserts race for the same table, date,
    /// and time. `field` is the column list from SQLite's message, e.g.
    /// `reservations.table_id, reservations.reservation_date, ...`.
    #[error("Unique constraint violated on {field}")]
    UniqueViolation { field: String },

    /// A write referenced a user or table id that is not in the database.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The database file could not be opened or the pool could not be built.
    ///
    /// Typical causes: missing parent directory, bad permissions, full disk.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A schema migration did not apply.
    ///
    /// Usually bad SQL in a new migration file, or an old file edited in
    /// place so its checksum no longer matches the `_sqlx_migrations` record.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A statement failed for a reason other than a constraint.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A transaction could not begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Acquiring a connection timed out; every pooled connection was busy.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Anything sqlx reports that has no better bucket above.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Shorthand for [`DbError::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => classify_database_error(db_err.message()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Sorts a database-level error into a constraint variant by inspecting the
/// message text, which is the only classification SQLite offers:
///
/// ```text
/// "UNIQUE constraint failed: <table>.<col>[, ...]"  → UniqueViolation
/// "FOREIGN KEY constraint failed"                   → ForeignKeyViolation
/// anything else                                     → QueryFailed
/// ```
fn classify_database_error(msg: &str) -> DbError {
    if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
        DbError::UniqueViolation {
            field: field.to_string(),
        }
    } else if msg.contains("FOREIGN KEY constraint failed") {
        DbError::ForeignKeyViolation {
            message: msg.to_string(),
        }
    } else {
        DbError::QueryFailed(msg.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result alias used throughout the persistence layer.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
