//! # Schema Migrations
//!
//! The schema ships inside the binary: `sqlx::migrate!` embeds every file
//! under `migrations/sqlite/` at compile time, and [`run_migrations`] applies
//! whatever `_sqlx_migrations` says is still pending, in filename order, each
//! in its own transaction.
//!
//! Current history:
//! ```text
//! migrations/sqlite/
//! ├── 001_initial_schema.sql     users, restaurant_tables, reservations
//! └── 002_active_slot_index.sql  partial unique index over live bookings
//! ```
//!
//! New schema work gets a new `NNN_description.sql` file with the next
//! number. Applied files are checksummed, so editing one in place makes
//! every existing database refuse to start.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// All migrations under `migrations/sqlite`, embedded at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the connected database up to the current schema.
///
/// Idempotent. A failure maps to [`DbError::MigrationFailed`] via the
/// `MigrateError` conversion.
///
/// [`DbError::MigrationFailed`]: crate::error::DbError::MigrationFailed
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("Schema is up to date");
    Ok(())
}

/// Reports `(embedded, applied)` migration counts for diagnostics.
///
/// A fresh database has no `_sqlx_migrations` table yet; that reads as
/// zero applied rather than an error.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
