//! # Database Pool Management
//!
//! Opens the SQLite database and hands out repositories over a shared pool.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  DbConfig::new("mesa.db")                                               │
//! │       │            configure path, pool sizing, timeouts                │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                            │
//! │       │            open pool, apply pragmas, run migrations             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │               SqlitePool                 │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  up to max_connections    │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.tables() / db.reservations() / db.users()                           │
//! │       each accessor is a cheap struct wrapping a pool clone             │
//! │                                                                         │
//! │  A booking day is read-heavy (availability probes, service boards)      │
//! │  with short writes (inserts, status flips). WAL journal mode lets the   │
//! │  reads proceed while a write commits; SQLite serializes the writers,    │
//! │  which is what makes the active-slot unique index a race arbiter.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::reservation::ReservationRepository;
use crate::repository::table::TableRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Settings for opening the reservation database.
///
/// Built fluently:
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/mesa/mesa.db")
///     .max_connections(8)
///     .connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Where the SQLite file lives. Created on first open.
    pub database_path: PathBuf,

    /// Pool ceiling. Five is comfortable for one restaurant's traffic.
    pub max_connections: u32,

    /// Connections kept warm between requests.
    pub min_connections: u32,

    /// How long an acquire may wait before giving up.
    pub connect_timeout: Duration,

    /// Idle connections above `min_connections` are dropped after this.
    pub idle_timeout: Duration,

    /// Apply pending migrations as part of `Database::new`.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Config with production defaults for the given database file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Caps the pool at `max` connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Keeps at least `min` connections open.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Bounds how long acquiring a connection may block.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enables or disables the migration run inside `Database::new`.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Config for an isolated in-memory database, used by tests.
    ///
    /// Pinned to a single connection: every `:memory:` connection is its own
    /// empty database, so a second connection would see no schema. Tests that
    /// need real concurrency (racing writers) must use a file-backed config.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// Connection options for this config: rwc open mode plus the pragmas
    /// the booking workload wants.
    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        // mode=rwc: read/write, create the file when absent.
        let url = format!("sqlite://{}?mode=rwc", self.database_path.display());

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            // Readers keep answering availability probes while a booking
            // commits; writers queue on SQLite's single write lock.
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL is durable enough under WAL; a host crash can lose the
            // final transaction but never corrupts the file.
            .synchronous(SqliteSynchronous::Normal)
            // The ledger references users and tables; SQLite only enforces
            // that when asked.
            .foreign_keys(true)
            .create_if_missing(true);

        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the reservation database.
///
/// Cloning shares the underlying pool, and the repository accessors return
/// lightweight structs over pool clones, so one `Database` can be held
/// wherever the engine lives and borrowed freely per operation.
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database described by `config`.
    ///
    /// Applies the WAL/synchronous/foreign-key pragmas, builds the pool, and
    /// runs any pending migrations unless the config opted out.
    ///
    /// ## Errors
    /// [`DbError::ConnectionFailed`] when the file cannot be opened or the
    /// pool cannot be built; [`DbError::MigrationFailed`] when a migration
    /// does not apply cleanly.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening reservation database"
        );

        let options = config.connect_options()?;
        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool ready"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Idempotent; called by [`Database::new`]
    /// unless the config disabled it.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The raw pool, for queries no repository covers. Prefer the accessors.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Table registry: the floor plan and each table's occupancy status.
    pub fn tables(&self) -> TableRepository {
        TableRepository::new(self.pool.clone())
    }

    /// Reservation ledger: bookings, slot conflicts, status transitions.
    pub fn reservations(&self) -> ReservationRepository {
        ReservationRepository::new(self.pool.clone())
    }

    /// User directory: the guest names and phones views are rendered from.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Closes the pool. Every repository handed out earlier stops working;
    /// meant for orderly shutdown.
    pub async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }

    /// True when the database still answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
