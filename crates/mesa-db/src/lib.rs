//! # mesa-db: Persistence for Mesa
//!
//! SQLite storage for the reservation system, accessed through sqlx. The
//! crate owns the schema (embedded migrations), the pool, and one repository
//! per aggregate. Policy lives upstream in `mesa-engine`; everything here is
//! plumbing that reads and writes rows.
//!
//! ## Layout
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         mesa-db                              │
//! │                                                              │
//! │   Database (pool.rs)                                         │
//! │     ├── tables()        → TableRepository                    │
//! │     ├── reservations()  → ReservationRepository              │
//! │     └── users()         → UserRepository                     │
//! │                                                              │
//! │   migrations.rs   embedded schema, applied on open           │
//! │   error.rs        DbError + sqlx conversions                 │
//! │                                                              │
//! │                    SQLite file (WAL)                         │
//! │        users · restaurant_tables · reservations              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two guarantees the schema itself enforces, so they hold no matter which
//! code path writes:
//!
//! - `idx_reservations_active_slot` keeps at most one live booking per
//!   table, date, and time. Racing inserts are settled by SQLite, not by
//!   application locks.
//! - Foreign keys are switched on, so a reservation can only reference
//!   users and tables that exist.
//!
//! ## Usage
//! ```rust,ignore
//! use mesa_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/mesa.db")).await?;
//!
//! let free = db.tables().list_available().await?;
//! let taken = db.reservations().has_active_conflict(1, date, time).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::reservation::ReservationRepository;
pub use repository::table::TableRepository;
pub use repository::user::UserRepository;
