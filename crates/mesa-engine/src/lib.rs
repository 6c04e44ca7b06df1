//! # mesa-engine: Reservation Lifecycle Engine for Mesa
//!
//! This crate turns the storage layer into a bookable restaurant. It is the
//! boundary a transport layer calls: every operation takes an [`AuthContext`]
//! (who is asking, in what role) and returns a typed `Result`.
//!
//! [`AuthContext`]: mesa_core::AuthContext
//!
//! ## Booking Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Reservation Lifecycle                              │
//! │                                                                         │
//! │  create(ctx, request)                                                   │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │ Validate, in order (first failure wins):                         │  │
//! │  │   1. shape     guests ≥ 1, special request length                │  │
//! │  │   2. user      exists in the directory                           │  │
//! │  │   3. table     exists in the registry                            │  │
//! │  │   4. date      not before today                                  │  │
//! │  │   5. capacity  party fits the table                              │  │
//! │  │   6. conflict  no active reservation holds the slot              │  │
//! │  └──────────────────────────┬───────────────────────────────────────┘  │
//! │                             ▼                                           │
//! │  INSERT (status PENDING) ── the partial unique index on active slots    │
//! │    decides any remaining race; the loser gets SlotConflict              │
//! │                             │                                           │
//! │                             ▼                                           │
//! │  notify(Created) ── fire-and-forget, after commit                       │
//! │                                                                         │
//! │  change_status(ctx, id, target)                                         │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  one transaction: reservation status + table status side effect         │
//! │    CONFIRMED → table RESERVED          SEATED    → table OCCUPIED       │
//! │    CANCELLED / COMPLETED / NO_SHOW → table AVAILABLE                    │
//! │    PENDING   → (no table write)                                         │
//! │                             │                                           │
//! │                             ▼                                           │
//! │  notify(StatusChanged)                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`reservations`] - `ReservationService`: lifecycle, availability, queries
//! - [`tables`] - `TableService`: floor-plan catalog CRUD
//! - [`events`] - Lifecycle event payloads and the notifier seam
//! - [`error`] - `EngineError`, the boundary error type
//!
//! ## Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use mesa_core::AuthContext;
//! use mesa_db::{Database, DbConfig};
//! use mesa_engine::{LogNotifier, ReservationService};
//!
//! let db = Arc::new(Database::new(DbConfig::new("./mesa.db")).await?);
//! let reservations = ReservationService::new(db.clone(), Arc::new(LogNotifier));
//!
//! let ctx = AuthContext::customer(42);
//! let view = reservations.create(&ctx, request).await?;
//! println!("booked table {} at {}", view.table_number, view.reservation_time);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod events;
pub mod reservations;
pub mod tables;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{EngineError, EngineResult};
pub use events::{LogNotifier, ReservationEvent, ReservationEventKind, ReservationNotifier};
pub use reservations::ReservationService;
pub use tables::TableService;
