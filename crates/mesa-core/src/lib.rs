//! # mesa-core: Domain Rules for Mesa
//!
//! The vocabulary and business rules of a restaurant table-reservation
//! system, free of I/O. Everything in this crate is a plain function over
//! plain data: no database, no network, no clock. "Today" is always a
//! parameter, which is what keeps the date rules testable without freezing
//! time.
//!
//! ## Where This Crate Sits
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │   transport (HTTP, CLI, ...)          out of scope         │
//! ├────────────────────────────────────────────────────────────┤
//! │   mesa-engine                          orchestration       │
//! │     create / change_status / cancel / availability         │
//! ├────────────────────────────────────────────────────────────┤
//! │ ★ mesa-core                            this crate          │
//! │     types        tables, reservations, statuses, roles     │
//! │     validation   shape checks for incoming payloads        │
//! │     error        CoreError, ValidationError                │
//! ├────────────────────────────────────────────────────────────┤
//! │   mesa-db                              SQLite via sqlx     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The one rule with teeth lives in [`types`]: a reservation's status alone
//! decides what happens to its table. Confirming claims the table, seating
//! occupies it, and every terminal status releases it. The engine reads
//! that mapping from [`types::ReservationStatus::table_side_effect`] rather
//! than hard-coding it per call site.
//!
//! ## Example
//! ```rust
//! use mesa_core::types::{ReservationStatus, TableStatus};
//!
//! // A confirmed reservation claims its table.
//! let effect = ReservationStatus::Confirmed.table_side_effect();
//! assert_eq!(effect, Some(TableStatus::Reserved));
//!
//! // A pending one does not.
//! assert_eq!(ReservationStatus::Pending.table_side_effect(), None);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================
// `use mesa_core::Reservation` reads better than the full path at every
// engine call site.

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a reservation's free-text special request.
///
/// Matches the ledger column width; anything longer is rejected before it
/// reaches storage.
pub const MAX_SPECIAL_REQUESTS_LEN: usize = 1000;

/// Maximum length of a table's free-text description.
pub const MAX_TABLE_DESCRIPTION_LEN: usize = 500;
