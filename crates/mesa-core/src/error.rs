//! # Error Types
//!
//! Domain errors, split in two: [`CoreError`] for business rules a
//! well-formed request can still break (missing table, past date, taken
//! slot) and [`ValidationError`] for requests whose shape was wrong to
//! begin with. Validation failures convert into `CoreError::Validation`,
//! so engine code handles one error type.
//!
//! ```text
//! ValidationError ──► CoreError ──┐
//!                                 ├──► EngineError ──► caller
//!                     DbError ────┘    (mesa-engine)
//! ```
//!
//! Every message carries the ids, dates, or limits involved; the caller
//! can show them to an end user without consulting logs.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::types::Role;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
///
/// Every variant is terminal for the call that produced it: nothing here is
/// retried by the engine, the caller surfaces the message and the end user
/// makes a new attempt.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No user with this directory id.
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// No table with this registry id.
    #[error("Table not found: {0}")]
    TableNotFound(i64),

    /// No reservation with this ledger id.
    #[error("Reservation not found: {0}")]
    ReservationNotFound(i64),

    /// Reservation date precedes the current date.
    ///
    /// Checked at creation only; an existing reservation naturally ages past
    /// its date without ever re-triggering this.
    #[error("Reservation date {date} is in the past")]
    PastDate { date: NaiveDate },

    /// Party is larger than the table.
    #[error("Table {table_number} seats {capacity}, cannot take {requested} guests")]
    CapacityExceeded {
        table_number: i32,
        capacity: i32,
        requested: i32,
    },

    /// An active reservation already holds this exact (table, date, time).
    ///
    /// Raised both by the advisory conflict check before insert and, for
    /// the loser of two concurrent creates, by the ledger's unique index.
    #[error("Table {table_id} already has an active reservation on {date} at {time}")]
    SlotConflict {
        table_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    },

    /// Another table already carries this number.
    #[error("Table number {0} already exists")]
    DuplicateTableNumber(i32),

    /// The caller's role or ownership does not permit the operation.
    #[error("User {user_id} ({role:?}) is not allowed to {action}")]
    Forbidden {
        user_id: i64,
        role: Role,
        action: &'static str,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Builds a [`CoreError::Forbidden`] from the caller's context.
    pub fn forbidden(ctx: &crate::types::AuthContext, action: &'static str) -> Self {
        CoreError::Forbidden {
            user_id: ctx.user_id,
            role: ctx.role,
            action,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a request's shape is wrong before any business logic
/// runs (and before any storage is touched).
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthContext;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CapacityExceeded {
            table_number: 5,
            capacity: 4,
            requested: 6,
        };
        assert_eq!(
            err.to_string(),
            "Table 5 seats 4, cannot take 6 guests"
        );

        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let time = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let err = CoreError::SlotConflict {
            table_id: 7,
            date,
            time,
        };
        assert_eq!(
            err.to_string(),
            "Table 7 already has an active reservation on 2026-03-01 at 19:00:00"
        );
    }

    #[test]
    fn test_forbidden_from_context() {
        let ctx = AuthContext::customer(42);
        let err = CoreError::forbidden(&ctx, "delete reservations");
        assert_eq!(
            err.to_string(),
            "User 42 (Customer) is not allowed to delete reservations"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive { field: "guests" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
