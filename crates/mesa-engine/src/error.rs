//! # Engine Error Type
//!
//! The boundary error: everything a service call can fail with.
//!
//! ## Error Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Engine Error Layers                              │
//! │                                                                         │
//! │  ┌───────────────────────────┐   ┌───────────────────────────────────┐ │
//! │  │     Core (business)       │   │         Db (storage)              │ │
//! │  │                           │   │                                   │ │
//! │  │  UserNotFound             │   │  NotFound                         │ │
//! │  │  TableNotFound            │   │  UniqueViolation*                 │ │
//! │  │  ReservationNotFound      │   │  ForeignKeyViolation              │ │
//! │  │  PastDate                 │   │  QueryFailed / Transaction…       │ │
//! │  │  CapacityExceeded         │   │                                   │ │
//! │  │  SlotConflict             │   │  * unique violations are mapped   │ │
//! │  │  DuplicateTableNumber     │   │    to SlotConflict or             │ │
//! │  │  Forbidden                │   │    DuplicateTableNumber at the    │ │
//! │  │  Validation               │   │    call sites that know which     │ │
//! │  └───────────────────────────┘   └───────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both layers keep their typed variants (no stringification) so a transport
//! layer can match on them for status-code mapping.

use thiserror::Error;

use mesa_core::{CoreError, ValidationError};
use mesa_db::DbError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error returned by every engine service call.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A business rule rejected the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The storage layer failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(CoreError::Validation(err))
    }
}

// =============================================================================
// Error Categorization (for transport status mapping)
// =============================================================================

impl EngineError {
    /// Returns true if the failure means "the thing you named does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::Core(
                CoreError::UserNotFound(_)
                    | CoreError::TableNotFound(_)
                    | CoreError::ReservationNotFound(_)
            ) | EngineError::Db(DbError::NotFound { .. })
        )
    }

    /// Returns true if the failure means "someone else already holds this".
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            EngineError::Core(
                CoreError::SlotConflict { .. } | CoreError::DuplicateTableNumber(_)
            ) | EngineError::Db(DbError::UniqueViolation { .. })
        )
    }

    /// Returns true if the caller's role or ownership was the problem.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, EngineError::Core(CoreError::Forbidden { .. }))
    }

    /// Returns true if the request itself was malformed.
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Core(CoreError::Validation(_)))
    }
}
