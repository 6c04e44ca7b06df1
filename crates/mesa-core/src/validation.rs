//! # Validation Module
//!
//! Shape checks for incoming payloads: positive counts, bounded free-text
//! fields. These run first in every engine operation, before any database
//! round trip, so a malformed request never costs a query.
//!
//! Shape is all this module judges. Rules that need context to evaluate
//! live elsewhere: past-date, capacity, and conflict checks in the engine,
//! uniqueness in the schema's UNIQUE indexes.
//!
//! ```rust
//! use mesa_core::validation::{validate_guests, validate_special_requests};
//!
//! validate_guests(4).unwrap();
//! validate_special_requests(Some("window seat please")).unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_SPECIAL_REQUESTS_LEN, MAX_TABLE_DESCRIPTION_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Reservation Validators
// =============================================================================

/// A party must have at least one guest.
///
/// Whether the party *fits the table* is a business rule checked later by
/// the engine against the table's capacity.
pub fn validate_guests(guests: i32) -> ValidationResult<()> {
    if guests <= 0 {
        return Err(ValidationError::MustBePositive { field: "guests" });
    }

    Ok(())
}

/// A special-requests note may be absent, but not longer than
/// [`MAX_SPECIAL_REQUESTS_LEN`] characters.
pub fn validate_special_requests(text: Option<&str>) -> ValidationResult<()> {
    if let Some(text) = text {
        if text.len() > MAX_SPECIAL_REQUESTS_LEN {
            return Err(ValidationError::TooLong {
                field: "special_requests",
                max: MAX_SPECIAL_REQUESTS_LEN,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Table Validators
// =============================================================================

/// Table numbers are positive integers as printed on the physical tables.
///
/// Uniqueness is the registry's concern (UNIQUE column), surfaced as a
/// duplicate-table-number error by the catalog service.
pub fn validate_table_number(table_number: i32) -> ValidationResult<()> {
    if table_number <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "table_number",
        });
    }

    Ok(())
}

/// A table seats at least one guest.
pub fn validate_capacity(capacity: i32) -> ValidationResult<()> {
    if capacity <= 0 {
        return Err(ValidationError::MustBePositive { field: "capacity" });
    }

    Ok(())
}

/// A table description may be absent, but not longer than
/// [`MAX_TABLE_DESCRIPTION_LEN`] characters.
pub fn validate_description(text: Option<&str>) -> ValidationResult<()> {
    if let Some(text) = text {
        if text.len() > MAX_TABLE_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description",
                max: MAX_TABLE_DESCRIPTION_LEN,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
