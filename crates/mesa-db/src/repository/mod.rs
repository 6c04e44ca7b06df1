//! # Repositories
//!
//! One repository per aggregate, each a thin struct over a pool clone with
//! async methods that run plain SQL. All SQL in the crate lives in these
//! three modules; the engine above never sees a connection, a transaction,
//! or a row type.
//!
//! - [`table::TableRepository`] owns the floor plan: physical tables and
//!   their occupancy status.
//! - [`reservation::ReservationRepository`] owns the booking ledger,
//!   including the conflict probe and the coupled
//!   reservation-plus-table status write.
//! - [`user::UserRepository`] is the guest directory the views join
//!   against.
//!
//! Methods that return zero-or-one row use `Option`; methods that target a
//! specific row by id return [`DbError::NotFound`] when it is missing.
//!
//! [`DbError::NotFound`]: crate::error::DbError::NotFound

pub mod reservation;
pub mod table;
pub mod user;
