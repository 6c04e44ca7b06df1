//! # Table Service
//!
//! Floor-plan catalog CRUD, sharing the engine's error channel. Plain
//! registry management: capacity, location, description, plus the direct
//! status override staff use for maintenance. Status changes that belong to
//! the reservation lifecycle go through [`ReservationService`] instead.
//!
//! [`ReservationService`]: crate::reservations::ReservationService
//!
//! ## Access Matrix
//! ```text
//! operation            ADMIN   STAFF   CUSTOMER
//! ─────────────────────────────────────────────
//! create               yes     no      no
//! update               yes     no      no
//! delete               yes     no      no
//! set_status           yes     yes     no
//! get / list_all       yes     yes     no
//! list_available       yes     yes     yes
//! list_available_for   yes     yes     yes
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use mesa_core::validation::{
    validate_capacity, validate_description, validate_guests, validate_table_number,
};
use mesa_core::{AuthContext, CoreError, NewTable, RestaurantTable, TableStatus, TableUpdate};
use mesa_db::{Database, DbError};

use crate::error::EngineResult;

/// Manages the table registry (the floor plan).
#[derive(Clone)]
pub struct TableService {
    /// Shared database handle.
    db: Arc<Database>,
}

impl TableService {
    /// Creates a new TableService.
    pub fn new(db: Arc<Database>) -> Self {
        TableService { db }
    }

    // =========================================================================
    // Catalog Writes
    // =========================================================================

    /// Adds a table to the floor plan. ADMIN only.
    ///
    /// ## Errors
    /// - [`CoreError::Validation`] for a non-positive number/capacity or an
    ///   over-long description
    /// - [`CoreError::DuplicateTableNumber`] if the number is taken (checked
    ///   up front, backstopped by the registry's unique index)
    pub async fn create(&self, ctx: &AuthContext, new: NewTable) -> EngineResult<RestaurantTable> {
        if !ctx.is_admin() {
            return Err(CoreError::forbidden(ctx, "add a table").into());
        }

        validate_table_number(new.table_number)?;
        validate_capacity(new.capacity)?;
        validate_description(new.description.as_deref())?;

        if self.db.tables().exists_by_number(new.table_number).await? {
            return Err(CoreError::DuplicateTableNumber(new.table_number).into());
        }

        let table = match self.db.tables().insert(&new).await {
            Ok(table) => table,
            Err(DbError::UniqueViolation { .. }) => {
                return Err(CoreError::DuplicateTableNumber(new.table_number).into());
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            id = table.id,
            table_number = table.table_number,
            capacity = table.capacity,
            "Table added"
        );

        Ok(table)
    }

    /// Rewrites every mutable field of a table. ADMIN only.
    ///
    /// If the table number changes, the duplicate check applies to the new
    /// number.
    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: i64,
        update: TableUpdate,
    ) -> EngineResult<RestaurantTable> {
        if !ctx.is_admin() {
            return Err(CoreError::forbidden(ctx, "edit a table").into());
        }

        validate_table_number(update.table_number)?;
        validate_capacity(update.capacity)?;
        validate_description(update.description.as_deref())?;

        let existing = self
            .db
            .tables()
            .get_by_id(id)
            .await?
            .ok_or(CoreError::TableNotFound(id))?;

        if update.table_number != existing.table_number
            && self.db.tables().exists_by_number(update.table_number).await?
        {
            return Err(CoreError::DuplicateTableNumber(update.table_number).into());
        }

        let table = match self.db.tables().update(id, &update).await {
            Ok(table) => table,
            Err(DbError::UniqueViolation { .. }) => {
                return Err(CoreError::DuplicateTableNumber(update.table_number).into());
            }
            Err(DbError::NotFound { .. }) => return Err(CoreError::TableNotFound(id).into()),
            Err(e) => return Err(e.into()),
        };

        info!(id = id, table_number = table.table_number, "Table updated");

        Ok(table)
    }

    /// Directly overrides a table's occupancy status (maintenance path).
    /// ADMIN/STAFF.
    pub async fn set_status(
        &self,
        ctx: &AuthContext,
        id: i64,
        status: TableStatus,
    ) -> EngineResult<()> {
        if !ctx.is_staff() {
            return Err(CoreError::forbidden(ctx, "set a table's status").into());
        }

        match self.db.tables().set_status(id, status).await {
            Ok(()) => {
                info!(id = id, status = ?status, "Table status set");
                Ok(())
            }
            Err(DbError::NotFound { .. }) => Err(CoreError::TableNotFound(id).into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a table from the floor plan. ADMIN only.
    ///
    /// A table with ledger history cannot be removed; the reservation foreign
    /// key surfaces as a storage error.
    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> EngineResult<()> {
        if !ctx.is_admin() {
            return Err(CoreError::forbidden(ctx, "remove a table").into());
        }

        match self.db.tables().delete(id).await {
            Ok(()) => {
                info!(id = id, "Table removed");
                Ok(())
            }
            Err(DbError::NotFound { .. }) => Err(CoreError::TableNotFound(id).into()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Catalog Reads
    // =========================================================================

    /// Gets one table. ADMIN/STAFF.
    pub async fn get(&self, ctx: &AuthContext, id: i64) -> EngineResult<RestaurantTable> {
        if !ctx.is_staff() {
            return Err(CoreError::forbidden(ctx, "inspect a table").into());
        }

        self.db
            .tables()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::TableNotFound(id).into())
    }

    /// Lists the whole floor plan by table number. ADMIN/STAFF.
    pub async fn list_all(&self, ctx: &AuthContext) -> EngineResult<Vec<RestaurantTable>> {
        if !ctx.is_staff() {
            return Err(CoreError::forbidden(ctx, "list the floor plan").into());
        }

        Ok(self.db.tables().list_all().await?)
    }

    /// Lists free tables, smallest first. Any role.
    pub async fn list_available(&self, ctx: &AuthContext) -> EngineResult<Vec<RestaurantTable>> {
        debug!(user_id = ctx.user_id, "Listing available tables");

        Ok(self.db.tables().list_available().await?)
    }

    /// Lists free tables that can seat a party of `guests`, smallest first.
    /// Any role.
    pub async fn list_available_for(
        &self,
        ctx: &AuthContext,
        guests: i32,
    ) -> EngineResult<Vec<RestaurantTable>> {
        validate_guests(guests)?;

        debug!(user_id = ctx.user_id, guests = guests, "Listing tables for party");

        Ok(self.db.tables().list_available_with_capacity(guests).await?)
    }
}

// =============================================================================
// Tests
// =============================================================================
