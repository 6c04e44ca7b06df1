//! # Table Repository
//!
//! Database operations for the table registry (the restaurant's floor plan).
//!
//! ## Key Operations
//! - CRUD over `restaurant_tables`
//! - Availability listings (free tables, free tables that fit a party)
//! - Direct status writes (the maintenance path; lifecycle-driven status
//!   writes go through [`ReservationRepository::set_status_with_table`] so
//!   they stay transactional with the reservation row)
//!
//! [`ReservationRepository::set_status_with_table`]:
//! crate::repository::reservation::ReservationRepository::set_status_with_table

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use mesa_core::{NewTable, RestaurantTable, TableStatus, TableUpdate};

/// Repository for table registry operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = TableRepository::new(pool);
///
/// // Which tables can take a party of 4 right now?
/// let candidates = repo.list_available_with_capacity(4).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    /// Creates a new TableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    /// Inserts a new table. New tables always start `available`.
    ///
    /// ## Errors
    /// [`DbError::UniqueViolation`] if the table number is already taken
    /// (`restaurant_tables.table_number` is UNIQUE).
    pub async fn insert(&self, new: &NewTable) -> DbResult<RestaurantTable> {
        let now = Utc::now();

        debug!(table_number = new.table_number, "Inserting table");

        let result = sqlx::query(
            r#"
            INSERT INTO restaurant_tables (
                table_number, capacity, location, status, description,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(new.table_number)
        .bind(new.capacity)
        .bind(new.location)
        .bind(TableStatus::Available)
        .bind(new.description.as_deref())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(RestaurantTable {
            id: result.last_insert_rowid(),
            table_number: new.table_number,
            capacity: new.capacity,
            location: new.location,
            status: TableStatus::Available,
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets a table by its registry id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<RestaurantTable>> {
        let table = sqlx::query_as::<_, RestaurantTable>(
            r#"
            SELECT id, table_number, capacity, location, status, description,
                   created_at, updated_at
            FROM restaurant_tables
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(table)
    }

    /// Checks whether any table already carries this number.
    pub async fn exists_by_number(&self, table_number: i32) -> DbResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM restaurant_tables WHERE table_number = ?1)",
        )
        .bind(table_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Lists every table, ordered by table number.
    pub async fn list_all(&self) -> DbResult<Vec<RestaurantTable>> {
        let tables = sqlx::query_as::<_, RestaurantTable>(
            r#"
            SELECT id, table_number, capacity, location, status, description,
                   created_at, updated_at
            FROM restaurant_tables
            ORDER BY table_number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Lists free tables, smallest first.
    ///
    /// "Free" means registry status `available`; whether a particular slot
    /// is booked is the reservation ledger's question, not this one.
    pub async fn list_available(&self) -> DbResult<Vec<RestaurantTable>> {
        let tables = sqlx::query_as::<_, RestaurantTable>(
            r#"
            SELECT id, table_number, capacity, location, status, description,
                   created_at, updated_at
            FROM restaurant_tables
            WHERE status = 'available'
            ORDER BY capacity ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Lists free tables that can seat a party of `guests`, smallest first.
    pub async fn list_available_with_capacity(
        &self,
        guests: i32,
    ) -> DbResult<Vec<RestaurantTable>> {
        let tables = sqlx::query_as::<_, RestaurantTable>(
            r#"
            SELECT id, table_number, capacity, location, status, description,
                   created_at, updated_at
            FROM restaurant_tables
            WHERE status = 'available' AND capacity >= ?1
            ORDER BY capacity ASC
            "#,
        )
        .bind(guests)
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }

    /// Overwrites every mutable field of a table.
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] if the id doesn't exist
    /// - [`DbError::UniqueViolation`] if the new table number collides
    pub async fn update(&self, id: i64, update: &TableUpdate) -> DbResult<RestaurantTable> {
        let now = Utc::now();

        debug!(id = id, table_number = update.table_number, "Updating table");

        let result = sqlx::query(
            r#"
            UPDATE restaurant_tables SET
                table_number = ?2,
                capacity = ?3,
                location = ?4,
                status = ?5,
                description = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.table_number)
        .bind(update.capacity)
        .bind(update.location)
        .bind(update.status)
        .bind(update.description.as_deref())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id.to_string()));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Table", id.to_string()))
    }

    /// Sets a table's occupancy status directly (maintenance path).
    ///
    /// ## Errors
    /// [`DbError::NotFound`] if the id doesn't exist.
    pub async fn set_status(&self, id: i64, status: TableStatus) -> DbResult<()> {
        let now = Utc::now();

        debug!(id = id, status = ?status, "Setting table status");

        let result = sqlx::query(
            "UPDATE restaurant_tables SET status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id.to_string()));
        }

        Ok(())
    }

    /// Hard-deletes a table from the registry.
    ///
    /// ## Errors
    /// - [`DbError::NotFound`] if the id doesn't exist
    /// - [`DbError::ForeignKeyViolation`] if reservations still reference it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM restaurant_tables WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Table", id.to_string()));
        }

        Ok(())
    }

    /// Counts all registered tables.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM restaurant_tables")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
