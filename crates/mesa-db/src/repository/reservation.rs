//! # Reservation Repository
//!
//! Database operations for the booking ledger.
//!
//! ## Key Operations
//! - Slot-conflict probe against *active* bookings (pending, confirmed,
//!   seated); terminal bookings never block a slot
//! - Insert guarded by the `idx_reservations_active_slot` partial unique
//!   index, so two racing inserts for the same slot resolve to exactly one
//!   winner inside SQLite
//! - `set_status_with_table` writes the reservation row and its table's
//!   occupancy status in one transaction
//! - Hydrated views that join in the guest's name/phone and the table number

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use mesa_core::{NewReservation, Reservation, ReservationStatus, ReservationView, TableStatus};

/// Repository for reservation ledger operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ReservationRepository::new(pool);
///
/// if repo.has_active_conflict(table_id, date, time).await? {
///     // slot already claimed
/// }
/// let reservation = repo.insert(&new_reservation).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: SqlitePool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReservationRepository { pool }
    }

    /// Inserts a new reservation. New reservations always start `pending`.
    ///
    /// Runs as a single auto-commit INSERT so the partial unique index on
    /// active (table, date, time) slots is the arbiter under concurrency.
    ///
    /// ## Errors
    /// - [`DbError::UniqueViolation`] if an active reservation already holds
    ///   the slot
    /// - [`DbError::ForeignKeyViolation`] if the user or table id is unknown
    pub async fn insert(&self, new: &NewReservation) -> DbResult<Reservation> {
        let now = Utc::now();

        debug!(
            user_id = new.user_id,
            table_id = new.table_id,
            date = %new.reservation_date,
            time = %new.reservation_time,
            "Inserting reservation"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO reservations (
                user_id, table_id, reservation_date, reservation_time,
                guests, status, special_requests, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(new.user_id)
        .bind(new.table_id)
        .bind(new.reservation_date)
        .bind(new.reservation_time)
        .bind(new.guests)
        .bind(ReservationStatus::Pending)
        .bind(new.special_requests.as_deref())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Reservation {
            id: result.last_insert_rowid(),
            user_id: new.user_id,
            table_id: new.table_id,
            reservation_date: new.reservation_date,
            reservation_time: new.reservation_time,
            guests: new.guests,
            status: ReservationStatus::Pending,
            special_requests: new.special_requests.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets a reservation row by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT id, user_id, table_id, reservation_date, reservation_time,
                   guests, status, special_requests, created_at, updated_at
            FROM reservations
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    /// Gets a hydrated view of one reservation (guest name/phone, table number).
    pub async fn view_by_id(&self, id: i64) -> DbResult<Option<ReservationView>> {
        let view = sqlx::query_as::<_, ReservationView>(
            r#"
            SELECT r.id, r.user_id, u.full_name AS user_name, u.phone AS user_phone,
                   r.table_id, t.table_number, r.reservation_date, r.reservation_time,
                   r.guests, r.status, r.special_requests
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            JOIN restaurant_tables t ON t.id = r.table_id
            WHERE r.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(view)
    }

    /// Checks whether an *active* reservation (pending, confirmed, seated)
    /// already claims this exact (table, date, time) slot.
    ///
    /// Advisory only: the partial unique index is what actually decides a
    /// race. This exists so sequential callers get a domain error instead of
    /// a constraint violation.
    pub async fn has_active_conflict(
        &self,
        table_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> DbResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservations
                WHERE table_id = ?1
                  AND reservation_date = ?2
                  AND reservation_time = ?3
                  AND status IN ('pending', 'confirmed', 'seated')
            )
            "#,
        )
        .bind(table_id)
        .bind(date)
        .bind(time)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Lists every reservation as a hydrated view, oldest booking first.
    pub async fn list_all_views(&self) -> DbResult<Vec<ReservationView>> {
        let views = sqlx::query_as::<_, ReservationView>(
            r#"
            SELECT r.id, r.user_id, u.full_name AS user_name, u.phone AS user_phone,
                   r.table_id, t.table_number, r.reservation_date, r.reservation_time,
                   r.guests, r.status, r.special_requests
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            JOIN restaurant_tables t ON t.id = r.table_id
            ORDER BY r.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    /// Lists one guest's reservations, oldest booking first.
    pub async fn list_views_by_user(&self, user_id: i64) -> DbResult<Vec<ReservationView>> {
        let views = sqlx::query_as::<_, ReservationView>(
            r#"
            SELECT r.id, r.user_id, u.full_name AS user_name, u.phone AS user_phone,
                   r.table_id, t.table_number, r.reservation_date, r.reservation_time,
                   r.guests, r.status, r.special_requests
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            JOIN restaurant_tables t ON t.id = r.table_id
            WHERE r.user_id = ?1
            ORDER BY r.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    /// Lists all reservations on one calendar date.
    pub async fn list_views_by_date(&self, date: NaiveDate) -> DbResult<Vec<ReservationView>> {
        let views = sqlx::query_as::<_, ReservationView>(
            r#"
            SELECT r.id, r.user_id, u.full_name AS user_name, u.phone AS user_phone,
                   r.table_id, t.table_number, r.reservation_date, r.reservation_time,
                   r.guests, r.status, r.special_requests
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            JOIN restaurant_tables t ON t.id = r.table_id
            WHERE r.reservation_date = ?1
            ORDER BY r.id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    /// Lists reservations on one date carrying one status (the host stand's
    /// "today's confirmed" board).
    pub async fn list_views_by_date_and_status(
        &self,
        date: NaiveDate,
        status: ReservationStatus,
    ) -> DbResult<Vec<ReservationView>> {
        let views = sqlx::query_as::<_, ReservationView>(
            r#"
            SELECT r.id, r.user_id, u.full_name AS user_name, u.phone AS user_phone,
                   r.table_id, t.table_number, r.reservation_date, r.reservation_time,
                   r.guests, r.status, r.special_requests
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            JOIN restaurant_tables t ON t.id = r.table_id
            WHERE r.reservation_date = ?1 AND r.status = ?2
            ORDER BY r.id
            "#,
        )
        .bind(date)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    /// Lists reservations with dates in `[start, end]` inclusive, in service
    /// order (date, then time).
    pub async fn list_views_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<ReservationView>> {
        let views = sqlx::query_as::<_, ReservationView>(
            r#"
            SELECT r.id, r.user_id, u.full_name AS user_name, u.phone AS user_phone,
                   r.table_id, t.table_number, r.reservation_date, r.reservation_time,
                   r.guests, r.status, r.special_requests
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            JOIN restaurant_tables t ON t.id = r.table_id
            WHERE r.reservation_date BETWEEN ?1 AND ?2
            ORDER BY r.reservation_date, r.reservation_time
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    /// Sets a reservation's status, optionally flipping its table's occupancy
    /// status in the same transaction.
    ///
    /// Both writes land or neither does. The first statement is the UPDATE
    /// so the transaction takes its write lock immediately instead of
    /// upgrading from a read lock mid-flight.
    ///
    /// ## Errors
    /// [`DbError::NotFound`] if the reservation or the table row is missing;
    /// the transaction is rolled back.
    pub async fn set_status_with_table(
        &self,
        id: i64,
        status: ReservationStatus,
        table_change: Option<(i64, TableStatus)>,
    ) -> DbResult<()> {
        let now = Utc::now();

        debug!(id = id, status = ?status, "Setting reservation status");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE reservations SET status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let _ = tx.rollback().await;
            return Err(DbError::not_found("Reservation", id.to_string()));
        }

        if let Some((table_id, table_status)) = table_change {
            let result = sqlx::query(
                "UPDATE restaurant_tables SET status = ?2, updated_at = ?3 WHERE id = ?1",
            )
            .bind(table_id)
            .bind(table_status)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Foreign keys make this unreachable unless the registry and
                // ledger have drifted out of sync.
                warn!(
                    reservation_id = id,
                    table_id = table_id,
                    "Table row missing during coupled status write, rolling back"
                );
                let _ = tx.rollback().await;
                return Err(DbError::not_found("Table", table_id.to_string()));
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Hard-deletes a reservation from the ledger.
    ///
    /// ## Errors
    /// [`DbError::NotFound`] if the id doesn't exist.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Reservation", id.to_string()));
        }

        Ok(())
    }

    /// Counts all reservations in the ledger.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reservations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{NaiveDate, NaiveTime};
    use mesa_core::{NewTable, TableLocation};
    use tokio::task::JoinSet;
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_user(db: &Database) -> i64 {
        db.users().insert("Dana Reyes", "555-0101").await.unwrap().id
    }

    async fn seed_table(db: &Database, number: i32, capacity: i32) -> i64 {
        db.tables()
            .insert(&NewTable {
                table_number: number,
                capacity,
                location: TableLocation::Indoor,
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, min, 0).unwrap()
    }

    fn booking(user_id: i64, table_id: i64) -> NewReservation {
        NewReservation {
            user_id,
            table_id,
            reservation_date: date(2026, 3, 1),
            reservation_time: time(19, 0),
            guests: 2,
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;
        let repo = db.reservations();

        let reservation = repo.insert(&booking(user_id, table_id)).await.unwrap();
        assert_eq!(reservation.status, ReservationStatus::Pending);

        let fetched = repo.get_by_id(reservation.id).await.unwrap().unwrap();
        assert_eq!(fetched.reservation_date, date(2026, 3, 1));
        assert_eq!(fetched.reservation_time, time(19, 0));
        assert_eq!(fetched.guests, 2);
    }

    #[tokio::test]
    async fn test_active_conflict_detection() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;
        let repo = db.reservations();

        repo.insert(&booking(user_id, table_id)).await.unwrap();

        assert!(repo
            .has_active_conflict(table_id, date(2026, 3, 1), time(19, 0))
            .await
            .unwrap());
        // Same table, different time: free.
        assert!(!repo
            .has_active_conflict(table_id, date(2026, 3, 1), time(21, 0))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_terminal_statuses_release_the_slot() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;
        let repo = db.reservations();

        let reservation = repo.insert(&booking(user_id, table_id)).await.unwrap();
        repo.set_status_with_table(reservation.id, ReservationStatus::Cancelled, None)
            .await
            .unwrap();

        assert!(!repo
            .has_active_conflict(table_id, date(2026, 3, 1), time(19, 0))
            .await
            .unwrap());

        // And the slot can be claimed again.
        repo.insert(&booking(user_id, table_id)).await.unwrap();
    }

    #[tokio::test]
    async fn test_double_insert_same_slot_rejected() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;
        let repo = db.reservations();

        repo.insert(&booking(user_id, table_id)).await.unwrap();
        let err = repo.insert(&booking(user_id, table_id)).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_unknown_table_rejected() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let repo = db.reservations();

        let err = repo.insert(&booking(user_id, 9999)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_set_status_with_table_updates_both() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;
        let repo = db.reservations();

        let reservation = repo.insert(&booking(user_id, table_id)).await.unwrap();
        repo.set_status_with_table(
            reservation.id,
            ReservationStatus::Confirmed,
            Some((table_id, TableStatus::Reserved)),
        )
        .await
        .unwrap();

        let fetched = repo.get_by_id(reservation.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, ReservationStatus::Confirmed);

        let table = db.tables().get_by_id(table_id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Reserved);
    }

    #[tokio::test]
    async fn test_set_status_rolls_back_when_table_missing() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;
        let repo = db.reservations();

        let reservation = repo.insert(&booking(user_id, table_id)).await.unwrap();
        let err = repo
            .set_status_with_table(
                reservation.id,
                ReservationStatus::Confirmed,
                Some((9999, TableStatus::Reserved)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // The reservation write must have rolled back with the table write.
        let fetched = repo.get_by_id(reservation.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn test_view_joins_user_and_table() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;
        let repo = db.reservations();

        let reservation = repo.insert(&booking(user_id, table_id)).await.unwrap();
        let view = repo.view_by_id(reservation.id).await.unwrap().unwrap();

        assert_eq!(view.user_name, "Dana Reyes");
        assert_eq!(view.user_phone, "555-0101");
        assert_eq!(view.table_number, 5);
        assert_eq!(view.status, ReservationStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_views_between_service_order() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;
        let repo = db.reservations();

        // Insert out of service order.
        let mut late = booking(user_id, table_id);
        late.reservation_date = date(2026, 3, 2);
        late.reservation_time = time(20, 0);
        repo.insert(&late).await.unwrap();

        let mut early = booking(user_id, table_id);
        early.reservation_date = date(2026, 3, 1);
        early.reservation_time = time(12, 0);
        repo.insert(&early).await.unwrap();

        let mut mid = booking(user_id, table_id);
        mid.reservation_date = date(2026, 3, 1);
        mid.reservation_time = time(19, 0);
        repo.insert(&mid).await.unwrap();

        let views = repo
            .list_views_between(date(2026, 3, 1), date(2026, 3, 2))
            .await
            .unwrap();
        let times: Vec<(NaiveDate, NaiveTime)> = views
            .iter()
            .map(|v| (v.reservation_date, v.reservation_time))
            .collect();
        assert_eq!(
            times,
            vec![
                (date(2026, 3, 1), time(12, 0)),
                (date(2026, 3, 1), time(19, 0)),
                (date(2026, 3, 2), time(20, 0)),
            ]
        );

        // Range is inclusive on both ends; a one-day window keeps day one only.
        let day_one = repo
            .list_views_between(date(2026, 3, 1), date(2026, 3, 1))
            .await
            .unwrap();
        assert_eq!(day_one.len(), 2);
    }

    #[tokio::test]
    async fn test_list_views_by_date_and_status() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;
        let other_table = seed_table(&db, 6, 2).await;
        let repo = db.reservations();

        let confirmed = repo.insert(&booking(user_id, table_id)).await.unwrap();
        repo.set_status_with_table(confirmed.id, ReservationStatus::Confirmed, None)
            .await
            .unwrap();

        // Still pending, same date, different table.
        repo.insert(&booking(user_id, other_table)).await.unwrap();

        let board = repo
            .list_views_by_date_and_status(date(2026, 3, 1), ReservationStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].id, confirmed.id);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;
        let repo = db.reservations();

        let reservation = repo.insert(&booking(user_id, table_id)).await.unwrap();
        repo.delete(reservation.id).await.unwrap();

        assert!(repo.get_by_id(reservation.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(reservation.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_racing_inserts_single_winner() {
        // Raw inserts with no conflict probe beforehand: the partial unique
        // index alone must pick the winner. Needs a file-backed database,
        // since the in-memory config is pinned to one connection.
        let path = std::env::temp_dir().join(format!("mesa-slot-race-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(8))
            .await
            .unwrap();
        let user_id = seed_user(&db).await;
        let table_id = seed_table(&db, 5, 4).await;

        let mut set = JoinSet::new();
        for _ in 0..8 {
            let repo = db.reservations();
            let new = booking(user_id, table_id);
            set.spawn(async move { repo.insert(&new).await });
        }

        let mut winners = 0;
        let mut rejected = 0;
        while let Some(joined) = set.join_next().await {
            match joined.unwrap() {
                Ok(_) => winners += 1,
                Err(DbError::UniqueViolation { .. }) => rejected += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(rejected, 7);
        assert_eq!(db.reservations().count().await.unwrap(), 1);

        db.close().await;
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(path.with_extension("db-wal"));
        let _ = std::fs::remove_file(path.with_extension("db-shm"));
    }
}
