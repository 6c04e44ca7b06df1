//! # Reservation Service
//!
//! The lifecycle engine: booking creation, the status state machine with its
//! table side effects, cancellation, administrative deletes, and the read
//! queries. The only component that changes table occupancy as a consequence
//! of reservation state.
//!
//! ## Access Matrix
//! ```text
//! operation                ADMIN   STAFF   CUSTOMER
//! ─────────────────────────────────────────────────────────────
//! create                   anyone  anyone  own user id only
//! change_status            yes     yes     no
//! cancel                   any     any     own only
//! delete                   yes     no      no
//! get                      any     any     own only
//! list_all                 all     all     degrades to own rows
//! list_by_user             yes     yes     no
//! list_by_date / between   yes     yes     no
//! list_today_confirmed     yes     yes     no
//! is_table_available       public, takes no auth context
//! ```
//!
//! ## State Machine
//! Any target status may be set from any current status; the *target* alone
//! decides the table write (see [`ReservationStatus::table_side_effect`]).
//! A reservation starts PENDING and does not claim its table until confirmed.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime};
use tracing::info;

use mesa_core::validation::{validate_guests, validate_special_requests};
use mesa_core::{
    AuthContext, CoreError, NewReservation, Reservation, ReservationStatus, ReservationView,
};
use mesa_db::{Database, DbError};

use crate::error::{EngineError, EngineResult};
use crate::events::{ReservationEvent, ReservationNotifier};

/// Orchestrates the reservation lifecycle over the ledger and the registry.
#[derive(Clone)]
pub struct ReservationService {
    /// Shared database handle.
    db: Arc<Database>,

    /// Receives lifecycle events after commit.
    notifier: Arc<dyn ReservationNotifier>,
}

impl ReservationService {
    /// Creates a new ReservationService.
    pub fn new(db: Arc<Database>, notifier: Arc<dyn ReservationNotifier>) -> Self {
        ReservationService { db, notifier }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Books a table slot. The reservation starts PENDING and the table's
    /// registry status is untouched until the booking is confirmed.
    ///
    /// Validates in a fixed order, first failure wins: request shape, user
    /// exists, table exists, date not in the past, party fits the table, slot
    /// free.
    ///
    /// ## Errors
    /// - [`CoreError::Forbidden`] if a customer books for another user id
    /// - [`CoreError::Validation`] for non-positive guests or over-long text
    /// - [`CoreError::UserNotFound`] / [`CoreError::TableNotFound`]
    /// - [`CoreError::PastDate`] if the date precedes today
    /// - [`CoreError::CapacityExceeded`] if the party is larger than the table
    /// - [`CoreError::SlotConflict`] if an active reservation holds the slot,
    ///   including when a concurrent create wins the race for it
    pub async fn create(
        &self,
        ctx: &AuthContext,
        new: NewReservation,
    ) -> EngineResult<ReservationView> {
        if !ctx.can_act_for(new.user_id) {
            return Err(CoreError::forbidden(ctx, "book for another guest").into());
        }

        validate_guests(new.guests)?;
        validate_special_requests(new.special_requests.as_deref())?;

        if !self.db.users().exists(new.user_id).await? {
            return Err(CoreError::UserNotFound(new.user_id).into());
        }

        let table = self
            .db
            .tables()
            .get_by_id(new.table_id)
            .await?
            .ok_or(CoreError::TableNotFound(new.table_id))?;

        let today = Local::now().date_naive();
        if new.reservation_date < today {
            return Err(CoreError::PastDate {
                date: new.reservation_date,
            }
            .into());
        }

        if !table.can_seat(new.guests) {
            return Err(CoreError::CapacityExceeded {
                table_number: table.table_number,
                capacity: table.capacity,
                requested: new.guests,
            }
            .into());
        }

        if self
            .db
            .reservations()
            .has_active_conflict(new.table_id, new.reservation_date, new.reservation_time)
            .await?
        {
            return Err(slot_conflict(&new));
        }

        // The probe above can race a concurrent create. The ledger's partial
        // unique index picks the winner; the loser's insert comes back as a
        // unique violation and surfaces as the same conflict.
        let reservation = match self.db.reservations().insert(&new).await {
            Ok(reservation) => reservation,
            Err(DbError::UniqueViolation { .. }) => return Err(slot_conflict(&new)),
            Err(e) => return Err(e.into()),
        };

        let view = self.view(reservation.id).await?;

        info!(
            id = reservation.id,
            user_id = new.user_id,
            table_number = view.table_number,
            date = %new.reservation_date,
            time = %new.reservation_time,
            guests = new.guests,
            "Reservation created"
        );
        self.notifier.notify(&ReservationEvent::created(&view));

        Ok(view)
    }

    /// Moves a reservation to `status` and applies the table side effect in
    /// the same transaction. ADMIN/STAFF only.
    ///
    /// ## Errors
    /// - [`CoreError::Forbidden`] for customers
    /// - [`CoreError::ReservationNotFound`] for an unknown id
    pub async fn change_status(
        &self,
        ctx: &AuthContext,
        id: i64,
        status: ReservationStatus,
    ) -> EngineResult<ReservationView> {
        if !ctx.is_staff() {
            return Err(CoreError::forbidden(ctx, "change a reservation's status").into());
        }

        let reservation = self
            .db
            .reservations()
            .get_by_id(id)
            .await?
            .ok_or(CoreError::ReservationNotFound(id))?;

        self.apply_status(&reservation, status).await
    }

    /// Cancels a reservation: status CANCELLED, table released to AVAILABLE.
    ///
    /// Staff cancel anyone's booking; a customer only their own.
    pub async fn cancel(&self, ctx: &AuthContext, id: i64) -> EngineResult<ReservationView> {
        let reservation = self
            .db
            .reservations()
            .get_by_id(id)
            .await?
            .ok_or(CoreError::ReservationNotFound(id))?;

        if !ctx.can_act_for(reservation.user_id) {
            return Err(CoreError::forbidden(ctx, "cancel another guest's reservation").into());
        }

        self.apply_status(&reservation, ReservationStatus::Cancelled)
            .await
    }

    /// Hard-deletes a reservation from the ledger. ADMIN only.
    ///
    /// This is an administrative override outside the state machine: it does
    /// not write the table's status. It does free the slot, since the row
    /// backing the conflict check is gone.
    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> EngineResult<()> {
        if !ctx.is_admin() {
            return Err(CoreError::forbidden(ctx, "delete a reservation").into());
        }

        match self.db.reservations().delete(id).await {
            Ok(()) => {
                info!(id = id, "Reservation deleted");
                Ok(())
            }
            Err(DbError::NotFound { .. }) => Err(CoreError::ReservationNotFound(id).into()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Gets one reservation view. Customers may only read their own.
    pub async fn get(&self, ctx: &AuthContext, id: i64) -> EngineResult<ReservationView> {
        let view = self.view(id).await?;

        if !ctx.can_act_for(view.user_id) {
            return Err(CoreError::forbidden(ctx, "view another guest's reservation").into());
        }

        Ok(view)
    }

    /// Lists reservations: all of them for staff, the caller's own rows for
    /// customers.
    pub async fn list_all(&self, ctx: &AuthContext) -> EngineResult<Vec<ReservationView>> {
        if ctx.is_staff() {
            Ok(self.db.reservations().list_all_views().await?)
        } else {
            Ok(self
                .db
                .reservations()
                .list_views_by_user(ctx.user_id)
                .await?)
        }
    }

    /// Lists one guest's reservations. ADMIN/STAFF only.
    pub async fn list_by_user(
        &self,
        ctx: &AuthContext,
        user_id: i64,
    ) -> EngineResult<Vec<ReservationView>> {
        if !ctx.is_staff() {
            return Err(CoreError::forbidden(ctx, "list another guest's reservations").into());
        }

        Ok(self.db.reservations().list_views_by_user(user_id).await?)
    }

    /// Lists all reservations on a date. ADMIN/STAFF only.
    pub async fn list_by_date(
        &self,
        ctx: &AuthContext,
        date: NaiveDate,
    ) -> EngineResult<Vec<ReservationView>> {
        if !ctx.is_staff() {
            return Err(CoreError::forbidden(ctx, "list reservations by date").into());
        }

        Ok(self.db.reservations().list_views_by_date(date).await?)
    }

    /// Lists reservations with dates in `[start, end]` inclusive, ordered by
    /// date then time. ADMIN/STAFF only.
    pub async fn list_between(
        &self,
        ctx: &AuthContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<ReservationView>> {
        if !ctx.is_staff() {
            return Err(CoreError::forbidden(ctx, "list reservations by date range").into());
        }

        Ok(self
            .db
            .reservations()
            .list_views_between(start, end)
            .await?)
    }

    /// The host stand's board: today's CONFIRMED reservations. ADMIN/STAFF
    /// only.
    pub async fn list_today_confirmed(
        &self,
        ctx: &AuthContext,
    ) -> EngineResult<Vec<ReservationView>> {
        if !ctx.is_staff() {
            return Err(CoreError::forbidden(ctx, "read the service board").into());
        }

        let today = Local::now().date_naive();
        Ok(self
            .db
            .reservations()
            .list_views_by_date_and_status(today, ReservationStatus::Confirmed)
            .await?)
    }

    /// Whether a slot is free: no active reservation holds this exact
    /// (table, date, time). Public, no auth context.
    ///
    /// ## Errors
    /// [`CoreError::TableNotFound`] if the table id is unknown.
    pub async fn is_table_available(
        &self,
        table_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> EngineResult<bool> {
        if self.db.tables().get_by_id(table_id).await?.is_none() {
            return Err(CoreError::TableNotFound(table_id).into());
        }

        Ok(!self
            .db
            .reservations()
            .has_active_conflict(table_id, date, time)
            .await?)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Writes the target status plus its table side effect, then emits the
    /// event. Authorization is the caller's responsibility.
    async fn apply_status(
        &self,
        reservation: &Reservation,
        status: ReservationStatus,
    ) -> EngineResult<ReservationView> {
        let table_change = status
            .table_side_effect()
            .map(|table_status| (reservation.table_id, table_status));

        self.db
            .reservations()
            .set_status_with_table(reservation.id, status, table_change)
            .await?;

        let view = self.view(reservation.id).await?;

        info!(
            id = reservation.id,
            from = ?reservation.status,
            to = ?status,
            table_id = reservation.table_id,
            "Reservation status changed"
        );
        self.notifier.notify(&ReservationEvent::status_changed(&view));

        Ok(view)
    }

    /// Fetches the hydrated view or reports the id as unknown.
    async fn view(&self, id: i64) -> EngineResult<ReservationView> {
        self.db
            .reservations()
            .view_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ReservationNotFound(id).into())
    }
}

fn slot_conflict(new: &NewReservation) -> EngineError {
    CoreError::SlotConflict {
        table_id: new.table_id,
        date: new.reservation_date,
        time: new.reservation_time,
    }
    .into()
}

// =============================================================================
// Tests
// =============================================================================
