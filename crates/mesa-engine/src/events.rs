//! # Lifecycle Events
//!
//! Event payloads the engine emits after a reservation is created or moved
//! through its state machine, and the seam a notification dispatcher plugs
//! into.
//!
//! The payload is self-contained: guest name and phone, table number, slot,
//! party size, current status. A dispatcher can render "Your table 5 for 4
//! guests on 2026-09-12 at 19:00 is confirmed" without any further lookups.
//! Delivery (SMS, email, push) is entirely the dispatcher's concern.

use serde::{Deserialize, Serialize};
use tracing::info;

use chrono::{NaiveDate, NaiveTime};
use mesa_core::{ReservationStatus, ReservationView};

// =============================================================================
// Event Payloads
// =============================================================================

/// What happened to the reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationEventKind {
    /// A new reservation was written to the ledger (status PENDING).
    Created,
    /// An existing reservation moved to a new status.
    StatusChanged,
}

/// A reservation lifecycle event, emitted after the storage commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationEvent {
    /// Created or StatusChanged.
    pub kind: ReservationEventKind,

    /// Ledger id of the reservation.
    pub reservation_id: i64,

    /// Guest display name.
    pub user_name: String,

    /// Guest phone number.
    pub user_phone: String,

    /// Business table number (the one printed on the table).
    pub table_number: i32,

    /// Reserved calendar date.
    pub date: NaiveDate,

    /// Reserved time of day.
    pub time: NaiveTime,

    /// Party size.
    pub guests: i32,

    /// Status after the operation that emitted this event.
    pub status: ReservationStatus,
}

impl ReservationEvent {
    /// Builds a `Created` event from a freshly inserted reservation's view.
    pub fn created(view: &ReservationView) -> Self {
        Self::from_view(ReservationEventKind::Created, view)
    }

    /// Builds a `StatusChanged` event from the post-transition view.
    pub fn status_changed(view: &ReservationView) -> Self {
        Self::from_view(ReservationEventKind::StatusChanged, view)
    }

    fn from_view(kind: ReservationEventKind, view: &ReservationView) -> Self {
        ReservationEvent {
            kind,
            reservation_id: view.id,
            user_name: view.user_name.clone(),
            user_phone: view.user_phone.clone(),
            table_number: view.table_number,
            date: view.reservation_date,
            time: view.reservation_time,
            guests: view.guests,
            status: view.status,
        }
    }
}

// =============================================================================
// Notifier Seam
// =============================================================================

/// Receives lifecycle events after they are committed.
///
/// The engine calls this inline on the request path, fire-and-forget: there
/// is no return channel, and a notifier can never fail the operation that
/// emitted the event. Implementations must return promptly; anything slow
/// (network delivery, retries) belongs on a queue the implementation owns.
pub trait ReservationNotifier: Send + Sync {
    /// Handles one committed lifecycle event.
    fn notify(&self, event: &ReservationEvent);
}

/// Notifier that writes events to the log and nothing else.
///
/// The default wiring for development and for deployments where delivery is
/// handled by tailing structured logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ReservationNotifier for LogNotifier {
    fn notify(&self, event: &ReservationEvent) {
        info!(
            kind = ?event.kind,
            reservation_id = event.reservation_id,
            user_name = %event.user_name,
            table_number = event.table_number,
            date = %event.date,
            time = %event.time,
            guests = event.guests,
            status = ?event.status,
            "Reservation event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn view() -> ReservationView {
        ReservationView {
            id: 12,
            user_id: 3,
            user_name: "Ava Thompson".to_string(),
            user_phone: "555-0101".to_string(),
            table_id: 5,
            table_number: 7,
            reservation_date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
            reservation_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            guests: 4,
            status: ReservationStatus::Confirmed,
            special_requests: None,
        }
    }

    #[test]
    fn test_event_from_view() {
        let event = ReservationEvent::status_changed(&view());

        assert_eq!(event.kind, ReservationEventKind::StatusChanged);
        assert_eq!(event.reservation_id, 12);
        assert_eq!(event.user_name, "Ava Thompson");
        assert_eq!(event.table_number, 7);
        assert_eq!(event.status, ReservationStatus::Confirmed);
    }

    #[test]
    fn test_log_notifier_is_fire_and_forget() {
        let event = ReservationEvent::created(&view());
        LogNotifier.notify(&event);
    }
}
