//! # Domain Types
//!
//! Core domain types used throughout Mesa.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ RestaurantTable │   │   Reservation   │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  table_number   │   │  user_id (FK)   │   │  full_name      │       │
//! │  │  capacity       │   │  table_id (FK)  │   │  phone          │       │
//! │  │  location       │   │  date + time    │   └─────────────────┘       │
//! │  │  status         │   │  guests         │                             │
//! │  └─────────────────┘   │  status         │   ┌─────────────────┐       │
//! │                        └─────────────────┘   │ ReservationView │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │  (join of all   │       │
//! │  │   TableStatus   │   │ReservationStatus│   │   three, for    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │   the boundary) │       │
//! │  │  Available      │   │  Pending        │   └─────────────────┘       │
//! │  │  Occupied       │   │  Confirmed      │                             │
//! │  │  Reserved       │   │  Seated ...     │                             │
//! │  │  Maintenance    │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Tables carry two identifiers:
//! - `id`: storage-assigned integer, used for relations
//! - `table_number`: the number printed on the physical table (unique,
//!   human-facing, potentially renumbered)

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Reservation Status
// =============================================================================

/// The status of a reservation as it moves through its lifecycle.
///
/// ## State Machine
/// ```text
///            ┌──────────► Confirmed ──────────► Seated ─────► Completed
///            │                │                    │
///  Pending ──┤                │                    │
///            │                ▼                    ▼
///            └──────────► Cancelled            No-show
/// ```
/// The diagram shows the *expected* flow. The engine accepts any target
/// status from any current status (staff can, e.g., revive a cancelled
/// booking); only the **target** status drives the table side effect, see
/// [`table_side_effect`].
///
/// [`table_side_effect`]: ReservationStatus::table_side_effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Requested but not yet confirmed by staff. Holds the slot.
    Pending,
    /// Confirmed by staff. Holds the slot and claims the table.
    Confirmed,
    /// Party has arrived and is seated.
    Seated,
    /// Party has left; the booking ran its course.
    Completed,
    /// Withdrawn by the guest or by staff.
    Cancelled,
    /// Party never arrived.
    NoShow,
}

impl ReservationStatus {
    /// Whether this status occupies its (table, date, time) slot.
    ///
    /// Active reservations are what the availability check counts; terminal
    /// ones free the slot for rebooking.
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pending | ReservationStatus::Confirmed | ReservationStatus::Seated
        )
    }

    /// The table-status write that must accompany a transition **to** this
    /// status, if any.
    ///
    /// | target | table side effect |
    /// |---|---|
    /// | `Confirmed` | table → `Reserved` |
    /// | `Seated` | table → `Occupied` |
    /// | `Cancelled` / `Completed` / `NoShow` | table → `Available` |
    /// | `Pending` | none |
    pub const fn table_side_effect(&self) -> Option<TableStatus> {
        match self {
            ReservationStatus::Confirmed => Some(TableStatus::Reserved),
            ReservationStatus::Seated => Some(TableStatus::Occupied),
            ReservationStatus::Cancelled
            | ReservationStatus::Completed
            | ReservationStatus::NoShow => Some(TableStatus::Available),
            ReservationStatus::Pending => None,
        }
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        ReservationStatus::Pending
    }
}

// =============================================================================
// Table Status
// =============================================================================

/// The physical occupancy state of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Free to be claimed by a reservation or walk-in.
    Available,
    /// A seated party is at the table.
    Occupied,
    /// Claimed by a confirmed reservation; party not yet arrived.
    Reserved,
    /// Taken out of service by staff.
    Maintenance,
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Available
    }
}

// =============================================================================
// Table Location
// =============================================================================

/// Where the table sits on the floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum TableLocation {
    Indoor,
    Outdoor,
    Window,
    Vip,
}

impl Default for TableLocation {
    fn default() -> Self {
        TableLocation::Indoor
    }
}

// =============================================================================
// Restaurant Table
// =============================================================================

/// A physical table in the restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RestaurantTable {
    /// Storage-assigned identifier.
    pub id: i64,

    /// The number printed on the table. Unique across the floor plan.
    pub table_number: i32,

    /// How many guests the table seats.
    pub capacity: i32,

    /// Floor-plan location.
    pub location: TableLocation,

    /// Current occupancy state. Mutated by the reservation lifecycle as a
    /// side effect of status transitions, or directly by staff.
    pub status: TableStatus,

    /// Optional free-text note ("corner booth, wheelchair accessible").
    pub description: Option<String>,

    /// When the table was added to the registry.
    pub created_at: DateTime<Utc>,

    /// When the table row was last written.
    pub updated_at: DateTime<Utc>,
}

impl RestaurantTable {
    /// Checks whether a party of `guests` fits at this table.
    ///
    /// Capacity is the only criterion; occupancy and conflicts are checked
    /// separately by the reservation engine.
    #[inline]
    pub const fn can_seat(&self, guests: i32) -> bool {
        guests <= self.capacity
    }
}

/// Payload for adding a table to the registry.
///
/// New tables always start with status [`TableStatus::Available`]; the
/// registry assigns `id` and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTable {
    pub table_number: i32,
    pub capacity: i32,
    #[serde(default)]
    pub location: TableLocation,
    #[serde(default)]
    pub description: Option<String>,
}

/// Full-row update payload for a table.
///
/// Every field is written; callers fetch the current row first if they want
/// to change a single field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableUpdate {
    pub table_number: i32,
    pub capacity: i32,
    pub location: TableLocation,
    pub status: TableStatus,
    pub description: Option<String>,
}

// =============================================================================
// Reservation
// =============================================================================

/// A booking for one table at one exact date/time slot.
///
/// There is no duration: the slot is the (table, date, time) triple itself,
/// and conflicts are decided on exact equality of that triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Reservation {
    /// Storage-assigned identifier.
    pub id: i64,

    /// The guest the booking belongs to.
    pub user_id: i64,

    /// The table being claimed.
    pub table_id: i64,

    /// Calendar date of the booking (no timezone).
    pub reservation_date: NaiveDate,

    /// Wall-clock time of the booking (no timezone, no duration).
    pub reservation_time: NaiveTime,

    /// Size of the party. Positive, at most the table's capacity at
    /// creation time.
    pub guests: i32,

    /// Lifecycle status. New reservations always start [`ReservationStatus::Pending`].
    pub status: ReservationStatus,

    /// Optional free-text request ("birthday, window seat please").
    pub special_requests: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Whether this reservation currently occupies its slot.
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Payload for creating a reservation.
///
/// The engine validates it, stamps status/timestamps, and the ledger assigns
/// the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub user_id: i64,
    pub table_id: i64,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub guests: i32,
    #[serde(default)]
    pub special_requests: Option<String>,
}

// =============================================================================
// Reservation View
// =============================================================================

/// The reservation projection exposed across the service boundary.
///
/// Joins the ledger row with the user directory (display name, phone) and
/// the table registry (table number) so transport layers and notification
/// payloads never need a second lookup. Every read operation returns this
/// same shape; there are no partial views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    pub id: i64,
    pub user_id: i64,
    /// Display name from the user directory.
    pub user_name: String,
    /// Contact phone from the user directory.
    pub user_phone: String,
    pub table_id: i64,
    /// Human-facing table number (not the storage id).
    pub table_number: i32,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub guests: i32,
    pub status: ReservationStatus,
    pub special_requests: Option<String>,
}

// =============================================================================
// User (directory projection)
// =============================================================================

/// A guest as seen by the reservation engine.
///
/// Identity, credentials, and roles live with the identity provider; this is
/// only the read-side projection needed to attribute and render bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Authorization Context
// =============================================================================

/// The caller's role, as asserted by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including hard deletes and table management.
    Admin,
    /// Front-of-house: manages reservations and table statuses.
    Staff,
    /// A guest: books for themselves, sees only their own reservations.
    Customer,
}

/// The authenticated principal passed into every engine call.
///
/// The identity provider authenticates the caller; the engine receives the
/// result as plain data and enforces role and ownership rules in-process
/// instead of trusting an outer interception layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Directory id of the caller.
    pub user_id: i64,
    /// Caller's role.
    pub role: Role,
}

impl AuthContext {
    pub const fn new(user_id: i64, role: Role) -> Self {
        AuthContext { user_id, role }
    }

    pub const fn admin(user_id: i64) -> Self {
        AuthContext::new(user_id, Role::Admin)
    }

    pub const fn staff(user_id: i64) -> Self {
        AuthContext::new(user_id, Role::Staff)
    }

    pub const fn customer(user_id: i64) -> Self {
        AuthContext::new(user_id, Role::Customer)
    }

    /// Admin or staff: full visibility over every reservation.
    #[inline]
    pub const fn is_staff(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Staff)
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Whether the caller may act on a reservation owned by `user_id`.
    ///
    /// Staff act on anyone's; customers only on their own.
    #[inline]
    pub const fn can_act_for(&self, user_id: i64) -> bool {
        self.is_staff() || self.user_id == user_id
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_status_default() {
        assert_eq!(ReservationStatus::default(), ReservationStatus::Pending);
    }

    #[test]
    fn test_active_statuses() {
        assert!(ReservationStatus::Pending.is_active());
        assert!(ReservationStatus::Confirmed.is_active());
        assert!(ReservationStatus::Seated.is_active());

        assert!(!ReservationStatus::Completed.is_active());
        assert!(!ReservationStatus::Cancelled.is_active());
        assert!(!ReservationStatus::NoShow.is_active());
    }

    #[test]
    fn test_table_side_effects() {
        use ReservationStatus as R;
        use TableStatus as T;

        assert_eq!(R::Confirmed.table_side_effect(), Some(T::Reserved));
        assert_eq!(R::Seated.table_side_effect(), Some(T::Occupied));
        assert_eq!(R::Cancelled.table_side_effect(), Some(T::Available));
        assert_eq!(R::Completed.table_side_effect(), Some(T::Available));
        assert_eq!(R::NoShow.table_side_effect(), Some(T::Available));
        assert_eq!(R::Pending.table_side_effect(), None);
    }

    #[test]
    fn test_table_defaults() {
        assert_eq!(TableStatus::default(), TableStatus::Available);
        assert_eq!(TableLocation::default(), TableLocation::Indoor);
    }

    #[test]
    fn test_can_seat() {
        let table = RestaurantTable {
            id: 1,
            table_number: 5,
            capacity: 4,
            location: TableLocation::Indoor,
            status: TableStatus::Available,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(table.can_seat(1));
        assert!(table.can_seat(4));
        assert!(!table.can_seat(5));
    }

    #[test]
    fn test_view_wire_shape() {
        let view = ReservationView {
            id: 7,
            user_id: 3,
            user_name: "Ava Thompson".to_string(),
            user_phone: "555-0101".to_string(),
            table_id: 2,
            table_number: 5,
            reservation_date: NaiveDate::from_ymd_opt(2099, 6, 15).unwrap(),
            reservation_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            guests: 4,
            status: ReservationStatus::Confirmed,
            special_requests: None,
        };

        // Transport payloads are camelCase with snake_case status values.
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"userId\":3"));
        assert!(json.contains("\"tableNumber\":5"));
        assert!(json.contains("\"reservationDate\":\"2099-06-15\""));
        assert!(json.contains("\"reservationTime\":\"19:00:00\""));
        assert!(json.contains("\"status\":\"confirmed\""));

        let parsed: ReservationView = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, ReservationStatus::Confirmed);
    }

    #[test]
    fn test_auth_context_predicates() {
        let admin = AuthContext::admin(1);
        let staff = AuthContext::staff(2);
        let customer = AuthContext::customer(3);

        assert!(admin.is_staff());
        assert!(admin.is_admin());
        assert!(staff.is_staff());
        assert!(!staff.is_admin());
        assert!(!customer.is_staff());

        // Staff act on anyone's reservation, customers only on their own.
        assert!(staff.can_act_for(99));
        assert!(customer.can_act_for(3));
        assert!(!customer.can_act_for(4));
    }
}
