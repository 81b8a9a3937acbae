//! Booking models and lifecycle

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnitStatus;

/// A guest's stay in a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub property_id: Uuid,
    pub unit_id: Uuid,
    pub check_in_date: NaiveDate,
    /// Planned until checkout; overwritten with the actual checkout date
    pub check_out_date: NaiveDate,
    pub number_of_guests: i32,
    pub total_amount: Decimal,
    pub source: Option<String>,
    pub purpose: Option<String>,
    pub payment_method: Option<String>,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Reserved,
    CheckedIn,
    CheckedOut,
    Cancelled,
    Confirmed,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Reserved => "reserved",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "reserved" => Some(BookingStatus::Reserved),
            "checked_in" => Some(BookingStatus::CheckedIn),
            "checked_out" => Some(BookingStatus::CheckedOut),
            "cancelled" => Some(BookingStatus::Cancelled),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    /// Statuses that hold a unit against other bookings for the same
    /// check-in day
    pub fn blocks_unit(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Reserved | BookingStatus::CheckedIn
        )
    }

    /// Whether a direct status update from `self` to `next` is allowed.
    ///
    /// `CheckedIn -> CheckedOut` is normally driven by the checkout
    /// transaction; it is also permitted here so a booking can be closed
    /// administratively without an inspection.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match self {
            Pending => matches!(next, Reserved | Confirmed | Cancelled),
            Reserved => matches!(next, Confirmed | CheckedIn | Cancelled),
            Confirmed => matches!(next, CheckedIn | Cancelled),
            CheckedIn => matches!(next, CheckedOut),
            CheckedOut => matches!(next, Completed),
            Cancelled => false,
            Completed => false,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "Pending"),
            BookingStatus::Reserved => write!(f, "Reserved"),
            BookingStatus::CheckedIn => write!(f, "Checked In"),
            BookingStatus::CheckedOut => write!(f, "Checked Out"),
            BookingStatus::Cancelled => write!(f, "Cancelled"),
            BookingStatus::Confirmed => write!(f, "Confirmed"),
            BookingStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Unit status implied by a booking's current status.
///
/// Total over `BookingStatus`; `UnitStatus::Maintenance` is never produced
/// here, it is only ever set manually.
pub fn unit_status_for_booking(status: BookingStatus) -> UnitStatus {
    match status {
        BookingStatus::Pending => UnitStatus::Booked,
        BookingStatus::Confirmed => UnitStatus::Booked,
        BookingStatus::Reserved => UnitStatus::Reserved,
        BookingStatus::CheckedIn => UnitStatus::Occupied,
        BookingStatus::CheckedOut => UnitStatus::Available,
        BookingStatus::Cancelled => UnitStatus::Available,
        BookingStatus::Completed => UnitStatus::Available,
    }
}

/// Booking projection with guest/property/unit names for list pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSummary {
    pub id: Uuid,
    pub guest_id: Uuid,
    pub guest_name: String,
    pub property_id: Uuid,
    pub property_name: String,
    pub unit_id: Uuid,
    pub unit_name: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub number_of_guests: i32,
    pub total_amount: Decimal,
    pub status: BookingStatus,
}
