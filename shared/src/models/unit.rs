//! Rentable unit models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rentable unit inside a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: Uuid,
    pub property_id: Uuid,
    pub name: String,
    pub unit_type: String,
    pub rent: Decimal,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub max_guests: i32,
    pub status: UnitStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Occupancy status of a unit
///
/// Always a deterministic function of the unit's current booking (see
/// `unit_status_for_booking`), except for `Maintenance`, which is only ever
/// set manually by an operator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Available,
    Occupied,
    Reserved,
    Booked,
    Maintenance,
}

impl UnitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Available => "available",
            UnitStatus::Occupied => "occupied",
            UnitStatus::Reserved => "reserved",
            UnitStatus::Booked => "booked",
            UnitStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(UnitStatus::Available),
            "occupied" => Some(UnitStatus::Occupied),
            "reserved" => Some(UnitStatus::Reserved),
            "booked" => Some(UnitStatus::Booked),
            "maintenance" => Some(UnitStatus::Maintenance),
            _ => None,
        }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitStatus::Available => write!(f, "Available"),
            UnitStatus::Occupied => write!(f, "Occupied"),
            UnitStatus::Reserved => write!(f, "Reserved"),
            UnitStatus::Booked => write!(f, "Booked"),
            UnitStatus::Maintenance => write!(f, "Maintenance"),
        }
    }
}
