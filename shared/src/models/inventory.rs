//! Inventory catalogue, assignment and movement models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalogued inventory item template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub item_name: String,
    pub category: String,
    /// Available-in-store count; never negative
    pub quantity: i32,
    pub status: ItemStatus,
    /// Whether instances of this item appear on checkout checklists
    pub assignable_on_booking: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalogue status of an inventory item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active,
    Retired,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Retired => "retired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ItemStatus::Active),
            "retired" => Some(ItemStatus::Retired),
            _ => None,
        }
    }
}

/// An inventory item instance placed at a unit.
///
/// `is_active = true` means the instance is out at the unit and unavailable
/// for re-assignment. Once closed (`returned_at` populated) the record is
/// historical and never reactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryAssignment {
    pub id: Uuid,
    pub inventory_item_id: Uuid,
    pub unit_id: Uuid,
    pub property_id: Uuid,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub assigned_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

/// Append-only ledger entry recording an inventory quantity change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryMovement {
    pub id: Uuid,
    pub inventory_item_id: Uuid,
    pub from_unit_id: Option<Uuid>,
    pub to_unit_id: Option<Uuid>,
    pub moved_by: Uuid,
    pub direction: MovementDirection,
    pub quantity: i32,
    /// Damage/replacement cost for `damaged`/`missing` movements
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
    pub moved_at: DateTime<Utc>,
}

/// Direction of an inventory movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementDirection {
    ToUnit,
    ToStore,
    Damaged,
    Missing,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::ToUnit => "to_unit",
            MovementDirection::ToStore => "to_store",
            MovementDirection::Damaged => "damaged",
            MovementDirection::Missing => "missing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "to_unit" => Some(MovementDirection::ToUnit),
            "to_store" => Some(MovementDirection::ToStore),
            "damaged" => Some(MovementDirection::Damaged),
            "missing" => Some(MovementDirection::Missing),
            _ => None,
        }
    }
}

/// Inspected condition of a checked-out item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    Good,
    Damaged,
    Missing,
}

impl ItemCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCondition::Good => "good",
            ItemCondition::Damaged => "damaged",
            ItemCondition::Missing => "missing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "good" => Some(ItemCondition::Good),
            "damaged" => Some(ItemCondition::Damaged),
            "missing" => Some(ItemCondition::Missing),
        _ => None,
        }
    }

    /// Whether an item inspected in this condition returns to store stock
    pub fn restocks(&self) -> bool {
        matches!(self, ItemCondition::Good)
    }

    /// Ledger direction recorded for an item inspected in this condition
    pub fn movement_direction(&self) -> MovementDirection {
        match self {
            ItemCondition::Good => MovementDirection::ToStore,
            ItemCondition::Damaged => MovementDirection::Damaged,
            ItemCondition::Missing => MovementDirection::Missing,
        }
    }
}

impl std::fmt::Display for ItemCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemCondition::Good => write!(f, "Good"),
            ItemCondition::Damaged => write!(f, "Damaged"),
            ItemCondition::Missing => write!(f, "Missing"),
        }
    }
}

/// Append a note to an assignment's existing notes without overwriting them
pub fn append_assignment_note(existing: Option<&str>, addition: Option<&str>) -> Option<String> {
    match (existing, addition) {
        (Some(existing), Some(addition)) if !addition.trim().is_empty() => {
            Some(format!("{}\n{}", existing, addition.trim()))
        }
        (Some(existing), _) => Some(existing.to_string()),
        (None, Some(addition)) if !addition.trim().is_empty() => Some(addition.trim().to_string()),
        (None, _) => None,
    }
}

/// An eligible assignment as presented on the checkout checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentView {
    pub id: Uuid,
    pub inventory_item_id: Uuid,
    pub item_name: String,
    pub category: String,
    pub item_status: ItemStatus,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
    pub assigned_at: DateTime<Utc>,
}
