//! Checkout report models and the checkout wire contract

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BookingSummary, ItemCondition};

/// The record of one guest's move-out inspection event.
///
/// Created exactly once per checkout and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutReport {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub guest_id: Uuid,
    pub checkout_date: NaiveDate,
    pub inspector: String,
    pub total_damage_cost: Decimal,
    pub deposit_deduction: Decimal,
    pub notes: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// Status of a checkout report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Completed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(ReportStatus::Completed),
            _ => None,
        }
    }
}

/// One inventory line within a checkout report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub id: Uuid,
    pub report_id: Uuid,
    pub assignment_id: Uuid,
    pub condition: ItemCondition,
    pub damage_cost: Decimal,
    pub notes: Option<String>,
}

/// Wire contract for completing a checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteCheckoutInput {
    pub booking_id: Uuid,
    /// Must match the booking's stored guest; rejected otherwise
    pub guest_id: Uuid,
    /// Actual checkout date; overwrites the booking's planned date
    pub checkout_date: NaiveDate,
    pub inspector: String,
    pub deposit_deduction: Decimal,
    pub notes: Option<String>,
    /// Only assignments the inspector checked; unchecked assignments stay
    /// active at the unit
    pub checkout_items: Vec<CheckoutItemInput>,
}

/// One checked assignment in a checkout submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItemInput {
    pub assignment_id: Uuid,
    pub condition: ItemCondition,
    pub damage_cost: Decimal,
    pub notes: Option<String>,
}

/// Sum of damage costs across inspected items.
///
/// Items returning to stock contribute nothing; the wizard forces their cost
/// back to zero when the condition is switched to good.
pub fn total_damage_cost(items: &[CheckoutItemInput]) -> Decimal {
    items
        .iter()
        .filter(|item| !item.condition.restocks())
        .map(|item| item.damage_cost)
        .sum()
}

/// Ledger note for the movement recorded by a checked item.
///
/// Damaged/missing movements echo the cost into the note text so the ledger
/// stays readable on its own; the structured cost column is authoritative.
pub fn movement_note(item: &CheckoutItemInput) -> Option<String> {
    if item.condition.restocks() {
        return item.notes.clone();
    }
    let mut note = format!("{} at checkout, cost {}", item.condition, item.damage_cost);
    if let Some(extra) = item.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        note.push_str(": ");
        note.push_str(extra.trim());
    }
    Some(note)
}

/// A checkout report with its line items and booking projection for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutReportDetail {
    pub report: CheckoutReport,
    pub items: Vec<CheckoutItem>,
    pub booking: BookingSummary,
}
