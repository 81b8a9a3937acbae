//! WebAssembly module for the Property Rental Management Platform
//!
//! Provides client-side computation for:
//! - The checkout wizard state machine
//! - Damage cost and deposit calculations
//! - Offline validation of checkout submissions

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use shared::models::{AssignmentView, CheckoutItemInput, ItemCondition};
use shared::models::{BookingStatus, CompleteCheckoutInput};

// Re-export shared types for use in JavaScript
pub use shared::models;
pub use shared::types;
pub use shared::validation;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_err(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn parse_uuid(value: &str) -> Result<uuid::Uuid, JsValue> {
    uuid::Uuid::parse_str(value).map_err(|e| js_err(format!("Invalid id: {}", e)))
}

fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}

/// The checkout wizard, driven from JavaScript.
///
/// Checklist entries, payloads and derived summaries cross the boundary as
/// JSON strings.
#[wasm_bindgen]
pub struct CheckoutWizard {
    inner: shared::wizard::CheckoutWizard,
}

#[wasm_bindgen]
impl CheckoutWizard {
    /// Start a wizard from the eligible assignments returned by
    /// `GET /checkout/units/:unit_id/assignments`
    #[wasm_bindgen(constructor)]
    pub fn new(
        booking_id: &str,
        guest_id: &str,
        eligible_json: &str,
    ) -> Result<CheckoutWizard, JsValue> {
        let booking_id = parse_uuid(booking_id)?;
        let guest_id = parse_uuid(guest_id)?;
        let eligible: Vec<AssignmentView> = serde_json::from_str(eligible_json)
            .map_err(|e| js_err(format!("Invalid assignments JSON: {}", e)))?;
        Ok(CheckoutWizard {
            inner: shared::wizard::CheckoutWizard::new(booking_id, guest_id, &eligible),
        })
    }

    /// Current step number (1..3)
    pub fn step(&self) -> u8 {
        self.inner.step().number()
    }

    pub fn set_checkout_date(&mut self, date: &str) -> Result<(), JsValue> {
        let date = date
            .parse()
            .map_err(|e| js_err(format!("Invalid date: {}", e)))?;
        self.inner.set_checkout_date(date);
        Ok(())
    }

    pub fn set_inspector(&mut self, inspector: &str) {
        self.inner.set_inspector(inspector);
    }

    pub fn set_deposit_deduction(&mut self, deposit: f64) {
        self.inner.set_deposit_deduction(decimal_from_f64(deposit));
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.inner.set_notes(notes);
    }

    pub fn set_checked(&mut self, assignment_id: &str, checked: bool) -> Result<(), JsValue> {
        let id = parse_uuid(assignment_id)?;
        self.inner.set_checked(id, checked).map_err(js_err)
    }

    pub fn set_condition(&mut self, assignment_id: &str, condition: &str) -> Result<(), JsValue> {
        let id = parse_uuid(assignment_id)?;
        let condition = ItemCondition::parse(condition)
            .ok_or_else(|| js_err(format!("Unknown condition: {}", condition)))?;
        self.inner.set_condition(id, condition).map_err(js_err)
    }

    pub fn set_damage_cost(&mut self, assignment_id: &str, cost: f64) -> Result<(), JsValue> {
        let id = parse_uuid(assignment_id)?;
        self.inner
            .set_damage_cost(id, decimal_from_f64(cost))
            .map_err(js_err)
    }

    pub fn set_entry_notes(
        &mut self,
        assignment_id: &str,
        notes: Option<String>,
    ) -> Result<(), JsValue> {
        let id = parse_uuid(assignment_id)?;
        self.inner.set_entry_notes(id, notes).map_err(js_err)
    }

    /// Advance a step; returns the new step number or the gate error
    pub fn next(&mut self) -> Result<u8, JsValue> {
        self.inner.next().map(|step| step.number()).map_err(js_err)
    }

    pub fn back(&mut self) -> Result<u8, JsValue> {
        self.inner.back().map(|step| step.number()).map_err(js_err)
    }

    /// JSON body for `POST /checkout/complete`
    pub fn submit_payload(&self) -> Result<String, JsValue> {
        let payload = self.inner.submit_payload().map_err(js_err)?;
        serde_json::to_string(&payload).map_err(js_err)
    }

    pub fn mark_submit_succeeded(&mut self) {
        self.inner.mark_submit_succeeded();
    }

    pub fn mark_submit_failed(&mut self, message: &str) {
        self.inner.mark_submit_failed(message);
    }

    pub fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    pub fn checked_count(&self) -> usize {
        self.inner.checked_count()
    }

    pub fn total_damage_cost(&self) -> f64 {
        decimal_to_f64(self.inner.total_damage_cost())
    }

    /// Checked-entry counts by condition, as JSON
    pub fn condition_counts(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.condition_counts()).map_err(js_err)
    }

    /// Checklist entries, as JSON
    pub fn entries(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.entries()).map_err(js_err)
    }

    /// Non-blocking warning when the deposit exceeds the damage total
    pub fn deposit_warning(&self) -> Option<String> {
        self.inner.deposit_warning()
    }
}

/// Total damage cost of a checkout submission's items
#[wasm_bindgen]
pub fn checkout_total_damage_cost(items_json: &str) -> Result<f64, JsValue> {
    let items: Vec<CheckoutItemInput> = serde_json::from_str(items_json)
        .map_err(|e| js_err(format!("Invalid items JSON: {}", e)))?;
    Ok(decimal_to_f64(shared::models::total_damage_cost(&items)))
}

/// Whether a deposit deduction exceeds the total damage cost
#[wasm_bindgen]
pub fn deposit_exceeds_damage(deposit: f64, total_damage: f64) -> bool {
    shared::validation::deposit_exceeds_damage(
        decimal_from_f64(deposit),
        decimal_from_f64(total_damage),
    )
}

/// Validate a full checkout submission before sending it to the server
#[wasm_bindgen]
pub fn validate_checkout_payload(payload_json: &str) -> Result<(), JsValue> {
    let payload: CompleteCheckoutInput = serde_json::from_str(payload_json)
        .map_err(|e| js_err(format!("Invalid payload JSON: {}", e)))?;
    shared::validation::validate_complete_checkout(&payload).map_err(js_err)
}

/// Unit status implied by a booking status (e.g. "checked_in" -> "occupied")
#[wasm_bindgen]
pub fn unit_status_for_booking_status(status: &str) -> Result<String, JsValue> {
    let status = BookingStatus::parse(status)
        .ok_or_else(|| js_err(format!("Unknown booking status: {}", status)))?;
    Ok(shared::models::unit_status_for_booking(status)
        .as_str()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_status_for_booking_status() {
        assert_eq!(unit_status_for_booking_status("checked_in").unwrap(), "occupied");
        assert_eq!(unit_status_for_booking_status("reserved").unwrap(), "reserved");
        assert_eq!(unit_status_for_booking_status("checked_out").unwrap(), "available");
        assert!(unit_status_for_booking_status("bogus").is_err());
    }

    #[test]
    fn test_deposit_exceeds_damage() {
        assert!(deposit_exceeds_damage(3000.0, 2500.0));
        assert!(!deposit_exceeds_damage(3000.0, 5000.0));
        assert!(!deposit_exceeds_damage(0.0, 0.0));
    }

    #[test]
    fn test_checkout_total_damage_cost() {
        let items = r#"[
            {"assignment_id":"6f2b8a34-9a1e-4f5e-8d7c-2f8f0a1b2c3d","condition":"good","damage_cost":"0","notes":null},
            {"assignment_id":"7c3e9b45-0b2f-4a6d-9e8d-3a9b1c2d3e4f","condition":"damaged","damage_cost":"5000","notes":null}
        ]"#;
        let total = checkout_total_damage_cost(items).unwrap();
        assert!((total - 5000.0).abs() < f64::EPSILON);
    }
}
