//! Validation helpers for checkout submissions
//!
//! Used by the wizard gates on the client and re-checked by the backend
//! before any write is attempted.

use rust_decimal::Decimal;

use crate::models::{CheckoutItemInput, CompleteCheckoutInput};

/// Validate the inspector name
pub fn validate_inspector(inspector: &str) -> Result<(), &'static str> {
    if inspector.trim().is_empty() {
        return Err("Inspector is required");
    }
    Ok(())
}

/// Validate the deposit deduction amount
pub fn validate_deposit_deduction(deposit: Decimal) -> Result<(), &'static str> {
    if deposit < Decimal::ZERO {
        return Err("Deposit deduction cannot be negative");
    }
    Ok(())
}

/// Validate a single checked item
pub fn validate_checkout_item(item: &CheckoutItemInput) -> Result<(), &'static str> {
    if item.damage_cost < Decimal::ZERO {
        return Err("Damage cost cannot be negative");
    }
    if !item.condition.restocks() && item.damage_cost <= Decimal::ZERO {
        return Err("Damage cost is required for damaged or missing items");
    }
    Ok(())
}

/// Validate a full checkout submission.
///
/// An empty item list is valid: a unit may have no eligible assignments.
pub fn validate_complete_checkout(input: &CompleteCheckoutInput) -> Result<(), &'static str> {
    validate_inspector(&input.inspector)?;
    validate_deposit_deduction(input.deposit_deduction)?;
    for item in &input.checkout_items {
        validate_checkout_item(item)?;
    }
    Ok(())
}

/// Whether the deposit deduction exceeds the total damage cost.
///
/// A soft constraint: surfaced as a warning, never a rejection.
pub fn deposit_exceeds_damage(deposit: Decimal, total_damage: Decimal) -> bool {
    deposit > total_damage
}
