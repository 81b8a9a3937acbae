//! Checkout wizard state machine
//!
//! Drives the three-step guest checkout flow: inspection details, inventory
//! checklist, financial summary. Step gates mirror the backend's validation
//! so a submission that passes the wizard is accepted by the server except
//! for conflicts detected at transaction time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AssignmentView, CheckoutItemInput, CompleteCheckoutInput, ItemCondition};
use crate::validation;

/// Steps of the checkout wizard, in order, non-skippable
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    InspectionDetails,
    InventoryChecklist,
    FinancialSummary,
}

impl WizardStep {
    /// 1-based step number for display
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::InspectionDetails => 1,
            WizardStep::InventoryChecklist => 2,
            WizardStep::FinancialSummary => 3,
        }
    }

    fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::InspectionDetails => None,
            WizardStep::InventoryChecklist => Some(WizardStep::InspectionDetails),
            WizardStep::FinancialSummary => Some(WizardStep::InventoryChecklist),
        }
    }
}

/// Submission lifecycle of the wizard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmitState {
    /// Form is being filled in or re-edited after a failure
    Editing,
    /// Terminal: the checkout committed, the wizard is discarded
    Succeeded,
    /// Stays at the financial summary with state intact; resubmission allowed
    Failed(String),
}

/// One row of the inventory checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub assignment_id: Uuid,
    pub item_name: String,
    pub category: String,
    pub serial_number: Option<String>,
    pub checked: bool,
    pub condition: ItemCondition,
    pub damage_cost: Decimal,
    pub notes: Option<String>,
}

impl ChecklistEntry {
    fn from_assignment(view: &AssignmentView) -> Self {
        Self {
            assignment_id: view.id,
            item_name: view.item_name.clone(),
            category: view.category.clone(),
            serial_number: view.serial_number.clone(),
            checked: false,
            condition: ItemCondition::Good,
            damage_cost: Decimal::ZERO,
            notes: None,
        }
    }
}

/// Counts of checked entries by inspected condition
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConditionCounts {
    pub good: usize,
    pub damaged: usize,
    pub missing: usize,
}

/// Errors raised by wizard transitions and submission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Checkout date is required")]
    CheckoutDateRequired,

    #[error("Inspector is required")]
    InspectorRequired,

    #[error("{0} checklist item(s) have not been inspected")]
    UncheckedEntries(usize),

    #[error("Damage cost is required for assignment {0}")]
    DamageCostRequired(Uuid),

    #[error("Damage cost cannot be negative for assignment {0}")]
    NegativeDamageCost(Uuid),

    #[error("Deposit deduction cannot be negative")]
    NegativeDepositDeduction,

    #[error("Unknown checklist assignment {0}")]
    UnknownAssignment(Uuid),

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("Already at the last step")]
    AtLastStep,

    #[error("Submit is only available from the financial summary step")]
    NotAtFinalStep,

    #[error("The checkout was already submitted")]
    AlreadySubmitted,
}

/// State of one in-progress checkout form.
///
/// Derived values (checked count, condition counts, total damage cost, the
/// deposit warning) are recomputed from the entries on demand and never
/// stored, so they cannot drift from the form state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutWizard {
    booking_id: Uuid,
    guest_id: Uuid,
    step: WizardStep,
    submit_state: SubmitState,
    checkout_date: Option<NaiveDate>,
    inspector: String,
    deposit_deduction: Decimal,
    notes: Option<String>,
    entries: Vec<ChecklistEntry>,
}

impl CheckoutWizard {
    /// Start a wizard for a booking, with one checklist entry per eligible
    /// assignment (unchecked, condition good, cost zero)
    pub fn new(booking_id: Uuid, guest_id: Uuid, eligible: &[AssignmentView]) -> Self {
        Self {
            booking_id,
            guest_id,
            step: WizardStep::InspectionDetails,
            submit_state: SubmitState::Editing,
            checkout_date: None,
            inspector: String::new(),
            deposit_deduction: Decimal::ZERO,
            notes: None,
            entries: eligible.iter().map(ChecklistEntry::from_assignment).collect(),
        }
    }

    pub fn booking_id(&self) -> Uuid {
        self.booking_id
    }

    pub fn guest_id(&self) -> Uuid {
        self.guest_id
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit_state
    }

    pub fn entries(&self) -> &[ChecklistEntry] {
        &self.entries
    }

    pub fn checkout_date(&self) -> Option<NaiveDate> {
        self.checkout_date
    }

    pub fn inspector(&self) -> &str {
        &self.inspector
    }

    pub fn deposit_deduction(&self) -> Decimal {
        self.deposit_deduction
    }

    pub fn set_checkout_date(&mut self, date: NaiveDate) {
        self.checkout_date = Some(date);
    }

    pub fn set_inspector(&mut self, inspector: impl Into<String>) {
        self.inspector = inspector.into();
    }

    pub fn set_deposit_deduction(&mut self, deposit: Decimal) {
        self.deposit_deduction = deposit;
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    /// Mark a checklist entry as inspected (or not)
    pub fn set_checked(&mut self, assignment_id: Uuid, checked: bool) -> Result<(), WizardError> {
        self.entry_mut(assignment_id)?.checked = checked;
        Ok(())
    }

    /// Record the inspected condition of an entry.
    ///
    /// Switching back to good zeroes the damage cost, keeping the invariant
    /// that good items never carry a cost.
    pub fn set_condition(
        &mut self,
        assignment_id: Uuid,
        condition: ItemCondition,
    ) -> Result<(), WizardError> {
        let entry = self.entry_mut(assignment_id)?;
        entry.condition = condition;
        if condition.restocks() {
            entry.damage_cost = Decimal::ZERO;
        }
        Ok(())
    }

    pub fn set_damage_cost(
        &mut self,
        assignment_id: Uuid,
        damage_cost: Decimal,
    ) -> Result<(), WizardError> {
        self.entry_mut(assignment_id)?.damage_cost = damage_cost;
        Ok(())
    }

    pub fn set_entry_notes(
        &mut self,
        assignment_id: Uuid,
        notes: Option<String>,
    ) -> Result<(), WizardError> {
        self.entry_mut(assignment_id)?.notes = notes;
        Ok(())
    }

    /// Advance to the next step, enforcing the current step's gate
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let next = match self.step {
            WizardStep::InspectionDetails => {
                self.gate_inspection_details()?;
                WizardStep::InventoryChecklist
            }
            WizardStep::InventoryChecklist => {
                self.gate_inventory_checklist()?;
                WizardStep::FinancialSummary
            }
            WizardStep::FinancialSummary => return Err(WizardError::AtLastStep),
        };
        self.step = next;
        Ok(self.step)
    }

    /// Go back one step; no validation required
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                Ok(self.step)
            }
            None => Err(WizardError::AtFirstStep),
        }
    }

    /// Build the submission payload. Only valid at the financial summary
    /// step, and only while the wizard has not already succeeded.
    pub fn submit_payload(&self) -> Result<CompleteCheckoutInput, WizardError> {
        if self.step != WizardStep::FinancialSummary {
            return Err(WizardError::NotAtFinalStep);
        }
        if self.submit_state == SubmitState::Succeeded {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.deposit_deduction < Decimal::ZERO {
            return Err(WizardError::NegativeDepositDeduction);
        }
        // The earlier gates have already run, but the form may have been
        // edited after going back; re-check before building the payload.
        self.gate_inspection_details()?;
        self.gate_inventory_checklist()?;

        let checkout_date = self.checkout_date.ok_or(WizardError::CheckoutDateRequired)?;
        let checkout_items = self
            .entries
            .iter()
            .filter(|entry| entry.checked)
            .map(|entry| CheckoutItemInput {
                assignment_id: entry.assignment_id,
                condition: entry.condition,
                damage_cost: entry.damage_cost,
                notes: entry.notes.clone(),
            })
            .collect();

        Ok(CompleteCheckoutInput {
            booking_id: self.booking_id,
            guest_id: self.guest_id,
            checkout_date,
            inspector: self.inspector.trim().to_string(),
            deposit_deduction: self.deposit_deduction,
            notes: self.notes.clone(),
            checkout_items,
        })
    }

    /// Terminal success: the server committed the checkout
    pub fn mark_submit_succeeded(&mut self) {
        self.submit_state = SubmitState::Succeeded;
    }

    /// Submission failed; the wizard stays at the financial summary with all
    /// form data intact for resubmission
    pub fn mark_submit_failed(&mut self, message: impl Into<String>) {
        self.submit_state = SubmitState::Failed(message.into());
    }

    pub fn is_complete(&self) -> bool {
        self.submit_state == SubmitState::Succeeded
    }

    /// Number of entries marked inspected
    pub fn checked_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.checked).count()
    }

    /// Checked entries broken down by condition
    pub fn condition_counts(&self) -> ConditionCounts {
        let mut counts = ConditionCounts::default();
        for entry in self.entries.iter().filter(|entry| entry.checked) {
            match entry.condition {
                ItemCondition::Good => counts.good += 1,
                ItemCondition::Damaged => counts.damaged += 1,
                ItemCondition::Missing => counts.missing += 1,
            }
        }
        counts
    }

    /// Total damage cost across checked damaged/missing entries
    pub fn total_damage_cost(&self) -> Decimal {
        self.entries
            .iter()
            .filter(|entry| entry.checked && !entry.condition.restocks())
            .map(|entry| entry.damage_cost)
            .sum()
    }

    /// Non-blocking warning when the deposit deduction exceeds the total
    /// damage cost. Never prevents submission.
    pub fn deposit_warning(&self) -> Option<String> {
        let total = self.total_damage_cost();
        if validation::deposit_exceeds_damage(self.deposit_deduction, total) {
            Some(format!(
                "Deposit deduction {} exceeds total damage cost {}",
                self.deposit_deduction, total
            ))
        } else {
            None
        }
    }

    fn entry_mut(&mut self, assignment_id: Uuid) -> Result<&mut ChecklistEntry, WizardError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.assignment_id == assignment_id)
            .ok_or(WizardError::UnknownAssignment(assignment_id))
    }

    fn gate_inspection_details(&self) -> Result<(), WizardError> {
        if self.checkout_date.is_none() {
            return Err(WizardError::CheckoutDateRequired);
        }
        if validation::validate_inspector(&self.inspector).is_err() {
            return Err(WizardError::InspectorRequired);
        }
        Ok(())
    }

    fn gate_inventory_checklist(&self) -> Result<(), WizardError> {
        let unchecked = self.entries.len() - self.checked_count();
        if unchecked > 0 {
            return Err(WizardError::UncheckedEntries(unchecked));
        }
        for entry in &self.entries {
            if entry.damage_cost < Decimal::ZERO {
                return Err(WizardError::NegativeDamageCost(entry.assignment_id));
            }
            if !entry.condition.restocks() && entry.damage_cost <= Decimal::ZERO {
                return Err(WizardError::DamageCostRequired(entry.assignment_id));
            }
        }
        Ok(())
    }
}
