//! Checkout wizard tests
//!
//! Tests for the three-step checkout flow including:
//! - Per-step validation gates
//! - Back navigation and resubmission
//! - Derived summary values

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{AssignmentView, ItemCondition, ItemStatus};
use shared::wizard::{CheckoutWizard, SubmitState, WizardError, WizardStep};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn assignment(name: &str) -> AssignmentView {
    AssignmentView {
        id: Uuid::new_v4(),
        inventory_item_id: Uuid::new_v4(),
        item_name: name.to_string(),
        category: "furniture".to_string(),
        item_status: ItemStatus::Active,
        serial_number: None,
        notes: None,
        assigned_at: Utc::now(),
    }
}

fn checkout_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

/// A wizard filled in through step 1, with the given eligible assignments
fn wizard_at_checklist(eligible: &[AssignmentView]) -> CheckoutWizard {
    let mut wizard = CheckoutWizard::new(Uuid::new_v4(), Uuid::new_v4(), eligible);
    wizard.set_checkout_date(checkout_date());
    wizard.set_inspector("Jane");
    wizard.next().expect("step 1 gate passes");
    wizard
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A fresh wizard starts at step 1 with every entry unchecked
    #[test]
    fn test_initial_state() {
        let eligible = [assignment("TV"), assignment("Sofa")];
        let wizard = CheckoutWizard::new(Uuid::new_v4(), Uuid::new_v4(), &eligible);

        assert_eq!(wizard.step(), WizardStep::InspectionDetails);
        assert_eq!(wizard.submit_state(), &SubmitState::Editing);
        assert_eq!(wizard.entries().len(), 2);
        assert_eq!(wizard.checked_count(), 0);
        assert!(wizard
            .entries()
            .iter()
            .all(|e| e.condition == ItemCondition::Good && e.damage_cost == Decimal::ZERO));
    }

    /// Step 1 requires both a date and an inspector
    #[test]
    fn test_inspection_details_gate() {
        let mut wizard = CheckoutWizard::new(Uuid::new_v4(), Uuid::new_v4(), &[]);
        assert_eq!(wizard.next(), Err(WizardError::CheckoutDateRequired));

        wizard.set_checkout_date(checkout_date());
        assert_eq!(wizard.next(), Err(WizardError::InspectorRequired));

        wizard.set_inspector("  ");
        assert_eq!(wizard.next(), Err(WizardError::InspectorRequired));

        wizard.set_inspector("Jane");
        assert_eq!(wizard.next(), Ok(WizardStep::InventoryChecklist));
    }

    /// Partially inspected checklists cannot advance, so no server call is
    /// ever attempted with unchecked items
    #[test]
    fn test_checklist_gate_requires_all_checked() {
        let eligible = [assignment("TV"), assignment("Sofa")];
        let mut wizard = wizard_at_checklist(&eligible);

        assert_eq!(wizard.next(), Err(WizardError::UncheckedEntries(2)));

        wizard.set_checked(eligible[0].id, true).unwrap();
        assert_eq!(wizard.next(), Err(WizardError::UncheckedEntries(1)));

        wizard.set_checked(eligible[1].id, true).unwrap();
        assert_eq!(wizard.next(), Ok(WizardStep::FinancialSummary));
    }

    /// Damaged entries without a cost are rejected at the checklist gate
    #[test]
    fn test_checklist_gate_requires_damage_cost() {
        let eligible = [assignment("Sofa")];
        let mut wizard = wizard_at_checklist(&eligible);

        wizard.set_checked(eligible[0].id, true).unwrap();
        wizard
            .set_condition(eligible[0].id, ItemCondition::Damaged)
            .unwrap();

        assert_eq!(
            wizard.next(),
            Err(WizardError::DamageCostRequired(eligible[0].id))
        );

        wizard.set_damage_cost(eligible[0].id, dec("5000")).unwrap();
        assert_eq!(wizard.next(), Ok(WizardStep::FinancialSummary));
    }

    /// A unit without eligible assignments sails through the checklist
    #[test]
    fn test_empty_checklist_passes_gate() {
        let mut wizard = wizard_at_checklist(&[]);
        assert_eq!(wizard.next(), Ok(WizardStep::FinancialSummary));
        assert!(wizard.submit_payload().is_ok());
    }

    /// Back never validates; forward re-validates
    #[test]
    fn test_back_navigation() {
        let eligible = [assignment("TV")];
        let mut wizard = wizard_at_checklist(&eligible);

        assert_eq!(wizard.back(), Ok(WizardStep::InspectionDetails));
        assert_eq!(wizard.back(), Err(WizardError::AtFirstStep));

        assert_eq!(wizard.next(), Ok(WizardStep::InventoryChecklist));
        wizard.set_checked(eligible[0].id, true).unwrap();
        assert_eq!(wizard.next(), Ok(WizardStep::FinancialSummary));
        assert_eq!(wizard.next(), Err(WizardError::AtLastStep));
        assert_eq!(wizard.back(), Ok(WizardStep::InventoryChecklist));
    }

    /// Submission is only available from the financial summary
    #[test]
    fn test_submit_only_at_final_step() {
        let eligible = [assignment("TV")];
        let wizard = wizard_at_checklist(&eligible);
        assert_eq!(
            wizard.submit_payload().unwrap_err(),
            WizardError::NotAtFinalStep
        );
    }

    /// The payload carries the checked entries with their conditions
    #[test]
    fn test_submit_payload_contents() {
        let eligible = [assignment("TV"), assignment("Sofa")];
        let mut wizard = wizard_at_checklist(&eligible);

        wizard.set_checked(eligible[0].id, true).unwrap();
        wizard.set_checked(eligible[1].id, true).unwrap();
        wizard
            .set_condition(eligible[1].id, ItemCondition::Damaged)
            .unwrap();
        wizard.set_damage_cost(eligible[1].id, dec("5000")).unwrap();
        wizard
            .set_entry_notes(eligible[1].id, Some("Torn cushion".to_string()))
            .unwrap();
        wizard.next().unwrap();
        wizard.set_deposit_deduction(dec("3000"));

        let payload = wizard.submit_payload().unwrap();
        assert_eq!(payload.checkout_date, checkout_date());
        assert_eq!(payload.inspector, "Jane");
        assert_eq!(payload.deposit_deduction, dec("3000"));
        assert_eq!(payload.checkout_items.len(), 2);

        let sofa = payload
            .checkout_items
            .iter()
            .find(|i| i.assignment_id == eligible[1].id)
            .unwrap();
        assert_eq!(sofa.condition, ItemCondition::Damaged);
        assert_eq!(sofa.damage_cost, dec("5000"));
        assert_eq!(sofa.notes.as_deref(), Some("Torn cushion"));
    }

    /// A failed submission keeps the form intact and allows resubmission
    #[test]
    fn test_failed_submission_allows_retry() {
        let eligible = [assignment("TV")];
        let mut wizard = wizard_at_checklist(&eligible);
        wizard.set_checked(eligible[0].id, true).unwrap();
        wizard.next().unwrap();

        let first = wizard.submit_payload().unwrap();
        wizard.mark_submit_failed("checkout failed: connection lost");

        assert_eq!(wizard.step(), WizardStep::FinancialSummary);
        assert_eq!(
            wizard.submit_state(),
            &SubmitState::Failed("checkout failed: connection lost".to_string())
        );
        assert!(!wizard.is_complete());

        // Resubmission produces the same payload
        let second = wizard.submit_payload().unwrap();
        assert_eq!(second.checkout_items.len(), first.checkout_items.len());
        assert_eq!(second.booking_id, first.booking_id);
    }

    /// A successful submission is terminal
    #[test]
    fn test_successful_submission_is_terminal() {
        let mut wizard = wizard_at_checklist(&[]);
        wizard.next().unwrap();

        wizard.mark_submit_succeeded();
        assert!(wizard.is_complete());
        assert_eq!(
            wizard.submit_payload().unwrap_err(),
            WizardError::AlreadySubmitted
        );
    }

    /// Switching a condition back to good clears its cost
    #[test]
    fn test_condition_reset_clears_cost() {
        let eligible = [assignment("TV")];
        let mut wizard = wizard_at_checklist(&eligible);

        wizard
            .set_condition(eligible[0].id, ItemCondition::Damaged)
            .unwrap();
        wizard.set_damage_cost(eligible[0].id, dec("900")).unwrap();
        assert_eq!(wizard.entries()[0].damage_cost, dec("900"));

        wizard
            .set_condition(eligible[0].id, ItemCondition::Good)
            .unwrap();
        assert_eq!(wizard.entries()[0].damage_cost, Decimal::ZERO);
    }

    /// Touching an entry that is not on the checklist is an error
    #[test]
    fn test_unknown_assignment_rejected() {
        let mut wizard = wizard_at_checklist(&[assignment("TV")]);
        let stranger = Uuid::new_v4();
        assert_eq!(
            wizard.set_checked(stranger, true),
            Err(WizardError::UnknownAssignment(stranger))
        );
    }

    /// Derived values follow the checklist state
    #[test]
    fn test_derived_values() {
        let eligible = [assignment("TV"), assignment("Sofa"), assignment("Lamp")];
        let mut wizard = wizard_at_checklist(&eligible);

        wizard.set_checked(eligible[0].id, true).unwrap();
        wizard.set_checked(eligible[1].id, true).unwrap();
        wizard
            .set_condition(eligible[1].id, ItemCondition::Damaged)
            .unwrap();
        wizard.set_damage_cost(eligible[1].id, dec("5000")).unwrap();

        assert_eq!(wizard.checked_count(), 2);
        let counts = wizard.condition_counts();
        assert_eq!(counts.good, 1);
        assert_eq!(counts.damaged, 1);
        assert_eq!(counts.missing, 0);
        assert_eq!(wizard.total_damage_cost(), dec("5000"));

        // Warning appears only once the deduction exceeds the total
        wizard.set_deposit_deduction(dec("3000"));
        assert!(wizard.deposit_warning().is_none());
        wizard.set_deposit_deduction(dec("6000"));
        assert!(wizard.deposit_warning().is_some());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn condition_strategy() -> impl Strategy<Value = ItemCondition> {
        prop_oneof![
            Just(ItemCondition::Good),
            Just(ItemCondition::Damaged),
            Just(ItemCondition::Missing),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// However the checklist is filled in, the gate only opens when
        /// every entry is checked and every non-good entry carries a cost
        #[test]
        fn prop_checklist_gate(
            states in prop::collection::vec(
                (any::<bool>(), condition_strategy(), 0i64..=5000),
                1..10
            )
        ) {
            let eligible: Vec<_> = (0..states.len())
                .map(|i| assignment(&format!("Item {}", i)))
                .collect();
            let mut wizard = wizard_at_checklist(&eligible);

            for (view, (checked, condition, cost)) in eligible.iter().zip(&states) {
                wizard.set_checked(view.id, *checked).unwrap();
                wizard.set_condition(view.id, *condition).unwrap();
                wizard.set_damage_cost(view.id, Decimal::from(*cost)).unwrap();
            }

            let all_checked = states.iter().all(|(checked, _, _)| *checked);
            let costs_ok = wizard
                .entries()
                .iter()
                .all(|e| e.condition.restocks() || e.damage_cost > Decimal::ZERO);

            let advanced = wizard.next().is_ok();
            prop_assert_eq!(advanced, all_checked && costs_ok);
        }

        /// The checked count always matches the number of checked entries
        #[test]
        fn prop_checked_count_consistent(
            checks in prop::collection::vec(any::<bool>(), 1..15)
        ) {
            let eligible: Vec<_> = (0..checks.len())
                .map(|i| assignment(&format!("Item {}", i)))
                .collect();
            let mut wizard = wizard_at_checklist(&eligible);

            for (view, checked) in eligible.iter().zip(&checks) {
                wizard.set_checked(view.id, *checked).unwrap();
            }

            let expected = checks.iter().filter(|c| **c).count();
            prop_assert_eq!(wizard.checked_count(), expected);

            let counts = wizard.condition_counts();
            prop_assert_eq!(counts.good + counts.damaged + counts.missing, expected);
        }

        /// The payload total always matches the wizard's derived total
        #[test]
        fn prop_payload_total_matches_derived(
            entries in prop::collection::vec((condition_strategy(), 1i64..=5000), 1..10)
        ) {
            let eligible: Vec<_> = (0..entries.len())
                .map(|i| assignment(&format!("Item {}", i)))
                .collect();
            let mut wizard = wizard_at_checklist(&eligible);

            for (view, (condition, cost)) in eligible.iter().zip(&entries) {
                wizard.set_checked(view.id, true).unwrap();
                wizard.set_condition(view.id, *condition).unwrap();
                if !condition.restocks() {
                    wizard.set_damage_cost(view.id, Decimal::from(*cost)).unwrap();
                }
            }

            wizard.next().unwrap();
            let payload = wizard.submit_payload().unwrap();
            prop_assert_eq!(
                shared::models::total_damage_cost(&payload.checkout_items),
                wizard.total_damage_cost()
            );
        }
    }
}
