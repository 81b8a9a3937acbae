//! Inventory tests
//!
//! Tests for inventory bookkeeping including:
//! - Condition to restock/ledger-direction mapping
//! - Quantity conservation for returned items
//! - Assignment note concatenation

use proptest::prelude::*;

use shared::models::{append_assignment_note, ItemCondition, MovementDirection};

fn condition_strategy() -> impl Strategy<Value = ItemCondition> {
    prop_oneof![
        Just(ItemCondition::Good),
        Just(ItemCondition::Damaged),
        Just(ItemCondition::Missing),
    ]
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Only good items return to store stock
    #[test]
    fn test_restock_by_condition() {
        assert!(ItemCondition::Good.restocks());
        assert!(!ItemCondition::Damaged.restocks());
        assert!(!ItemCondition::Missing.restocks());
    }

    /// Each condition maps to its ledger direction
    #[test]
    fn test_movement_direction_by_condition() {
        assert_eq!(
            ItemCondition::Good.movement_direction(),
            MovementDirection::ToStore
        );
        assert_eq!(
            ItemCondition::Damaged.movement_direction(),
            MovementDirection::Damaged
        );
        assert_eq!(
            ItemCondition::Missing.movement_direction(),
            MovementDirection::Missing
        );
    }

    /// Direction strings round-trip through parse
    #[test]
    fn test_direction_string_round_trip() {
        for direction in [
            MovementDirection::ToUnit,
            MovementDirection::ToStore,
            MovementDirection::Damaged,
            MovementDirection::Missing,
        ] {
            assert_eq!(MovementDirection::parse(direction.as_str()), Some(direction));
        }
        assert_eq!(MovementDirection::parse("sideways"), None);
    }

    /// Quantity conservation: N good returns put exactly N units back
    #[test]
    fn test_good_returns_restock_count() {
        let inspected = [
            ItemCondition::Good,
            ItemCondition::Damaged,
            ItemCondition::Good,
            ItemCondition::Missing,
            ItemCondition::Good,
        ];

        let restocked = inspected.iter().filter(|c| c.restocks()).count();
        assert_eq!(restocked, 3);
    }

    /// Checkout notes are appended to existing assignment notes
    #[test]
    fn test_append_note_to_existing() {
        let merged = append_assignment_note(Some("Installed 2024"), Some("Scratch on left side"));
        assert_eq!(merged.as_deref(), Some("Installed 2024\nScratch on left side"));
    }

    /// No checkout note leaves the existing notes untouched
    #[test]
    fn test_append_nothing_keeps_existing() {
        let merged = append_assignment_note(Some("Installed 2024"), None);
        assert_eq!(merged.as_deref(), Some("Installed 2024"));

        let merged = append_assignment_note(Some("Installed 2024"), Some("   "));
        assert_eq!(merged.as_deref(), Some("Installed 2024"));
    }

    /// A checkout note on a bare assignment becomes its notes
    #[test]
    fn test_append_note_to_empty() {
        let merged = append_assignment_note(None, Some("Scuffed"));
        assert_eq!(merged.as_deref(), Some("Scuffed"));

        assert_eq!(append_assignment_note(None, None), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Restocked items are exactly the good ones, whatever the mix
        #[test]
        fn prop_restock_count_equals_good_count(
            conditions in prop::collection::vec(condition_strategy(), 0..50)
        ) {
            let restocked = conditions.iter().filter(|c| c.restocks()).count();
            let good = conditions
                .iter()
                .filter(|c| **c == ItemCondition::Good)
                .count();
            prop_assert_eq!(restocked, good);
        }

        /// A damaged or missing item never restocks, and its ledger
        /// direction carries the same name as the condition
        #[test]
        fn prop_non_good_never_restocks(condition in condition_strategy()) {
            if condition != ItemCondition::Good {
                prop_assert!(!condition.restocks());
                prop_assert_eq!(condition.movement_direction().as_str(), condition.as_str());
            }
        }

        /// Appending never loses the existing notes
        #[test]
        fn prop_append_preserves_existing(
            existing in "[a-zA-Z0-9 ]{1,40}",
            addition in proptest::option::of("[a-zA-Z0-9 ]{1,40}")
        ) {
            let merged = append_assignment_note(Some(&existing), addition.as_deref())
                .expect("existing notes always survive");
            prop_assert!(merged.starts_with(&existing));
        }
    }
}
