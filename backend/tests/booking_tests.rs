//! Booking lifecycle tests
//!
//! Tests for the booking status machine including:
//! - Status mapper totality and specific mappings
//! - Transition graph validity
//! - Unit-blocking statuses

use proptest::prelude::*;

use shared::models::{unit_status_for_booking, BookingStatus, UnitStatus};

const ALL_STATUSES: [BookingStatus; 7] = [
    BookingStatus::Pending,
    BookingStatus::Reserved,
    BookingStatus::CheckedIn,
    BookingStatus::CheckedOut,
    BookingStatus::Cancelled,
    BookingStatus::Confirmed,
    BookingStatus::Completed,
];

fn status_strategy() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Pending),
        Just(BookingStatus::Reserved),
        Just(BookingStatus::CheckedIn),
        Just(BookingStatus::CheckedOut),
        Just(BookingStatus::Cancelled),
        Just(BookingStatus::Confirmed),
        Just(BookingStatus::Completed),
    ]
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The mapping table for every booking status
    #[test]
    fn test_status_mapper_table() {
        assert_eq!(unit_status_for_booking(BookingStatus::Pending), UnitStatus::Booked);
        assert_eq!(unit_status_for_booking(BookingStatus::Confirmed), UnitStatus::Booked);
        assert_eq!(unit_status_for_booking(BookingStatus::Reserved), UnitStatus::Reserved);
        assert_eq!(unit_status_for_booking(BookingStatus::CheckedIn), UnitStatus::Occupied);
        assert_eq!(unit_status_for_booking(BookingStatus::CheckedOut), UnitStatus::Available);
        assert_eq!(unit_status_for_booking(BookingStatus::Cancelled), UnitStatus::Available);
        assert_eq!(unit_status_for_booking(BookingStatus::Completed), UnitStatus::Available);
    }

    /// Checking out always frees the unit
    #[test]
    fn test_checkout_frees_unit() {
        assert_eq!(
            unit_status_for_booking(BookingStatus::CheckedOut),
            UnitStatus::Available
        );
    }

    /// Statuses that hold a unit for a check-in day
    #[test]
    fn test_unit_blocking_statuses() {
        assert!(BookingStatus::Pending.blocks_unit());
        assert!(BookingStatus::Reserved.blocks_unit());
        assert!(BookingStatus::CheckedIn.blocks_unit());

        assert!(!BookingStatus::Confirmed.blocks_unit());
        assert!(!BookingStatus::CheckedOut.blocks_unit());
        assert!(!BookingStatus::Cancelled.blocks_unit());
        assert!(!BookingStatus::Completed.blocks_unit());
    }

    /// The forward path through the booking lifecycle
    #[test]
    fn test_valid_transitions() {
        let valid = [
            (BookingStatus::Pending, BookingStatus::Reserved),
            (BookingStatus::Pending, BookingStatus::Confirmed),
            (BookingStatus::Pending, BookingStatus::Cancelled),
            (BookingStatus::Reserved, BookingStatus::CheckedIn),
            (BookingStatus::Confirmed, BookingStatus::CheckedIn),
            (BookingStatus::CheckedIn, BookingStatus::CheckedOut),
            (BookingStatus::CheckedOut, BookingStatus::Completed),
        ];

        for (from, to) in valid {
            assert!(from.can_transition_to(to), "{} -> {} should be valid", from, to);
        }
    }

    /// Backwards jumps and exits from terminal statuses are rejected
    #[test]
    fn test_invalid_transitions() {
        let invalid = [
            (BookingStatus::Pending, BookingStatus::CheckedOut), // Skip stages
            (BookingStatus::CheckedIn, BookingStatus::Pending),  // Backward
            (BookingStatus::CheckedIn, BookingStatus::Cancelled), // A stay in progress cannot be cancelled
            (BookingStatus::Cancelled, BookingStatus::Pending),  // From terminal
            (BookingStatus::Completed, BookingStatus::CheckedIn), // From terminal
        ];

        for (from, to) in invalid {
            assert!(!from.can_transition_to(to), "{} -> {} should be invalid", from, to);
        }
    }

    /// Status strings round-trip through parse
    #[test]
    fn test_status_string_round_trip() {
        for status in ALL_STATUSES {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("bogus"), None);
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

        /// The mapper is total and never yields maintenance; that status is
        /// only ever set manually
        #[test]
        fn prop_mapper_never_yields_maintenance(status in status_strategy()) {
            prop_assert_ne!(unit_status_for_booking(status), UnitStatus::Maintenance);
        }

        /// Blocking statuses are exactly the ones that imply a non-available
        /// unit or an occupied one
        #[test]
        fn prop_blocking_statuses_occupy_unit(status in status_strategy()) {
            if status.blocks_unit() {
                prop_assert_ne!(unit_status_for_booking(status), UnitStatus::Available);
            }
        }

        /// No status transitions to itself
        #[test]
        fn prop_no_self_transition(status in status_strategy()) {
            prop_assert!(!status.can_transition_to(status));
        }

        /// Terminal statuses have no exits
        #[test]
        fn prop_terminal_statuses_stay_terminal(next in status_strategy()) {
            prop_assert!(!BookingStatus::Cancelled.can_transition_to(next));
            prop_assert!(!BookingStatus::Completed.can_transition_to(next));
        }

        /// Checked-out bookings can only complete
        #[test]
        fn prop_checked_out_only_completes(next in status_strategy()) {
            if BookingStatus::CheckedOut.can_transition_to(next) {
                prop_assert_eq!(next, BookingStatus::Completed);
            }
        }
    }
}
