//! Staff onboarding wizard tests
//!
//! The wizard is a fixed sequence of validated field subsets keyed by step
//! index; these tests pin down the gating behavior the dialogs rely on.

use chrono::NaiveDate;
use proptest::prelude::*;

use shared::wizard::{
    first_incomplete_step, validate_step, validate_through, StaffDraft, ONBOARDING_STEP_COUNT,
};

fn complete_draft() -> StaffDraft {
    StaffDraft {
        employee_number: Some("EMP-0107".to_string()),
        first_name: Some("Priya".to_string()),
        last_name: Some("Raman".to_string()),
        email: Some("priya.raman@example.com".to_string()),
        phone: Some("+14155550107".to_string()),
        department: Some("Logistics".to_string()),
        position: Some("Dispatcher".to_string()),
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1),
        confirmed: true,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_complete_draft_passes_every_step() {
        let draft = complete_draft();
        for step in 0..ONBOARDING_STEP_COUNT {
            assert!(validate_step(step, &draft).is_ok(), "step {} failed", step);
        }
        assert_eq!(first_incomplete_step(&draft), None);
    }

    #[test]
    fn test_steps_gate_their_own_fields() {
        let mut draft = complete_draft();
        draft.department = None;

        // Identity and contact still hold
        assert!(validate_step(0, &draft).is_ok());
        assert!(validate_step(1, &draft).is_ok());
        // Employment does not
        let err = validate_step(2, &draft).unwrap_err();
        assert_eq!(err.step, 2);
        assert_eq!(err.field, "department");
    }

    #[test]
    fn test_validate_through_requires_prefix() {
        let mut draft = complete_draft();
        draft.email = None;

        // The review step itself is fine, but the walk stops at contact
        assert!(validate_step(3, &draft).is_ok());
        let err = validate_through(3, &draft).unwrap_err();
        assert_eq!(err.step, 1);
    }

    #[test]
    fn test_whitespace_fields_do_not_count() {
        let mut draft = complete_draft();
        draft.first_name = Some("   ".to_string());
        assert!(validate_step(0, &draft).is_err());
    }

    #[test]
    fn test_phone_is_optional_but_checked_when_present() {
        let mut draft = complete_draft();
        draft.phone = None;
        assert!(validate_step(1, &draft).is_ok());

        draft.phone = Some("123".to_string());
        assert!(validate_step(1, &draft).is_err());
    }

    #[test]
    fn test_submission_requires_confirmation() {
        let mut draft = complete_draft();
        draft.confirmed = false;
        assert_eq!(first_incomplete_step(&draft), Some(ONBOARDING_STEP_COUNT - 1));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Drop a random subset of fields from a complete draft
    fn partial_draft_strategy() -> impl Strategy<Value = StaffDraft> {
        prop::collection::vec(any::<bool>(), 9).prop_map(|keep| {
            let full = complete_draft();
            StaffDraft {
                employee_number: full.employee_number.filter(|_| keep[0]),
                first_name: full.first_name.filter(|_| keep[1]),
                last_name: full.last_name.filter(|_| keep[2]),
                email: full.email.filter(|_| keep[3]),
                phone: full.phone.filter(|_| keep[4]),
                department: full.department.filter(|_| keep[5]),
                position: full.position.filter(|_| keep[6]),
                start_date: full.start_date.filter(|_| keep[7]),
                confirmed: keep[8],
            }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every step before the first incomplete one validates
        #[test]
        fn prop_first_incomplete_is_a_frontier(draft in partial_draft_strategy()) {
            match first_incomplete_step(&draft) {
                Some(step) => {
                    for earlier in 0..step {
                        prop_assert!(validate_step(earlier, &draft).is_ok());
                    }
                    prop_assert!(validate_step(step, &draft).is_err());
                }
                None => {
                    prop_assert!(validate_through(ONBOARDING_STEP_COUNT - 1, &draft).is_ok());
                }
            }
        }

        /// validate_through succeeds exactly when no earlier step fails
        #[test]
        fn prop_validate_through_matches_stepwise(
            draft in partial_draft_strategy(),
            step in 0usize..4
        ) {
            let stepwise = (0..=step).all(|s| validate_step(s, &draft).is_ok());
            prop_assert_eq!(validate_through(step, &draft).is_ok(), stepwise);
        }

        /// Step errors always report the step they were raised for
        #[test]
        fn prop_errors_name_their_step(draft in partial_draft_strategy(), step in 0usize..4) {
            if let Err(e) = validate_step(step, &draft) {
                prop_assert_eq!(e.step, step);
            }
        }
    }
}
