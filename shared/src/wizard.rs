//! Staff onboarding wizard steps
//!
//! The onboarding dialog is a fixed sequence of field subsets. Each step has
//! its own validator, keyed by step index, so the rendering layer only needs
//! to ask "is step N valid for this draft" without owning any of the rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::{validate_email, validate_phone};

/// Wizard steps in order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Identity,
    Contact,
    Employment,
    Review,
}

pub const ONBOARDING_STEPS: [OnboardingStep; 4] = [
    OnboardingStep::Identity,
    OnboardingStep::Contact,
    OnboardingStep::Employment,
    OnboardingStep::Review,
];

pub const ONBOARDING_STEP_COUNT: usize = ONBOARDING_STEPS.len();

/// Partially filled onboarding form. All fields optional; each step's
/// validator decides which must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffDraft {
    pub employee_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Set by the review step once the submitter confirms the summary
    #[serde(default)]
    pub confirmed: bool,
}

/// A failed step validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepError {
    pub step: usize,
    pub field: &'static str,
    pub message: &'static str,
}

type StepValidator = fn(&StaffDraft) -> Result<(), (&'static str, &'static str)>;

/// Validators keyed by step index
const STEP_VALIDATORS: [StepValidator; ONBOARDING_STEP_COUNT] = [
    validate_identity,
    validate_contact,
    validate_employment,
    validate_review,
];

fn require<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, (&'static str, &'static str)> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err((field, "Required")),
    }
}

fn validate_identity(draft: &StaffDraft) -> Result<(), (&'static str, &'static str)> {
    require(&draft.employee_number, "employee_number")?;
    require(&draft.first_name, "first_name")?;
    require(&draft.last_name, "last_name")?;
    Ok(())
}

fn validate_contact(draft: &StaffDraft) -> Result<(), (&'static str, &'static str)> {
    let email = require(&draft.email, "email")?;
    validate_email(email).map_err(|msg| ("email", msg))?;
    if let Some(phone) = draft.phone.as_deref() {
        validate_phone(phone).map_err(|msg| ("phone", msg))?;
    }
    Ok(())
}

fn validate_employment(draft: &StaffDraft) -> Result<(), (&'static str, &'static str)> {
    require(&draft.department, "department")?;
    require(&draft.position, "position")?;
    if draft.start_date.is_none() {
        return Err(("start_date", "Required"));
    }
    Ok(())
}

fn validate_review(draft: &StaffDraft) -> Result<(), (&'static str, &'static str)> {
    if !draft.confirmed {
        return Err(("confirmed", "Summary must be confirmed before submitting"));
    }
    Ok(())
}

/// Validate a single step against the draft
pub fn validate_step(step: usize, draft: &StaffDraft) -> Result<(), StepError> {
    let validator = STEP_VALIDATORS
        .get(step)
        .ok_or(StepError {
            step,
            field: "step",
            message: "Unknown wizard step",
        })?;
    validator(draft).map_err(|(field, message)| StepError {
        step,
        field,
        message,
    })
}

/// Validate every step up to and including `step`.
/// Advancing the wizard requires all earlier steps to still hold.
pub fn validate_through(step: usize, draft: &StaffDraft) -> Result<(), StepError> {
    for s in 0..=step.min(ONBOARDING_STEP_COUNT - 1) {
        validate_step(s, draft)?;
    }
    Ok(())
}

/// First step that does not validate, or `None` when the draft is complete
pub fn first_incomplete_step(draft: &StaffDraft) -> Option<usize> {
    (0..ONBOARDING_STEP_COUNT).find(|&s| validate_step(s, draft).is_err())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> StaffDraft {
        StaffDraft {
            employee_number: Some("EMP-0042".to_string()),
            first_name: Some("Mina".to_string()),
            last_name: Some("Okafor".to_string()),
            email: Some("mina.okafor@example.com".to_string()),
            phone: Some("+15550123456".to_string()),
            department: Some("Warehouse".to_string()),
            position: Some("Shift Lead".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            confirmed: true,
        }
    }

    #[test]
    fn test_complete_draft_passes_all_steps() {
        let draft = complete_draft();
        assert_eq!(first_incomplete_step(&draft), None);
        assert!(validate_through(ONBOARDING_STEP_COUNT - 1, &draft).is_ok());
    }

    #[test]
    fn test_empty_draft_fails_at_first_step() {
        assert_eq!(first_incomplete_step(&StaffDraft::default()), Some(0));
    }

    #[test]
    fn test_missing_email_blocks_contact_step() {
        let mut draft = complete_draft();
        draft.email = None;
        let err = validate_step(1, &draft).unwrap_err();
        assert_eq!(err.field, "email");
        assert_eq!(first_incomplete_step(&draft), Some(1));
    }

    #[test]
    fn test_invalid_phone_blocks_contact_step() {
        let mut draft = complete_draft();
        draft.phone = Some("12".to_string());
        assert!(validate_step(1, &draft).is_err());
    }

    #[test]
    fn test_later_step_requires_earlier_steps() {
        let mut draft = complete_draft();
        draft.first_name = None;
        // Employment fields are fine, but the identity step no longer holds
        assert!(validate_step(2, &draft).is_ok());
        assert!(validate_through(2, &draft).is_err());
    }

    #[test]
    fn test_unconfirmed_review_blocks_submission() {
        let mut draft = complete_draft();
        draft.confirmed = false;
        assert_eq!(first_incomplete_step(&draft), Some(3));
    }

    #[test]
    fn test_unknown_step_rejected() {
        let err = validate_step(99, &complete_draft()).unwrap_err();
        assert_eq!(err.message, "Unknown wizard step");
    }
}
