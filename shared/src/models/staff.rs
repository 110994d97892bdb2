//! HR staff models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A staff member record.
/// Identity fields are captured when the record is created; the remaining
/// fields fill in as the onboarding wizard advances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Uuid,
    pub business_id: Uuid,
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub onboarding_status: OnboardingStatus,
    /// Next onboarding wizard step awaiting completion
    pub onboarding_step: i32,
    pub del_flag: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Progress of a staff member through onboarding
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    InProgress,
    Completed,
}

impl OnboardingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingStatus::InProgress => "in_progress",
            OnboardingStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for OnboardingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(OnboardingStatus::InProgress),
            "completed" => Ok(OnboardingStatus::Completed),
            _ => Err(()),
        }
    }
}
