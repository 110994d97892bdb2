//! HR staff onboarding service
//!
//! The onboarding dialog saves after every wizard step. A record is created
//! once the identity step holds; each later save resubmits the whole draft
//! and the record's step/status are recomputed from the step validators.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{OnboardingStatus, StaffMember};
use shared::wizard::{self, StaffDraft, ONBOARDING_STEP_COUNT};

/// Staff service
#[derive(Clone)]
pub struct StaffService {
    db: PgPool,
}

/// Database row for a staff member
#[derive(Debug, sqlx::FromRow)]
struct StaffRow {
    id: Uuid,
    business_id: Uuid,
    employee_number: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    phone: Option<String>,
    department: Option<String>,
    position: Option<String>,
    start_date: Option<chrono::NaiveDate>,
    onboarding_status: String,
    onboarding_step: i32,
    del_flag: bool,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl From<StaffRow> for StaffMember {
    fn from(row: StaffRow) -> Self {
        let onboarding_status = row
            .onboarding_status
            .parse::<OnboardingStatus>()
            .unwrap_or(OnboardingStatus::InProgress);
        StaffMember {
            id: row.id,
            business_id: row.business_id,
            employee_number: row.employee_number,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            department: row.department,
            position: row.position,
            start_date: row.start_date,
            onboarding_status,
            onboarding_step: row.onboarding_step,
            del_flag: row.del_flag,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const STAFF_COLUMNS: &str = "id, business_id, employee_number, first_name, last_name, email, phone, department, position, start_date, onboarding_status, onboarding_step, del_flag, created_at, updated_at";

/// Step and status derived from a draft
fn onboarding_progress(draft: &StaffDraft) -> (i32, OnboardingStatus) {
    match wizard::first_incomplete_step(draft) {
        Some(step) => (step as i32, OnboardingStatus::InProgress),
        None => (ONBOARDING_STEP_COUNT as i32, OnboardingStatus::Completed),
    }
}

impl StaffService {
    /// Create a new StaffService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a staff record from an onboarding draft.
    /// The identity step must validate; later steps may still be open.
    pub async fn create_staff(
        &self,
        business_id: Uuid,
        draft: StaffDraft,
    ) -> AppResult<StaffMember> {
        wizard::validate_step(0, &draft).map_err(|e| AppError::Validation {
            field: e.field.to_string(),
            message: e.message.to_string(),
        })?;

        // Identity step guarantees these are present
        let employee_number = draft.employee_number.clone().unwrap_or_default();
        let first_name = draft.first_name.clone().unwrap_or_default();
        let last_name = draft.last_name.clone().unwrap_or_default();

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM staff_members WHERE business_id = $1 AND employee_number = $2 AND del_flag = FALSE",
        )
        .bind(business_id)
        .bind(&employee_number)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("employee number".to_string()));
        }

        let (step, status) = onboarding_progress(&draft);

        let row = sqlx::query_as::<_, StaffRow>(&format!(
            r#"
            INSERT INTO staff_members (business_id, employee_number, first_name, last_name, email,
                                       phone, department, position, start_date, onboarding_status,
                                       onboarding_step)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            STAFF_COLUMNS
        ))
        .bind(business_id)
        .bind(&employee_number)
        .bind(&first_name)
        .bind(&last_name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.department)
        .bind(&draft.position)
        .bind(draft.start_date)
        .bind(status.as_str())
        .bind(step)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Resubmit the onboarding draft for an existing record.
    /// Fields are replaced wholesale and progress recomputed.
    pub async fn update_onboarding(
        &self,
        business_id: Uuid,
        staff_id: Uuid,
        draft: StaffDraft,
    ) -> AppResult<StaffMember> {
        wizard::validate_step(0, &draft).map_err(|e| AppError::Validation {
            field: e.field.to_string(),
            message: e.message.to_string(),
        })?;

        let (step, status) = onboarding_progress(&draft);

        let row = sqlx::query_as::<_, StaffRow>(&format!(
            r#"
            UPDATE staff_members
            SET employee_number = $1, first_name = $2, last_name = $3, email = $4, phone = $5,
                department = $6, position = $7, start_date = $8, onboarding_status = $9,
                onboarding_step = $10, mod_flag = TRUE, updated_at = NOW()
            WHERE id = $11 AND business_id = $12 AND del_flag = FALSE
            RETURNING {}
            "#,
            STAFF_COLUMNS
        ))
        .bind(&draft.employee_number)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.department)
        .bind(&draft.position)
        .bind(draft.start_date)
        .bind(status.as_str())
        .bind(step)
        .bind(staff_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff member".to_string()))?;

        Ok(row.into())
    }

    /// Get a staff member by ID
    pub async fn get_staff(&self, business_id: Uuid, staff_id: Uuid) -> AppResult<StaffMember> {
        let row = sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {} FROM staff_members WHERE id = $1 AND business_id = $2 AND del_flag = FALSE",
            STAFF_COLUMNS
        ))
        .bind(staff_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff member".to_string()))?;

        Ok(row.into())
    }

    /// List staff for a business
    pub async fn list_staff(&self, business_id: Uuid) -> AppResult<Vec<StaffMember>> {
        let rows = sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {} FROM staff_members WHERE business_id = $1 AND del_flag = FALSE ORDER BY employee_number",
            STAFF_COLUMNS
        ))
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Soft-delete a staff record
    pub async fn delete_staff(&self, business_id: Uuid, staff_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE staff_members SET del_flag = TRUE, updated_at = NOW() WHERE id = $1 AND business_id = $2 AND del_flag = FALSE",
        )
        .bind(staff_id)
        .bind(business_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Staff member".to_string()));
        }

        Ok(())
    }
}
