//! Transport fleet service

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Transport, TransportStatus, TransportType};

/// Transport service
#[derive(Clone)]
pub struct TransportService {
    db: PgPool,
}

/// Database row for a transport
#[derive(Debug, sqlx::FromRow)]
struct TransportRow {
    id: Uuid,
    business_id: Uuid,
    vehicle_number: String,
    carrier_name: Option<String>,
    transport_type: String,
    capacity_kg: Option<Decimal>,
    status: String,
    del_flag: bool,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl From<TransportRow> for Transport {
    fn from(row: TransportRow) -> Self {
        let transport_type = match row.transport_type.as_str() {
            "van" => TransportType::Van,
            "rail" => TransportType::Rail,
            "air" => TransportType::Air,
            "sea" => TransportType::Sea,
            _ => TransportType::Truck,
        };
        let status = row
            .status
            .parse::<TransportStatus>()
            .unwrap_or(TransportStatus::Available);
        Transport {
            id: row.id,
            business_id: row.business_id,
            vehicle_number: row.vehicle_number,
            carrier_name: row.carrier_name,
            transport_type,
            capacity_kg: row.capacity_kg,
            status,
            del_flag: row.del_flag,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TRANSPORT_COLUMNS: &str = "id, business_id, vehicle_number, carrier_name, transport_type, capacity_kg, status, del_flag, created_at, updated_at";

/// Input for registering a transport
#[derive(Debug, Deserialize)]
pub struct CreateTransportInput {
    pub vehicle_number: String,
    pub carrier_name: Option<String>,
    pub transport_type: TransportType,
    pub capacity_kg: Option<Decimal>,
}

/// Input for updating a transport
#[derive(Debug, Deserialize)]
pub struct UpdateTransportInput {
    pub carrier_name: Option<String>,
    pub capacity_kg: Option<Decimal>,
}

impl TransportService {
    /// Create a new TransportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a transport, available by default
    pub async fn create_transport(
        &self,
        business_id: Uuid,
        input: CreateTransportInput,
    ) -> AppResult<Transport> {
        if input.vehicle_number.trim().is_empty() {
            return Err(AppError::Validation {
                field: "vehicle_number".to_string(),
                message: "Vehicle number is required".to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM transports WHERE business_id = $1 AND vehicle_number = $2 AND del_flag = FALSE",
        )
        .bind(business_id)
        .bind(&input.vehicle_number)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("vehicle number".to_string()));
        }

        let row = sqlx::query_as::<_, TransportRow>(&format!(
            r#"
            INSERT INTO transports (business_id, vehicle_number, carrier_name, transport_type, capacity_kg)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            TRANSPORT_COLUMNS
        ))
        .bind(business_id)
        .bind(&input.vehicle_number)
        .bind(&input.carrier_name)
        .bind(input.transport_type.as_str())
        .bind(input.capacity_kg)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update carrier or capacity details
    pub async fn update_transport(
        &self,
        business_id: Uuid,
        transport_id: Uuid,
        input: UpdateTransportInput,
    ) -> AppResult<Transport> {
        let row = sqlx::query_as::<_, TransportRow>(&format!(
            r#"
            UPDATE transports
            SET carrier_name = COALESCE($1, carrier_name),
                capacity_kg = COALESCE($2, capacity_kg),
                mod_flag = TRUE,
                updated_at = NOW()
            WHERE id = $3 AND business_id = $4 AND del_flag = FALSE
            RETURNING {}
            "#,
            TRANSPORT_COLUMNS
        ))
        .bind(&input.carrier_name)
        .bind(input.capacity_kg)
        .bind(transport_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transport".to_string()))?;

        Ok(row.into())
    }

    /// Move a transport in or out of maintenance.
    /// `in_use` is owned by the shipment lifecycle and cannot be set here.
    pub async fn set_status(
        &self,
        business_id: Uuid,
        transport_id: Uuid,
        status: TransportStatus,
    ) -> AppResult<Transport> {
        if status == TransportStatus::InUse {
            return Err(AppError::Validation {
                field: "status".to_string(),
                message: "Transports are marked in use by shipments, not directly".to_string(),
            });
        }

        let current = self.get_transport(business_id, transport_id).await?;
        if current.status == TransportStatus::InUse {
            return Err(AppError::Conflict {
                resource: "transport".to_string(),
                message: "Transport is currently assigned to a shipment".to_string(),
            });
        }

        let row = sqlx::query_as::<_, TransportRow>(&format!(
            r#"
            UPDATE transports SET status = $1, mod_flag = TRUE, updated_at = NOW()
            WHERE id = $2 AND business_id = $3 AND del_flag = FALSE
            RETURNING {}
            "#,
            TRANSPORT_COLUMNS
        ))
        .bind(status.as_str())
        .bind(transport_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transport".to_string()))?;

        Ok(row.into())
    }

    /// Get a transport by ID
    pub async fn get_transport(
        &self,
        business_id: Uuid,
        transport_id: Uuid,
    ) -> AppResult<Transport> {
        let row = sqlx::query_as::<_, TransportRow>(&format!(
            "SELECT {} FROM transports WHERE id = $1 AND business_id = $2 AND del_flag = FALSE",
            TRANSPORT_COLUMNS
        ))
        .bind(transport_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transport".to_string()))?;

        Ok(row.into())
    }

    /// List transports, optionally filtered by status
    pub async fn list_transports(
        &self,
        business_id: Uuid,
        status: Option<TransportStatus>,
    ) -> AppResult<Vec<Transport>> {
        let rows = sqlx::query_as::<_, TransportRow>(&format!(
            r#"
            SELECT {} FROM transports
            WHERE business_id = $1 AND del_flag = FALSE
              AND ($2::text IS NULL OR status = $2)
            ORDER BY vehicle_number
            "#,
            TRANSPORT_COLUMNS
        ))
        .bind(business_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Soft-delete a transport. Refused while assigned to a shipment.
    pub async fn delete_transport(&self, business_id: Uuid, transport_id: Uuid) -> AppResult<()> {
        let current = self.get_transport(business_id, transport_id).await?;
        if current.status == TransportStatus::InUse {
            return Err(AppError::Conflict {
                resource: "transport".to_string(),
                message: "Transport is currently assigned to a shipment".to_string(),
            });
        }

        sqlx::query(
            "UPDATE transports SET del_flag = TRUE, updated_at = NOW() WHERE id = $1 AND business_id = $2",
        )
        .bind(transport_id)
        .bind(business_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
