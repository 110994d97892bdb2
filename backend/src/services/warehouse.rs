//! Warehouse registry service

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Warehouse;
use shared::types::GpsCoordinates;
use shared::validation::validate_warehouse_code;

/// Warehouse service
#[derive(Clone)]
pub struct WarehouseService {
    db: PgPool,
}

/// Database row for a warehouse
#[derive(Debug, sqlx::FromRow)]
struct WarehouseRow {
    id: Uuid,
    business_id: Uuid,
    code: String,
    name: String,
    address: Option<String>,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
    capacity: Option<i32>,
    is_active: bool,
    del_flag: bool,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl From<WarehouseRow> for Warehouse {
    fn from(row: WarehouseRow) -> Self {
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => Some(GpsCoordinates::new(lat, lng)),
            _ => None,
        };
        Warehouse {
            id: row.id,
            business_id: row.business_id,
            code: row.code,
            name: row.name,
            address: row.address,
            location,
            capacity: row.capacity,
            is_active: row.is_active,
            del_flag: row.del_flag,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const WAREHOUSE_COLUMNS: &str = "id, business_id, code, name, address, latitude, longitude, capacity, is_active, del_flag, created_at, updated_at";

/// Input for creating a warehouse
#[derive(Debug, Deserialize)]
pub struct CreateWarehouseInput {
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub location: Option<GpsCoordinates>,
    pub capacity: Option<i32>,
}

/// Input for updating a warehouse
#[derive(Debug, Deserialize)]
pub struct UpdateWarehouseInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Option<GpsCoordinates>,
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

impl WarehouseService {
    /// Create a new WarehouseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a warehouse
    pub async fn create_warehouse(
        &self,
        business_id: Uuid,
        input: CreateWarehouseInput,
    ) -> AppResult<Warehouse> {
        validate_warehouse_code(&input.code).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
        })?;
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Warehouse name is required".to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM warehouses WHERE business_id = $1 AND code = $2 AND del_flag = FALSE",
        )
        .bind(business_id)
        .bind(&input.code)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("warehouse code".to_string()));
        }

        let row = sqlx::query_as::<_, WarehouseRow>(&format!(
            r#"
            INSERT INTO warehouses (business_id, code, name, address, latitude, longitude, capacity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            WAREHOUSE_COLUMNS
        ))
        .bind(business_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(&input.address)
        .bind(input.location.as_ref().map(|l| l.latitude))
        .bind(input.location.as_ref().map(|l| l.longitude))
        .bind(input.capacity)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a warehouse
    pub async fn update_warehouse(
        &self,
        business_id: Uuid,
        warehouse_id: Uuid,
        input: UpdateWarehouseInput,
    ) -> AppResult<Warehouse> {
        let row = sqlx::query_as::<_, WarehouseRow>(&format!(
            r#"
            UPDATE warehouses
            SET name = COALESCE($1, name),
                address = COALESCE($2, address),
                latitude = COALESCE($3, latitude),
                longitude = COALESCE($4, longitude),
                capacity = COALESCE($5, capacity),
                is_active = COALESCE($6, is_active),
                mod_flag = TRUE,
                updated_at = NOW()
            WHERE id = $7 AND business_id = $8 AND del_flag = FALSE
            RETURNING {}
            "#,
            WAREHOUSE_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.address)
        .bind(input.location.as_ref().map(|l| l.latitude))
        .bind(input.location.as_ref().map(|l| l.longitude))
        .bind(input.capacity)
        .bind(input.is_active)
        .bind(warehouse_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        Ok(row.into())
    }

    /// Get a warehouse by ID
    pub async fn get_warehouse(
        &self,
        business_id: Uuid,
        warehouse_id: Uuid,
    ) -> AppResult<Warehouse> {
        let row = sqlx::query_as::<_, WarehouseRow>(&format!(
            "SELECT {} FROM warehouses WHERE id = $1 AND business_id = $2 AND del_flag = FALSE",
            WAREHOUSE_COLUMNS
        ))
        .bind(warehouse_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))?;

        Ok(row.into())
    }

    /// List warehouses for a business
    pub async fn list_warehouses(&self, business_id: Uuid) -> AppResult<Vec<Warehouse>> {
        let rows = sqlx::query_as::<_, WarehouseRow>(&format!(
            "SELECT {} FROM warehouses WHERE business_id = $1 AND del_flag = FALSE ORDER BY code",
            WAREHOUSE_COLUMNS
        ))
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Soft-delete a warehouse.
    /// Refused while the warehouse still holds stock.
    pub async fn delete_warehouse(&self, business_id: Uuid, warehouse_id: Uuid) -> AppResult<()> {
        let remaining = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT SUM(remaining) FROM stock_batches WHERE business_id = $1 AND warehouse_id = $2",
        )
        .bind(business_id)
        .bind(warehouse_id)
        .fetch_one(&self.db)
        .await?
        .unwrap_or(0);

        if remaining > 0 {
            return Err(AppError::Conflict {
                resource: "warehouse".to_string(),
                message: format!("Warehouse still holds {} units of stock", remaining),
            });
        }

        let result = sqlx::query(
            "UPDATE warehouses SET del_flag = TRUE, updated_at = NOW() WHERE id = $1 AND business_id = $2 AND del_flag = FALSE",
        )
        .bind(warehouse_id)
        .bind(business_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        Ok(())
    }
}
