//! Shipment lifecycle service
//!
//! Shipments move between warehouses on a transport. Status changes are
//! checked against the transition table on the status enum; the shipment row
//! is locked while a transition is applied so pickup and delivery stamps
//! cannot race.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{
    compute_total_value, generate_shipment_number, generate_tracking_number, line_item_total,
    ItemCondition, QualityCheck, Shipment, ShipmentItem, ShipmentLocation, ShipmentPriority,
    ShipmentStatus, TemperatureRange,
};
use shared::validation::validate_temperature_range;

/// Shipment service for transport movements between warehouses
#[derive(Clone)]
pub struct ShipmentService {
    db: PgPool,
}

/// Database row for a shipment
#[derive(Debug, sqlx::FromRow)]
struct ShipmentRow {
    id: Uuid,
    business_id: Uuid,
    shipment_number: String,
    tracking_number: String,
    origin_warehouse_id: Uuid,
    destination_warehouse_id: Uuid,
    transport_id: Uuid,
    status: String,
    priority: String,
    scheduled_pickup_date: Option<chrono::DateTime<Utc>>,
    actual_pickup_date: Option<chrono::DateTime<Utc>>,
    scheduled_delivery_date: Option<chrono::DateTime<Utc>>,
    actual_delivery_date: Option<chrono::DateTime<Utc>>,
    delivery_notes: Option<String>,
    total_value: Decimal,
    current_location: Option<serde_json::Value>,
    location_history: serde_json::Value,
    temperature_min: Option<Decimal>,
    temperature_max: Option<Decimal>,
    current_temperature: Option<Decimal>,
    is_insured: bool,
    insurance_value: Option<Decimal>,
    quality_check: Option<serde_json::Value>,
    del_flag: bool,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

const SHIPMENT_COLUMNS: &str = r#"id, business_id, shipment_number, tracking_number,
    origin_warehouse_id, destination_warehouse_id, transport_id, status, priority,
    scheduled_pickup_date, actual_pickup_date, scheduled_delivery_date, actual_delivery_date,
    delivery_notes, total_value, current_location, location_history, temperature_min,
    temperature_max, current_temperature, is_insured, insurance_value, quality_check,
    del_flag, created_at, updated_at"#;

/// Database row for a shipment line item
#[derive(Debug, Clone, sqlx::FromRow)]
struct ItemRow {
    shipment_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
    total_value: Decimal,
    condition: String,
    batch_number: Option<String>,
    expiry_date: Option<chrono::NaiveDate>,
}

impl ItemRow {
    fn into_item(self) -> ShipmentItem {
        let condition = match self.condition.as_str() {
            "damaged" => ItemCondition::Damaged,
            "expired" => ItemCondition::Expired,
            _ => ItemCondition::Good,
        };
        ShipmentItem {
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_value: self.total_value,
            condition,
            batch_number: self.batch_number,
            expiry_date: self.expiry_date,
        }
    }
}

fn item_condition_str(condition: ItemCondition) -> &'static str {
    match condition {
        ItemCondition::Good => "good",
        ItemCondition::Damaged => "damaged",
        ItemCondition::Expired => "expired",
    }
}

fn assemble(row: ShipmentRow, items: Vec<ShipmentItem>) -> AppResult<Shipment> {
    let status = row
        .status
        .parse::<ShipmentStatus>()
        .map_err(|_| AppError::Internal(format!("Unknown shipment status '{}'", row.status)))?;
    let priority = match row.priority.as_str() {
        "low" => ShipmentPriority::Low,
        "high" => ShipmentPriority::High,
        "urgent" => ShipmentPriority::Urgent,
        _ => ShipmentPriority::Normal,
    };
    let current_location: Option<ShipmentLocation> = row
        .current_location
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let location_history: Vec<ShipmentLocation> = serde_json::from_value(row.location_history)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let quality_check: Option<QualityCheck> = row
        .quality_check
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let temperature_range = match (row.temperature_min, row.temperature_max) {
        (Some(min), Some(max)) => Some(TemperatureRange {
            min_celsius: min,
            max_celsius: max,
        }),
        _ => None,
    };

    Ok(Shipment {
        id: row.id,
        business_id: row.business_id,
        shipment_number: row.shipment_number,
        tracking_number: row.tracking_number,
        origin_warehouse_id: row.origin_warehouse_id,
        destination_warehouse_id: row.destination_warehouse_id,
        transport_id: row.transport_id,
        items,
        status,
        priority,
        scheduled_pickup_date: row.scheduled_pickup_date,
        actual_pickup_date: row.actual_pickup_date,
        scheduled_delivery_date: row.scheduled_delivery_date,
        actual_delivery_date: row.actual_delivery_date,
        delivery_notes: row.delivery_notes,
        total_value: row.total_value,
        current_location,
        location_history,
        temperature_range,
        current_temperature: row.current_temperature,
        is_insured: row.is_insured,
        insurance_value: row.insurance_value,
        quality_check,
        del_flag: row.del_flag,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Input line item for shipment creation
#[derive(Debug, Deserialize)]
pub struct CreateShipmentItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub condition: ItemCondition,
    pub batch_number: Option<String>,
    pub expiry_date: Option<chrono::NaiveDate>,
}

/// Input for creating a shipment
#[derive(Debug, Deserialize)]
pub struct CreateShipmentInput {
    pub origin_warehouse_id: Uuid,
    pub destination_warehouse_id: Uuid,
    pub transport_id: Uuid,
    pub items: Vec<CreateShipmentItem>,
    pub priority: Option<ShipmentPriority>,
    pub scheduled_pickup_date: Option<chrono::DateTime<Utc>>,
    pub scheduled_delivery_date: Option<chrono::DateTime<Utc>>,
    pub temperature_range: Option<TemperatureRange>,
    #[serde(default)]
    pub is_insured: bool,
    pub insurance_value: Option<Decimal>,
}

/// Result of shipment creation
#[derive(Debug, Serialize)]
pub struct CreateShipmentResponse {
    pub shipment_id: Uuid,
    pub shipment_number: String,
    pub tracking_number: String,
    pub total_value: Decimal,
}

/// Input for a status update
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: ShipmentStatus,
    pub notes: Option<String>,
}

/// Input for a tracking location update
#[derive(Debug, Deserialize)]
pub struct UpdateLocationInput {
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub current_temperature: Option<Decimal>,
}

/// Input for a quality check
#[derive(Debug, Deserialize)]
pub struct QualityCheckInput {
    pub performed_by: String,
    pub results: String,
    #[serde(default)]
    pub issues: Vec<String>,
    pub approved: bool,
}

impl ShipmentService {
    /// Create a new ShipmentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a shipment and mark its transport as in use
    pub async fn create_shipment(
        &self,
        business_id: Uuid,
        input: CreateShipmentInput,
    ) -> AppResult<CreateShipmentResponse> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Shipment must have at least one line item".to_string(),
            });
        }
        if input.origin_warehouse_id == input.destination_warehouse_id {
            return Err(AppError::Validation {
                field: "destination_warehouse_id".to_string(),
                message: "Destination warehouse must differ from origin".to_string(),
            });
        }
        for item in &input.items {
            if item.quantity <= 0 {
                return Err(AppError::Validation {
                    field: "items".to_string(),
                    message: "Line item quantities must be positive".to_string(),
                });
            }
            if item.unit_price < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "items".to_string(),
                    message: "Line item prices cannot be negative".to_string(),
                });
            }
        }
        if let Some(range) = &input.temperature_range {
            validate_temperature_range(range).map_err(|msg| AppError::Validation {
                field: "temperature_range".to_string(),
                message: msg.to_string(),
            })?;
        }

        // Existence checks only; an inactive warehouse can still ship
        self.ensure_warehouse(business_id, input.origin_warehouse_id)
            .await?;
        self.ensure_warehouse(business_id, input.destination_warehouse_id)
            .await?;
        self.ensure_transport(business_id, input.transport_id).await?;

        let items: Vec<ShipmentItem> = input
            .items
            .iter()
            .map(|i| ShipmentItem {
                product_id: i.product_id,
                quantity: i.quantity,
                unit_price: i.unit_price,
                total_value: line_item_total(i.quantity, i.unit_price),
                condition: i.condition,
                batch_number: i.batch_number.clone(),
                expiry_date: i.expiry_date,
            })
            .collect();
        let total_value = compute_total_value(&items);

        let today = Utc::now().date_naive();
        let shipment_number = generate_shipment_number(today, &random_suffix());
        let tracking_number = generate_tracking_number(today, &random_suffix());

        let mut tx = self.db.begin().await?;

        let shipment_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO shipments (business_id, shipment_number, tracking_number,
                                   origin_warehouse_id, destination_warehouse_id, transport_id,
                                   status, priority, scheduled_pickup_date, scheduled_delivery_date,
                                   total_value, temperature_min, temperature_max, is_insured,
                                   insurance_value)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            "#,
        )
        .bind(business_id)
        .bind(&shipment_number)
        .bind(&tracking_number)
        .bind(input.origin_warehouse_id)
        .bind(input.destination_warehouse_id)
        .bind(input.transport_id)
        .bind(input.priority.unwrap_or_default().as_str())
        .bind(input.scheduled_pickup_date)
        .bind(input.scheduled_delivery_date)
        .bind(total_value)
        .bind(input.temperature_range.as_ref().map(|r| r.min_celsius))
        .bind(input.temperature_range.as_ref().map(|r| r.max_celsius))
        .bind(input.is_insured)
        .bind(input.insurance_value)
        .fetch_one(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO shipment_items (shipment_id, product_id, quantity, unit_price,
                                            total_value, condition, batch_number, expiry_date)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(shipment_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total_value)
            .bind(item_condition_str(item.condition))
            .bind(&item.batch_number)
            .bind(item.expiry_date)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE transports SET status = 'in_use', mod_flag = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(input.transport_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(CreateShipmentResponse {
            shipment_id,
            shipment_number,
            tracking_number,
            total_value,
        })
    }

    /// Move a shipment to a new status.
    ///
    /// Delivery stamps the delivery date and releases the transport;
    /// the first move into transit stamps the pickup date. The row stays
    /// locked from read to write, so concurrent updates serialize.
    pub async fn update_status(
        &self,
        business_id: Uuid,
        shipment_id: Uuid,
        input: UpdateStatusInput,
    ) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let (current, transport_id, pickup_stamped) = self
            .lock_shipment_status(&mut tx, business_id, shipment_id)
            .await?;

        if !current.can_transition_to(input.status) {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot move shipment from {} to {}",
                current, input.status
            )));
        }

        match input.status {
            ShipmentStatus::InTransit => {
                if pickup_stamped {
                    sqlx::query(
                        "UPDATE shipments SET status = $1, mod_flag = TRUE, updated_at = NOW() WHERE id = $2",
                    )
                    .bind(input.status.as_str())
                    .bind(shipment_id)
                    .execute(&mut *tx)
                    .await?;
                } else {
                    sqlx::query(
                        "UPDATE shipments SET status = $1, actual_pickup_date = NOW(), mod_flag = TRUE, updated_at = NOW() WHERE id = $2",
                    )
                    .bind(input.status.as_str())
                    .bind(shipment_id)
                    .execute(&mut *tx)
                    .await?;
                }
            }
            ShipmentStatus::Delivered => {
                sqlx::query(
                    r#"
                    UPDATE shipments
                    SET status = $1, actual_delivery_date = NOW(),
                        delivery_notes = $2, mod_flag = TRUE, updated_at = NOW()
                    WHERE id = $3
                    "#,
                )
                .bind(input.status.as_str())
                .bind(&input.notes)
                .bind(shipment_id)
                .execute(&mut *tx)
                .await?;

                self.release_transport(&mut tx, transport_id).await?;
            }
            ShipmentStatus::Cancelled => {
                sqlx::query("UPDATE shipments SET status = $1, mod_flag = TRUE, updated_at = NOW() WHERE id = $2")
                    .bind(input.status.as_str())
                    .bind(shipment_id)
                    .execute(&mut *tx)
                    .await?;

                self.release_transport(&mut tx, transport_id).await?;
            }
            _ => {
                sqlx::query("UPDATE shipments SET status = $1, mod_flag = TRUE, updated_at = NOW() WHERE id = $2")
                    .bind(input.status.as_str())
                    .bind(shipment_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    /// Record the shipment's current location and append it to the history
    pub async fn update_location(
        &self,
        business_id: Uuid,
        shipment_id: Uuid,
        input: UpdateLocationInput,
    ) -> AppResult<()> {
        let location = ShipmentLocation {
            latitude: input.latitude,
            longitude: input.longitude,
            address: input.address,
            notes: input.notes,
            recorded_at: Utc::now(),
        };
        let location_json =
            serde_json::to_value(&location).map_err(|e| AppError::Internal(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE shipments
            SET current_location = $1,
                location_history = location_history || jsonb_build_array($1::jsonb),
                current_temperature = COALESCE($2, current_temperature),
                mod_flag = TRUE, updated_at = NOW()
            WHERE id = $3 AND business_id = $4 AND del_flag = FALSE
            "#,
        )
        .bind(&location_json)
        .bind(input.current_temperature)
        .bind(shipment_id)
        .bind(business_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Shipment".to_string()));
        }

        Ok(())
    }

    /// Store the quality check for a shipment.
    /// Running the check again replaces the previous record entirely.
    pub async fn perform_quality_check(
        &self,
        business_id: Uuid,
        shipment_id: Uuid,
        input: QualityCheckInput,
    ) -> AppResult<()> {
        if input.performed_by.trim().is_empty() {
            return Err(AppError::Validation {
                field: "performed_by".to_string(),
                message: "Inspector name is required".to_string(),
            });
        }

        let check = QualityCheck {
            performed_by: input.performed_by,
            performed_at: Utc::now(),
            results: input.results,
            issues: input.issues,
            approved: input.approved,
        };
        let check_json =
            serde_json::to_value(&check).map_err(|e| AppError::Internal(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE shipments
            SET quality_check = $1, mod_flag = TRUE, updated_at = NOW()
            WHERE id = $2 AND business_id = $3 AND del_flag = FALSE
            "#,
        )
        .bind(&check_json)
        .bind(shipment_id)
        .bind(business_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Shipment".to_string()));
        }

        Ok(())
    }

    /// Get a shipment with its line items
    pub async fn get_shipment(
        &self,
        business_id: Uuid,
        shipment_id: Uuid,
    ) -> AppResult<Shipment> {
        let row = sqlx::query_as::<_, ShipmentRow>(&format!(
            "SELECT {} FROM shipments WHERE id = $1 AND business_id = $2 AND del_flag = FALSE",
            SHIPMENT_COLUMNS
        ))
        .bind(shipment_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Shipment".to_string()))?;

        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT shipment_id, product_id, quantity, unit_price, total_value, condition,
                   batch_number, expiry_date
            FROM shipment_items
            WHERE shipment_id = $1
            ORDER BY id
            "#,
        )
        .bind(shipment_id)
        .fetch_all(&self.db)
        .await?;

        assemble(row, items.into_iter().map(ItemRow::into_item).collect())
    }

    /// List shipments for a business, optionally filtered by status,
    /// newest first
    pub async fn list_shipments(
        &self,
        business_id: Uuid,
        status: Option<ShipmentStatus>,
    ) -> AppResult<Vec<Shipment>> {
        let rows = sqlx::query_as::<_, ShipmentRow>(&format!(
            r#"
            SELECT {} FROM shipments
            WHERE business_id = $1 AND del_flag = FALSE
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            SHIPMENT_COLUMNS
        ))
        .bind(business_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let item_rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT shipment_id, product_id, quantity, unit_price, total_value, condition,
                   batch_number, expiry_date
            FROM shipment_items
            WHERE shipment_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut shipments = Vec::with_capacity(rows.len());
        for row in rows {
            let items = item_rows
                .iter()
                .filter(|i| i.shipment_id == row.id)
                .cloned()
                .map(ItemRow::into_item)
                .collect();
            shipments.push(assemble(row, items)?);
        }

        Ok(shipments)
    }

    /// Soft-delete a shipment
    pub async fn delete_shipment(&self, business_id: Uuid, shipment_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE shipments SET del_flag = TRUE, updated_at = NOW() WHERE id = $1 AND business_id = $2 AND del_flag = FALSE",
        )
        .bind(shipment_id)
        .bind(business_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Shipment".to_string()));
        }

        Ok(())
    }

    /// Lock a shipment row and return its status, transport and whether the
    /// pickup date is already stamped
    async fn lock_shipment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        business_id: Uuid,
        shipment_id: Uuid,
    ) -> AppResult<(ShipmentStatus, Uuid, bool)> {
        let row = sqlx::query_as::<_, (String, Uuid, Option<chrono::DateTime<Utc>>)>(
            r#"
            SELECT status, transport_id, actual_pickup_date
            FROM shipments
            WHERE id = $1 AND business_id = $2 AND del_flag = FALSE
            FOR UPDATE
            "#,
        )
        .bind(shipment_id)
        .bind(business_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Shipment".to_string()))?;

        let status = row
            .0
            .parse::<ShipmentStatus>()
            .map_err(|_| AppError::Internal(format!("Unknown shipment status '{}'", row.0)))?;

        Ok((status, row.1, row.2.is_some()))
    }

    async fn release_transport(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transport_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query("UPDATE transports SET status = 'available', mod_flag = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(transport_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    async fn ensure_warehouse(&self, business_id: Uuid, warehouse_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1 AND business_id = $2 AND del_flag = FALSE)",
        )
        .bind(warehouse_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }
        Ok(())
    }

    async fn ensure_transport(&self, business_id: Uuid, transport_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM transports WHERE id = $1 AND business_id = $2 AND del_flag = FALSE)",
        )
        .bind(transport_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Transport".to_string()));
        }
        Ok(())
    }
}

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}
