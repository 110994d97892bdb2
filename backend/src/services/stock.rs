//! Stock batch ledger service
//!
//! All stock lives in per-arrival batches owned by a (product, warehouse)
//! pair. Reductions consume batches oldest-first; every mutation runs in a
//! single transaction together with the denormalized product counter and
//! the movement ledger row, with consumed batches locked for the duration.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{generate_batch_number, MovementType, StockBatch, StockMovement};

/// Manual adjustments default to a one-year shelf life
const DEFAULT_ADJUSTMENT_EXPIRY_DAYS: i64 = 365;

/// Stock service for managing batches and movements
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Database row for a stock batch
#[derive(Debug, sqlx::FromRow)]
struct BatchRow {
    id: Uuid,
    business_id: Uuid,
    product_id: Uuid,
    warehouse_id: Uuid,
    batch_number: String,
    quantity: i32,
    remaining: i32,
    unit_cost: Decimal,
    shipping_cost_per_unit: Decimal,
    selling_price: Decimal,
    expiry_date: NaiveDate,
    quality_grade: Option<String>,
    is_depleted: bool,
    notes: Option<String>,
    created_at: chrono::DateTime<Utc>,
}

impl From<BatchRow> for StockBatch {
    fn from(row: BatchRow) -> Self {
        StockBatch {
            id: row.id,
            business_id: row.business_id,
            product_id: row.product_id,
            warehouse_id: row.warehouse_id,
            batch_number: row.batch_number,
            quantity: row.quantity,
            remaining: row.remaining,
            unit_cost: row.unit_cost,
            shipping_cost_per_unit: row.shipping_cost_per_unit,
            selling_price: row.selling_price,
            expiry_date: row.expiry_date,
            quality_grade: row.quality_grade,
            is_depleted: row.is_depleted,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Database row for a stock movement
#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: Uuid,
    business_id: Uuid,
    product_id: Uuid,
    warehouse_id: Uuid,
    movement_type: String,
    quantity: i32,
    unit_price: Option<Decimal>,
    reason: Option<String>,
    created_at: chrono::DateTime<Utc>,
    created_by: Option<Uuid>,
}

impl From<MovementRow> for StockMovement {
    fn from(row: MovementRow) -> Self {
        let movement_type = match row.movement_type.as_str() {
            "receipt" => MovementType::Receipt,
            "adjustment_in" => MovementType::AdjustmentIn,
            "adjustment_out" => MovementType::AdjustmentOut,
            "transfer_in" => MovementType::TransferIn,
            "transfer_out" => MovementType::TransferOut,
            _ => MovementType::Sale,
        };
        StockMovement {
            id: row.id,
            business_id: row.business_id,
            product_id: row.product_id,
            warehouse_id: row.warehouse_id,
            movement_type,
            quantity: row.quantity,
            unit_price: row.unit_price,
            reason: row.reason,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}

/// Input for receiving new stock into a warehouse
#[derive(Debug, Deserialize)]
pub struct ReceiveStockInput {
    pub warehouse_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub shipping_cost_per_unit: Option<Decimal>,
    pub selling_price: Decimal,
    pub expiry_date: NaiveDate,
    pub batch_number: Option<String>,
    pub quality_grade: Option<String>,
    pub notes: Option<String>,
}

/// Input for a manual stock adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    pub warehouse_id: Uuid,
    pub product_id: Uuid,
    /// Positive adds a new batch, negative consumes oldest batches first
    pub delta: i32,
    pub reason: String,
}

/// Input for a warehouse-to-warehouse transfer
#[derive(Debug, Deserialize)]
pub struct TransferStockInput {
    pub from_warehouse_id: Uuid,
    pub to_warehouse_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Input for recording a sale out of a warehouse
#[derive(Debug, Deserialize)]
pub struct RecordSaleInput {
    pub warehouse_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

/// One entry of a batch price update
#[derive(Debug, Deserialize)]
pub struct BatchPriceUpdate {
    pub batch_id: Uuid,
    pub new_selling_price: Decimal,
    pub expiry_date: Option<NaiveDate>,
}

/// Stock of one product within a warehouse
#[derive(Debug, Serialize)]
pub struct WarehouseStockEntry {
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub unit: String,
    pub total_quantity: i32,
    pub average_selling_price: Decimal,
    pub batches: Vec<StockBatch>,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Receive a new arrival of stock, creating one batch
    pub async fn receive_stock(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        input: ReceiveStockInput,
    ) -> AppResult<StockBatch> {
        if input.quantity <= 0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be positive".to_string(),
            });
        }
        if input.unit_cost < Decimal::ZERO || input.selling_price < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "unit_cost".to_string(),
                message: "Costs and prices cannot be negative".to_string(),
            });
        }

        self.ensure_product(business_id, input.product_id).await?;
        self.ensure_warehouse(business_id, input.warehouse_id).await?;

        let batch_number = input
            .batch_number
            .unwrap_or_else(|| generate_batch_number(Utc::now().date_naive(), &random_suffix()));
        let shipping = input.shipping_cost_per_unit.unwrap_or(Decimal::ZERO);

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, BatchRow>(
            r#"
            INSERT INTO stock_batches (business_id, product_id, warehouse_id, batch_number,
                                       quantity, remaining, unit_cost, shipping_cost_per_unit,
                                       selling_price, expiry_date, quality_grade, notes)
            VALUES ($1, $2, $3, $4, $5, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, business_id, product_id, warehouse_id, batch_number, quantity, remaining,
                      unit_cost, shipping_cost_per_unit, selling_price, expiry_date, quality_grade,
                      is_depleted, notes, created_at
            "#,
        )
        .bind(business_id)
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(&batch_number)
        .bind(input.quantity)
        .bind(input.unit_cost)
        .bind(shipping)
        .bind(input.selling_price)
        .bind(input.expiry_date)
        .bind(&input.quality_grade)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        self.bump_product_counter(&mut tx, input.product_id, input.quantity)
            .await?;
        self.record_movement(
            &mut tx,
            business_id,
            input.product_id,
            input.warehouse_id,
            MovementType::Receipt,
            input.quantity,
            None,
            None,
            Some(user_id),
        )
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Adjust stock by a signed delta.
    ///
    /// Positive deltas create a batch with no cost basis (manual counts
    /// carry no supplier invoice). Negative deltas drain oldest batches
    /// first and deliberately do not fail when the warehouse holds less
    /// than requested: a count correction reduces to whatever is there.
    pub async fn adjust_stock(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        input: AdjustStockInput,
    ) -> AppResult<()> {
        if input.delta == 0 {
            return Err(AppError::Validation {
                field: "delta".to_string(),
                message: "Adjustment delta cannot be zero".to_string(),
            });
        }
        if input.reason.trim().is_empty() {
            return Err(AppError::Validation {
                field: "reason".to_string(),
                message: "Adjustment reason is required".to_string(),
            });
        }

        self.ensure_product(business_id, input.product_id).await?;
        self.ensure_warehouse(business_id, input.warehouse_id).await?;

        let mut tx = self.db.begin().await?;

        if input.delta > 0 {
            let expiry = Utc::now().date_naive()
                + chrono::Duration::days(DEFAULT_ADJUSTMENT_EXPIRY_DAYS);
            let batch_number = generate_batch_number(Utc::now().date_naive(), &random_suffix());

            sqlx::query(
                r#"
                INSERT INTO stock_batches (business_id, product_id, warehouse_id, batch_number,
                                           quantity, remaining, unit_cost, shipping_cost_per_unit,
                                           selling_price, expiry_date, notes)
                VALUES ($1, $2, $3, $4, $5, $5, 0, 0, 0, $6, $7)
                "#,
            )
            .bind(business_id)
            .bind(input.product_id)
            .bind(input.warehouse_id)
            .bind(&batch_number)
            .bind(input.delta)
            .bind(expiry)
            .bind(&input.reason)
            .execute(&mut *tx)
            .await?;

            self.bump_product_counter(&mut tx, input.product_id, input.delta)
                .await?;
            self.record_movement(
                &mut tx,
                business_id,
                input.product_id,
                input.warehouse_id,
                MovementType::AdjustmentIn,
                input.delta,
                None,
                Some(&input.reason),
                Some(user_id),
            )
            .await?;
        } else {
            let consumed = self
                .consume_fifo(
                    &mut tx,
                    business_id,
                    input.warehouse_id,
                    input.product_id,
                    -input.delta,
                )
                .await?;

            if consumed > 0 {
                self.bump_product_counter(&mut tx, input.product_id, -consumed)
                    .await?;
                self.record_movement(
                    &mut tx,
                    business_id,
                    input.product_id,
                    input.warehouse_id,
                    MovementType::AdjustmentOut,
                    consumed,
                    None,
                    Some(&input.reason),
                    Some(user_id),
                )
                .await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    /// Transfer stock between warehouses.
    ///
    /// The whole transfer is one transaction: source batches are locked,
    /// availability is checked up front, and either every mirrored batch is
    /// created at the destination or nothing is written at all.
    pub async fn transfer_stock(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        input: TransferStockInput,
    ) -> AppResult<Vec<StockBatch>> {
        if input.quantity <= 0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Transfer quantity must be positive".to_string(),
            });
        }
        if input.from_warehouse_id == input.to_warehouse_id {
            return Err(AppError::Validation {
                field: "to_warehouse_id".to_string(),
                message: "Destination warehouse must differ from source".to_string(),
            });
        }

        self.ensure_product(business_id, input.product_id).await?;
        self.ensure_warehouse(business_id, input.from_warehouse_id)
            .await?;
        self.ensure_warehouse(business_id, input.to_warehouse_id)
            .await?;

        let mut tx = self.db.begin().await?;

        let source = self
            .lock_open_batches(
                &mut tx,
                business_id,
                input.from_warehouse_id,
                input.product_id,
            )
            .await?;

        let available: i32 = source.iter().map(|b| b.remaining).sum();
        if available < input.quantity {
            return Err(AppError::InsufficientStock(format!(
                "Requested {} units but only {} available",
                input.quantity, available
            )));
        }

        let plan = plan_fifo_consumption(
            &source
                .iter()
                .map(|b| (b.id, b.remaining))
                .collect::<Vec<_>>(),
            input.quantity,
        );

        let mut transferred = Vec::with_capacity(plan.len());

        for (batch_id, take) in plan {
            let Some(batch) = source.iter().find(|b| b.id == batch_id) else {
                continue;
            };

            self.reduce_batch(&mut tx, batch_id, batch.remaining - take)
                .await?;

            // Mirror the consumed slice into the destination warehouse,
            // carrying over the batch's cost, price, expiry and lot number.
            let row = sqlx::query_as::<_, BatchRow>(
                r#"
                INSERT INTO stock_batches (business_id, product_id, warehouse_id, batch_number,
                                           quantity, remaining, unit_cost, shipping_cost_per_unit,
                                           selling_price, expiry_date, quality_grade, notes)
                VALUES ($1, $2, $3, $4, $5, $5, $6, $7, $8, $9, $10, $11)
                RETURNING id, business_id, product_id, warehouse_id, batch_number, quantity,
                          remaining, unit_cost, shipping_cost_per_unit, selling_price, expiry_date,
                          quality_grade, is_depleted, notes, created_at
                "#,
            )
            .bind(business_id)
            .bind(input.product_id)
            .bind(input.to_warehouse_id)
            .bind(&batch.batch_number)
            .bind(take)
            .bind(batch.unit_cost)
            .bind(batch.shipping_cost_per_unit)
            .bind(batch.selling_price)
            .bind(batch.expiry_date)
            .bind(&batch.quality_grade)
            .bind(&batch.notes)
            .fetch_one(&mut *tx)
            .await?;

            transferred.push(row.into());
        }

        self.record_movement(
            &mut tx,
            business_id,
            input.product_id,
            input.from_warehouse_id,
            MovementType::TransferOut,
            input.quantity,
            None,
            None,
            Some(user_id),
        )
        .await?;
        self.record_movement(
            &mut tx,
            business_id,
            input.product_id,
            input.to_warehouse_id,
            MovementType::TransferIn,
            input.quantity,
            None,
            None,
            Some(user_id),
        )
        .await?;

        tx.commit().await?;

        Ok(transferred)
    }

    /// Record a sale, consuming stock oldest-first.
    /// Unlike adjustments, selling more than is on hand is an error.
    pub async fn record_sale(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        input: RecordSaleInput,
    ) -> AppResult<()> {
        if input.quantity <= 0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Sale quantity must be positive".to_string(),
            });
        }
        if input.unit_price < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "unit_price".to_string(),
                message: "Unit price cannot be negative".to_string(),
            });
        }

        self.ensure_product(business_id, input.product_id).await?;
        self.ensure_warehouse(business_id, input.warehouse_id).await?;

        let mut tx = self.db.begin().await?;

        let open = self
            .lock_open_batches(&mut tx, business_id, input.warehouse_id, input.product_id)
            .await?;
        let available: i32 = open.iter().map(|b| b.remaining).sum();
        if available < input.quantity {
            return Err(AppError::InsufficientStock(format!(
                "Requested {} units but only {} available",
                input.quantity, available
            )));
        }

        let consumed = self
            .consume_fifo(
                &mut tx,
                business_id,
                input.warehouse_id,
                input.product_id,
                input.quantity,
            )
            .await?;

        self.bump_product_counter(&mut tx, input.product_id, -consumed)
            .await?;
        self.record_movement(
            &mut tx,
            business_id,
            input.product_id,
            input.warehouse_id,
            MovementType::Sale,
            consumed,
            Some(input.unit_price),
            input.notes.as_deref(),
            Some(user_id),
        )
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Apply independent price updates to a list of batches
    pub async fn update_batch_prices(
        &self,
        business_id: Uuid,
        updates: Vec<BatchPriceUpdate>,
    ) -> AppResult<Vec<StockBatch>> {
        let mut updated = Vec::with_capacity(updates.len());

        for update in updates {
            if update.new_selling_price < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "new_selling_price".to_string(),
                    message: "Selling price cannot be negative".to_string(),
                });
            }

            let row = sqlx::query_as::<_, BatchRow>(
                r#"
                UPDATE stock_batches
                SET selling_price = $1, expiry_date = COALESCE($2, expiry_date)
                WHERE id = $3 AND business_id = $4
                RETURNING id, business_id, product_id, warehouse_id, batch_number, quantity,
                          remaining, unit_cost, shipping_cost_per_unit, selling_price, expiry_date,
                          quality_grade, is_depleted, notes, created_at
                "#,
            )
            .bind(update.new_selling_price)
            .bind(update.expiry_date)
            .bind(update.batch_id)
            .bind(business_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Batch {}", update.batch_id)))?;

            updated.push(row.into());
        }

        Ok(updated)
    }

    /// Current stock of a warehouse, grouped per product in memory
    pub async fn get_warehouse_stock(
        &self,
        business_id: Uuid,
        warehouse_id: Uuid,
    ) -> AppResult<Vec<WarehouseStockEntry>> {
        self.ensure_warehouse(business_id, warehouse_id).await?;

        let rows = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT b.id, b.business_id, b.product_id, b.warehouse_id, b.batch_number, b.quantity,
                   b.remaining, b.unit_cost, b.shipping_cost_per_unit, b.selling_price,
                   b.expiry_date, b.quality_grade, b.is_depleted, b.notes, b.created_at
            FROM stock_batches b
            WHERE b.business_id = $1 AND b.warehouse_id = $2 AND b.is_depleted = FALSE
            ORDER BY b.product_id, b.created_at
            "#,
        )
        .bind(business_id)
        .bind(warehouse_id)
        .fetch_all(&self.db)
        .await?;

        let names = sqlx::query_as::<_, (Uuid, String, String, String)>(
            "SELECT id, name, sku, unit FROM products WHERE business_id = $1 AND del_flag = FALSE",
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        let mut entries: Vec<WarehouseStockEntry> = Vec::new();
        for row in rows {
            let batch: StockBatch = row.into();
            match entries.iter_mut().find(|e| e.product_id == batch.product_id) {
                Some(entry) => {
                    entry.total_quantity += batch.remaining;
                    entry.batches.push(batch);
                }
                None => {
                    let (name, sku, unit) = names
                        .iter()
                        .find(|(id, _, _, _)| *id == batch.product_id)
                        .map(|(_, n, s, u)| (n.clone(), s.clone(), u.clone()))
                        .unwrap_or_default();
                    entries.push(WarehouseStockEntry {
                        product_id: batch.product_id,
                        product_name: name,
                        sku,
                        unit,
                        total_quantity: batch.remaining,
                        average_selling_price: Decimal::ZERO,
                        batches: vec![batch],
                    });
                }
            }
        }

        for entry in &mut entries {
            entry.average_selling_price = weighted_average_price(&entry.batches);
        }

        Ok(entries)
    }

    /// Hard-delete every batch of a product in one warehouse.
    /// The only operation that physically removes batch documents.
    pub async fn remove_product_from_warehouse(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        warehouse_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<()> {
        self.ensure_product(business_id, product_id).await?;
        self.ensure_warehouse(business_id, warehouse_id).await?;

        let mut tx = self.db.begin().await?;

        let removed: Vec<i32> = sqlx::query_scalar(
            r#"
            DELETE FROM stock_batches
            WHERE business_id = $1 AND warehouse_id = $2 AND product_id = $3
            RETURNING remaining
            "#,
        )
        .bind(business_id)
        .bind(warehouse_id)
        .bind(product_id)
        .fetch_all(&mut *tx)
        .await?;

        let removed_remaining: i32 = removed.iter().sum();

        if removed_remaining > 0 {
            self.bump_product_counter(&mut tx, product_id, -removed_remaining)
                .await?;
            self.record_movement(
                &mut tx,
                business_id,
                product_id,
                warehouse_id,
                MovementType::AdjustmentOut,
                removed_remaining,
                None,
                Some("Product removed from warehouse"),
                Some(user_id),
            )
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// List movements for a business, newest first
    pub async fn list_movements(
        &self,
        business_id: Uuid,
        product_id: Option<Uuid>,
    ) -> AppResult<Vec<StockMovement>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, business_id, product_id, warehouse_id, movement_type, quantity,
                   unit_price, reason, created_at, created_by
            FROM stock_movements
            WHERE business_id = $1 AND ($2::uuid IS NULL OR product_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(business_id)
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Lock and return the non-depleted batches of a (product, warehouse)
    /// pair, oldest first
    async fn lock_open_batches(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        business_id: Uuid,
        warehouse_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Vec<StockBatch>> {
        let rows = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT id, business_id, product_id, warehouse_id, batch_number, quantity, remaining,
                   unit_cost, shipping_cost_per_unit, selling_price, expiry_date, quality_grade,
                   is_depleted, notes, created_at
            FROM stock_batches
            WHERE business_id = $1 AND warehouse_id = $2 AND product_id = $3
              AND is_depleted = FALSE
            ORDER BY created_at ASC
            FOR UPDATE
            "#,
        )
        .bind(business_id)
        .bind(warehouse_id)
        .bind(product_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Consume up to `requested` units oldest-first; returns how many units
    /// were actually consumed (less than requested when stock runs out)
    async fn consume_fifo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        business_id: Uuid,
        warehouse_id: Uuid,
        product_id: Uuid,
        requested: i32,
    ) -> AppResult<i32> {
        let open = self
            .lock_open_batches(tx, business_id, warehouse_id, product_id)
            .await?;

        let plan = plan_fifo_consumption(
            &open.iter().map(|b| (b.id, b.remaining)).collect::<Vec<_>>(),
            requested,
        );

        let mut consumed = 0;
        for (batch_id, take) in plan {
            let Some(batch) = open.iter().find(|b| b.id == batch_id) else {
                continue;
            };
            self.reduce_batch(tx, batch_id, batch.remaining - take).await?;
            consumed += take;
        }

        Ok(consumed)
    }

    /// Set a batch's remaining quantity, flagging depletion at zero
    async fn reduce_batch(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        batch_id: Uuid,
        new_remaining: i32,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE stock_batches SET remaining = $1, is_depleted = ($1 = 0) WHERE id = $2",
        )
        .bind(new_remaining)
        .bind(batch_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Adjust the denormalized stock counter on the product record
    async fn bump_product_counter(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
        delta: i32,
    ) -> AppResult<()> {
        sqlx::query("UPDATE products SET stock_total = stock_total + $1, updated_at = NOW() WHERE id = $2")
            .bind(delta)
            .bind(product_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn record_movement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        business_id: Uuid,
        product_id: Uuid,
        warehouse_id: Uuid,
        movement_type: MovementType,
        quantity: i32,
        unit_price: Option<Decimal>,
        reason: Option<&str>,
        created_by: Option<Uuid>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stock_movements (business_id, product_id, warehouse_id, movement_type,
                                         quantity, unit_price, reason, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(business_id)
        .bind(product_id)
        .bind(warehouse_id)
        .bind(movement_type.as_str())
        .bind(quantity)
        .bind(unit_price)
        .bind(reason)
        .bind(created_by)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Validate product exists, belongs to the business and is not deleted
    async fn ensure_product(&self, business_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND business_id = $2 AND del_flag = FALSE)",
        )
        .bind(product_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }

    /// Validate warehouse exists, belongs to the business and is not deleted
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
}

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

/// Plan how many units to take from each batch, oldest first.
/// Stops once the request is satisfied or every batch is drained.
pub fn plan_fifo_consumption(batches: &[(Uuid, i32)], requested: i32) -> Vec<(Uuid, i32)> {
    let mut plan = Vec::new();
    let mut outstanding = requested;

    for &(batch_id, remaining) in batches {
        if outstanding <= 0 {
            break;
        }
        if remaining <= 0 {
            continue;
        }
        let take = outstanding.min(remaining);
        plan.push((batch_id, take));
        outstanding -= take;
    }

    plan
}

/// Average selling price across batches, weighted by remaining quantity
pub fn weighted_average_price(batches: &[StockBatch]) -> Decimal {
    let total: i32 = batches.iter().map(|b| b.remaining).sum();
    if total == 0 {
        return Decimal::ZERO;
    }
    let value: Decimal = batches
        .iter()
        .map(|b| b.selling_price * Decimal::from(b.remaining))
        .sum();
    (value / Decimal::from(total)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_fifo_plan_drains_oldest_first() {
        let b1 = Uuid::new_v4();
        let b2 = Uuid::new_v4();
        let plan = plan_fifo_consumption(&[(b1, 5), (b2, 10)], 8);
        assert_eq!(plan, vec![(b1, 5), (b2, 3)]);
    }

    #[test]
    fn test_fifo_plan_partial_when_insufficient() {
        let b1 = Uuid::new_v4();
        let plan = plan_fifo_consumption(&[(b1, 5)], 8);
        assert_eq!(plan, vec![(b1, 5)]);
        let consumed: i32 = plan.iter().map(|(_, q)| q).sum();
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_fifo_plan_skips_empty_batches() {
        let b1 = Uuid::new_v4();
        let b2 = Uuid::new_v4();
        let plan = plan_fifo_consumption(&[(b1, 0), (b2, 4)], 2);
        assert_eq!(plan, vec![(b2, 2)]);
    }

    #[test]
    fn test_fifo_plan_exact_fit_stops() {
        let b1 = Uuid::new_v4();
        let b2 = Uuid::new_v4();
        let plan = plan_fifo_consumption(&[(b1, 5), (b2, 10)], 5);
        assert_eq!(plan, vec![(b1, 5)]);
    }

    #[test]
    fn test_weighted_average_price() {
        fn batch(remaining: i32, price: &str) -> StockBatch {
            StockBatch {
                id: Uuid::new_v4(),
                business_id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
                warehouse_id: Uuid::new_v4(),
                batch_number: "BAT-1".to_string(),
                quantity: remaining,
                remaining,
                unit_cost: Decimal::ZERO,
                shipping_cost_per_unit: Decimal::ZERO,
                selling_price: Decimal::from_str(price).unwrap(),
                expiry_date: chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
                quality_grade: None,
                is_depleted: false,
                notes: None,
                created_at: Utc::now(),
            }
        }

        // (5 * 10 + 15 * 14) / 20 = 13.00
        let avg = weighted_average_price(&[batch(5, "10"), batch(15, "14")]);
        assert_eq!(avg, Decimal::from_str("13.00").unwrap());
        assert_eq!(weighted_average_price(&[]), Decimal::ZERO);
    }
}
