//! Analytics service for stock and sales reporting
//!
//! All reports are read-only. Rows are bulk-fetched and aggregated in
//! application memory, which is fine at dashboard scale and keeps the
//! queries trivial.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{classify_expiry, ExpirySeverity};
use shared::pricing::margin_percent;

/// Analytics service
#[derive(Clone)]
pub struct AnalyticsService {
    db: PgPool,
}

/// Turnover of one product over the trailing window
#[derive(Debug, Serialize)]
pub struct TurnoverEntry {
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub sold: i64,
    pub current_stock: i64,
    /// sold / (current + sold) * 100
    pub turnover_rate: Decimal,
}

/// Margin of one batch over its landed cost
#[derive(Debug, Serialize)]
pub struct ProfitabilityEntry {
    pub batch_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub warehouse_id: Uuid,
    pub remaining: i32,
    pub unit_cost: Decimal,
    pub shipping_cost_per_unit: Decimal,
    pub selling_price: Decimal,
    pub margin_percent: Decimal,
}

/// A batch that has sat too long with stock remaining
#[derive(Debug, Serialize)]
pub struct SlowMovingEntry {
    pub batch_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub warehouse_id: Uuid,
    pub batch_number: String,
    pub remaining: i32,
    pub age_days: i64,
}

/// A batch approaching its expiry date
#[derive(Debug, Serialize)]
pub struct ExpiryAlert {
    pub batch_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub warehouse_id: Uuid,
    pub batch_number: String,
    pub remaining: i32,
    pub expiry_date: NaiveDate,
    pub days_until_expiry: i64,
    pub severity: ExpirySeverity,
}

/// Headline numbers for the dashboard landing page
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub product_count: i64,
    pub warehouse_count: i64,
    pub open_batch_count: i64,
    pub total_stock_units: i64,
    pub active_shipment_count: i64,
    pub expiring_batch_count: i64,
}

/// Raw batch row shared by the batch-level reports
#[derive(Debug, sqlx::FromRow)]
struct ReportBatchRow {
    batch_id: Uuid,
    product_id: Uuid,
    product_name: String,
    warehouse_id: Uuid,
    batch_number: String,
    remaining: i32,
    unit_cost: Decimal,
    shipping_cost_per_unit: Decimal,
    selling_price: Decimal,
    expiry_date: NaiveDate,
    created_at: chrono::DateTime<Utc>,
}

impl AnalyticsService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Turnover per product over the trailing window
    pub async fn turnover_report(
        &self,
        business_id: Uuid,
        window_days: i64,
    ) -> AppResult<Vec<TurnoverEntry>> {
        if window_days <= 0 {
            return Err(AppError::Validation {
                field: "window_days".to_string(),
                message: "Window must be positive".to_string(),
            });
        }

        let products = sqlx::query_as::<_, (Uuid, String, String, i32)>(
            "SELECT id, name, sku, stock_total FROM products WHERE business_id = $1 AND del_flag = FALSE",
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        let since = Utc::now() - chrono::Duration::days(window_days);
        let sales = sqlx::query_as::<_, (Uuid, i32)>(
            r#"
            SELECT product_id, quantity FROM stock_movements
            WHERE business_id = $1 AND movement_type = 'sale' AND created_at >= $2
            "#,
        )
        .bind(business_id)
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        let mut entries: Vec<TurnoverEntry> = products
            .into_iter()
            .map(|(id, name, sku, stock_total)| {
                let sold: i64 = sales
                    .iter()
                    .filter(|(pid, _)| *pid == id)
                    .map(|(_, q)| *q as i64)
                    .sum();
                let current = stock_total as i64;
                TurnoverEntry {
                    product_id: id,
                    product_name: name,
                    sku,
                    sold,
                    current_stock: current,
                    turnover_rate: turnover_rate(sold, current),
                }
            })
            .collect();

        entries.sort_by(|a, b| b.turnover_rate.cmp(&a.turnover_rate));
        Ok(entries)
    }

    /// Margin per open batch
    pub async fn profitability_report(
        &self,
        business_id: Uuid,
    ) -> AppResult<Vec<ProfitabilityEntry>> {
        let rows = self.fetch_open_batches(business_id).await?;

        Ok(rows
            .into_iter()
            .map(|row| ProfitabilityEntry {
                batch_id: row.batch_id,
                product_id: row.product_id,
                product_name: row.product_name,
                warehouse_id: row.warehouse_id,
                remaining: row.remaining,
                unit_cost: row.unit_cost,
                shipping_cost_per_unit: row.shipping_cost_per_unit,
                selling_price: row.selling_price,
                margin_percent: margin_percent(
                    row.unit_cost,
                    row.shipping_cost_per_unit,
                    row.selling_price,
                )
                .round_dp(2),
            })
            .collect())
    }

    /// Batches older than the cutoff that still hold stock
    pub async fn slow_moving_report(
        &self,
        business_id: Uuid,
        cutoff_days: i64,
    ) -> AppResult<Vec<SlowMovingEntry>> {
        let now = Utc::now();
        let rows = self.fetch_open_batches(business_id).await?;

        let mut entries: Vec<SlowMovingEntry> = rows
            .into_iter()
            .filter_map(|row| {
                let age_days = (now - row.created_at).num_days();
                (age_days > cutoff_days).then(|| SlowMovingEntry {
                    batch_id: row.batch_id,
                    product_id: row.product_id,
                    product_name: row.product_name,
                    warehouse_id: row.warehouse_id,
                    batch_number: row.batch_number,
                    remaining: row.remaining,
                    age_days,
                })
            })
            .collect();

        entries.sort_by(|a, b| b.age_days.cmp(&a.age_days));
        Ok(entries)
    }

    /// Batches expiring within the look-ahead window, bucketed by urgency
    pub async fn expiry_alerts(
        &self,
        business_id: Uuid,
        window_days: i64,
    ) -> AppResult<Vec<ExpiryAlert>> {
        let today = Utc::now().date_naive();
        let rows = self.fetch_open_batches(business_id).await?;

        let mut alerts: Vec<ExpiryAlert> = rows
            .into_iter()
            .filter_map(|row| {
                let days_until_expiry = (row.expiry_date - today).num_days();
                (days_until_expiry <= window_days).then(|| ExpiryAlert {
                    batch_id: row.batch_id,
                    product_id: row.product_id,
                    product_name: row.product_name,
                    warehouse_id: row.warehouse_id,
                    batch_number: row.batch_number,
                    remaining: row.remaining,
                    expiry_date: row.expiry_date,
                    days_until_expiry,
                    severity: classify_expiry(days_until_expiry),
                })
            })
            .collect();

        alerts.sort_by_key(|a| a.days_until_expiry);
        Ok(alerts)
    }

    /// Headline counts for the dashboard landing page
    pub async fn dashboard_metrics(&self, business_id: Uuid) -> AppResult<DashboardMetrics> {
        let product_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE business_id = $1 AND del_flag = FALSE",
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let warehouse_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM warehouses WHERE business_id = $1 AND del_flag = FALSE",
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let (open_batch_count, total_stock_units) = sqlx::query_as::<_, (i64, Option<i64>)>(
            "SELECT COUNT(*), SUM(remaining) FROM stock_batches WHERE business_id = $1 AND is_depleted = FALSE",
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let active_shipment_count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM shipments
            WHERE business_id = $1 AND del_flag = FALSE
              AND status NOT IN ('delivered', 'cancelled')
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let expiring_batch_count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM stock_batches
            WHERE business_id = $1 AND is_depleted = FALSE
              AND expiry_date <= CURRENT_DATE + INTERVAL '14 days'
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            product_count,
            warehouse_count,
            open_batch_count,
            total_stock_units: total_stock_units.unwrap_or(0),
            active_shipment_count,
            expiring_batch_count,
        })
    }

    /// Export report rows as CSV for download
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for row in data {
            wtr.serialize(row)
                .map_err(|e| AppError::Internal(e.to_string()))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(e.to_string()))?,
        )
        .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(csv_data)
    }

    async fn fetch_open_batches(&self, business_id: Uuid) -> AppResult<Vec<ReportBatchRow>> {
        let rows = sqlx::query_as::<_, ReportBatchRow>(
            r#"
            SELECT b.id as batch_id, b.product_id, p.name as product_name, b.warehouse_id,
                   b.batch_number, b.remaining, b.unit_cost, b.shipping_cost_per_unit,
                   b.selling_price, b.expiry_date, b.created_at
            FROM stock_batches b
            JOIN products p ON p.id = b.product_id
            WHERE b.business_id = $1 AND b.is_depleted = FALSE
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}

/// Share of the window's opening stock that was sold:
/// sold / (current + sold) * 100
pub fn turnover_rate(sold: i64, current_stock: i64) -> Decimal {
    let denominator = current_stock + sold;
    if denominator <= 0 {
        return Decimal::ZERO;
    }
    ((Decimal::from(sold) / Decimal::from(denominator)) * Decimal::from(100)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_turnover_rate() {
        assert_eq!(turnover_rate(50, 50), Decimal::from(100) / Decimal::from(2));
        assert_eq!(turnover_rate(0, 80), Decimal::ZERO);
        assert_eq!(turnover_rate(80, 0), Decimal::from(100));
        assert_eq!(turnover_rate(0, 0), Decimal::ZERO);
    }

    #[test]
    fn test_turnover_rate_rounds() {
        // 1 / 3 * 100 = 33.33
        assert_eq!(turnover_rate(1, 2), Decimal::from_str("33.33").unwrap());
    }
}
