//! Product catalog and labeling service

use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{LabelPayload, Product};
use shared::validation::{validate_ean13, validate_sku};

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Database row for a product
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    business_id: Uuid,
    sku: String,
    barcode: Option<String>,
    name: String,
    category: Option<String>,
    unit: String,
    stock_total: i32,
    description: Option<String>,
    del_flag: bool,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            business_id: row.business_id,
            sku: row.sku,
            barcode: row.barcode,
            name: row.name,
            category: row.category,
            unit: row.unit,
            stock_total: row.stock_total,
            description: row.description,
            del_flag: row.del_flag,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, business_id, sku, barcode, name, category, unit, stock_total, description, del_flag, created_at, updated_at";

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub sku: String,
    pub barcode: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub unit: String,
    pub description: Option<String>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub barcode: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product
    pub async fn create_product(
        &self,
        business_id: Uuid,
        input: CreateProductInput,
    ) -> AppResult<Product> {
        validate_sku(&input.sku).map_err(|msg| AppError::Validation {
            field: "sku".to_string(),
            message: msg.to_string(),
        })?;
        if let Some(barcode) = &input.barcode {
            validate_ean13(barcode).map_err(|msg| AppError::Validation {
                field: "barcode".to_string(),
                message: msg.to_string(),
            })?;
        }
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name is required".to_string(),
            });
        }
        if input.unit.trim().is_empty() {
            return Err(AppError::Validation {
                field: "unit".to_string(),
                message: "Sales unit is required".to_string(),
            });
        }

        let duplicate = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products
            WHERE business_id = $1 AND del_flag = FALSE
              AND (sku = $2 OR ($3::text IS NOT NULL AND barcode = $3))
            "#,
        )
        .bind(business_id)
        .bind(&input.sku)
        .bind(&input.barcode)
        .fetch_one(&self.db)
        .await?;

        if duplicate > 0 {
            return Err(AppError::DuplicateEntry("SKU or barcode".to_string()));
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (business_id, sku, barcode, name, category, unit, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(business_id)
        .bind(&input.sku)
        .bind(&input.barcode)
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.unit)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a product
    pub async fn update_product(
        &self,
        business_id: Uuid,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        if let Some(barcode) = &input.barcode {
            validate_ean13(barcode).map_err(|msg| AppError::Validation {
                field: "barcode".to_string(),
                message: msg.to_string(),
            })?;
        }

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET barcode = COALESCE($1, barcode),
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                unit = COALESCE($4, unit),
                description = COALESCE($5, description),
                mod_flag = TRUE,
                updated_at = NOW()
            WHERE id = $6 AND business_id = $7 AND del_flag = FALSE
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&input.barcode)
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.unit)
        .bind(&input.description)
        .bind(product_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Get a product by ID
    pub async fn get_product(&self, business_id: Uuid, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1 AND business_id = $2 AND del_flag = FALSE",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// List products for a business
    pub async fn list_products(&self, business_id: Uuid) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE business_id = $1 AND del_flag = FALSE ORDER BY sku",
            PRODUCT_COLUMNS
        ))
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Soft-delete a product
    pub async fn delete_product(&self, business_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE products SET del_flag = TRUE, updated_at = NOW() WHERE id = $1 AND business_id = $2 AND del_flag = FALSE",
        )
        .bind(product_id)
        .bind(business_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    /// Render-ready label data for a product.
    /// Price, lot number and expiry come from the newest open batch when
    /// one exists.
    pub async fn label_payload(
        &self,
        business_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<LabelPayload> {
        let product = self.get_product(business_id, product_id).await?;

        let latest_batch = sqlx::query_as::<_, (String, rust_decimal::Decimal, chrono::NaiveDate)>(
            r#"
            SELECT batch_number, selling_price, expiry_date
            FROM stock_batches
            WHERE business_id = $1 AND product_id = $2 AND is_depleted = FALSE
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(business_id)
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(LabelPayload {
            product_id: product.id,
            name: product.name,
            sku: product.sku,
            barcode: product.barcode,
            unit: product.unit,
            selling_price: latest_batch.as_ref().map(|(_, price, _)| *price),
            batch_number: latest_batch.as_ref().map(|(number, _, _)| number.clone()),
            expiry_date: latest_batch.as_ref().map(|(_, _, expiry)| *expiry),
        })
    }
}
