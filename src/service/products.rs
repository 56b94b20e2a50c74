//! Product persistence. Deleting a product drops its association rows, never orders.

use crate::error::AppError;
use crate::model::Product;
use crate::response::{Page, PageMeta};
use crate::service::pagination::Pagination;
use crate::service::validation::{Body, NewProduct, ProductChanges};
use sqlx::{PgConnection, PgPool};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

const PRODUCT_COLUMNS: &str = "id, product_name, price";

pub struct ProductService;

impl ProductService {
    pub async fn list(pool: &PgPool, pagination: Pagination) -> Result<Page<Product>, AppError> {
        let sql = format!("SELECT {} FROM products ORDER BY id ASC LIMIT $1 OFFSET $2", PRODUCT_COLUMNS);
        tracing::debug!(sql = %sql, page = pagination.page, per_page = pagination.per_page, "query");
        let items: Vec<Product> = sqlx::query_as(&sql)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(pool).await?;
        Ok(Page {
            items,
            meta: PageMeta::new(pagination.page, pagination.per_page, total),
        })
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Product, AppError> {
        let mut conn = pool.acquire().await?;
        Self::find(&mut *conn, id).await?.ok_or_else(not_found)
    }

    pub async fn find(conn: &mut PgConnection, id: i32) -> Result<Option<Product>, AppError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let product = sqlx::query_as(&sql).bind(id).fetch_optional(conn).await?;
        Ok(product)
    }

    pub async fn create(pool: &PgPool, new: NewProduct) -> Result<Product, AppError> {
        let mut tx = pool.begin().await?;
        let sql = format!(
            "INSERT INTO products (product_name, price) VALUES ($1, $2) RETURNING {}",
            PRODUCT_COLUMNS
        );
        let product: Product = sqlx::query_as(&sql)
            .bind(&new.product_name)
            .bind(new.price)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(product_id = product.id, "product created");
        Ok(product)
    }

    /// A missing row wins over a bad body: the lookup runs before the changes are decoded.
    pub async fn update(pool: &PgPool, id: i32, body: &Body) -> Result<Product, AppError> {
        let mut tx = pool.begin().await?;
        if Self::find(&mut *tx, id).await?.is_none() {
            return Err(not_found());
        }
        let changes = ProductChanges::from_body(body)?;
        let sql = format!(
            r#"
            UPDATE products SET
                product_name = COALESCE($2, product_name),
                price = COALESCE($3, price)
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );
        let product: Product = sqlx::query_as(&sql)
            .bind(id)
            .bind(&changes.product_name)
            .bind(changes.price)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(product_id = id, "product updated");
        Ok(product)
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        if Self::find(&mut *tx, id).await?.is_none() {
            return Err(not_found());
        }
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound(PRODUCT_NOT_FOUND.into())
}
