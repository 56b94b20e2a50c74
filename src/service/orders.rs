//! Orders and the order/product association, plus totals and per-user summaries.

use crate::error::AppError;
use crate::model::{Order, OrderRow, OrderSummary, OrderTotal, Product};
use crate::service::products::{ProductService, PRODUCT_NOT_FOUND};
use crate::service::users::{UserService, USER_NOT_FOUND};
use crate::service::validation::{parse_order_date, NewOrder};
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

pub const ORDER_NOT_FOUND: &str = "Order not found";

const ORDER_COLUMNS: &str = "id, order_date, user_id";

/// A product together with the order it belongs to, for batch loading.
#[derive(sqlx::FromRow)]
struct OrderLine {
    order_id: i32,
    #[sqlx(flatten)]
    product: Product,
}

pub struct OrderService;

impl OrderService {
    /// The user must exist; the date is parsed only after that check. No default date is applied.
    pub async fn create(pool: &PgPool, new: NewOrder) -> Result<Order, AppError> {
        let user_id = i32::try_from(new.user_id).map_err(|_| AppError::NotFound(USER_NOT_FOUND.into()))?;
        let mut tx = pool.begin().await?;
        if UserService::find(&mut *tx, user_id).await?.is_none() {
            return Err(AppError::NotFound(USER_NOT_FOUND.into()));
        }
        let order_date = parse_order_date(&new.order_date)?;
        let sql = format!(
            "INSERT INTO orders (user_id, order_date) VALUES ($1, $2) RETURNING {}",
            ORDER_COLUMNS
        );
        let row: OrderRow = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(order_date)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(order_id = row.id, user_id = row.user_id, "order created");
        Ok(Order::from_row(row, Vec::new()))
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Order, AppError> {
        let mut conn = pool.acquire().await?;
        Self::load(&mut *conn, id).await?.ok_or_else(not_found)
    }

    pub async fn delete(pool: &PgPool, id: i32) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        if Self::find(&mut *tx, id).await?.is_none() {
            return Err(not_found());
        }
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(order_id = id, "order deleted");
        Ok(())
    }

    /// Adding a product already in the order changes nothing and still succeeds.
    pub async fn add_product(pool: &PgPool, order_id: i32, product_id: i32) -> Result<Order, AppError> {
        let mut tx = pool.begin().await?;
        Self::require_pair(&mut *tx, order_id, product_id).await?;
        let inserted = sqlx::query(
            "INSERT INTO order_product (order_id, product_id) VALUES ($1, $2) ON CONFLICT (order_id, product_id) DO NOTHING",
        )
        .bind(order_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        let order = Self::load(&mut *tx, order_id).await?.ok_or_else(not_found)?;
        tx.commit().await?;
        tracing::info!(order_id, product_id, added = inserted > 0, "add product to order");
        Ok(order)
    }

    /// Removing a product that is not in the order changes nothing and still succeeds.
    pub async fn remove_product(pool: &PgPool, order_id: i32, product_id: i32) -> Result<Order, AppError> {
        let mut tx = pool.begin().await?;
        Self::require_pair(&mut *tx, order_id, product_id).await?;
        let removed = sqlx::query("DELETE FROM order_product WHERE order_id = $1 AND product_id = $2")
            .bind(order_id)
            .bind(product_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let order = Self::load(&mut *tx, order_id).await?.ok_or_else(not_found)?;
        tx.commit().await?;
        tracing::info!(order_id, product_id, removed = removed > 0, "remove product from order");
        Ok(order)
    }

    pub async fn for_user(pool: &PgPool, user_id: i32) -> Result<Vec<Order>, AppError> {
        let mut conn = pool.acquire().await?;
        if UserService::find(&mut *conn, user_id).await?.is_none() {
            return Err(AppError::NotFound(USER_NOT_FOUND.into()));
        }
        let sql = format!("SELECT {} FROM orders WHERE user_id = $1 ORDER BY id ASC", ORDER_COLUMNS);
        tracing::debug!(sql = %sql, user_id, "query");
        let rows: Vec<OrderRow> = sqlx::query_as(&sql).bind(user_id).fetch_all(&mut *conn).await?;
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut products = Self::products_for(&mut *conn, &ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let items = products.remove(&row.id).unwrap_or_default();
                Order::from_row(row, items)
            })
            .collect())
    }

    pub async fn products(pool: &PgPool, order_id: i32) -> Result<Vec<Product>, AppError> {
        let mut conn = pool.acquire().await?;
        if Self::find(&mut *conn, order_id).await?.is_none() {
            return Err(not_found());
        }
        let mut products = Self::products_for(&mut *conn, &[order_id]).await?;
        Ok(products.remove(&order_id).unwrap_or_default())
    }

    /// Sum of the current prices of the products in the order; 0 when it has none.
    pub async fn total(pool: &PgPool, order_id: i32) -> Result<OrderTotal, AppError> {
        let mut conn = pool.acquire().await?;
        if Self::find(&mut *conn, order_id).await?.is_none() {
            return Err(not_found());
        }
        let total: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(p.price), 0)::DOUBLE PRECISION
            FROM order_product op
            JOIN products p ON p.id = op.product_id
            WHERE op.order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(OrderTotal { order_id, total })
    }

    pub async fn summary(pool: &PgPool, user_id: i32) -> Result<Vec<OrderSummary>, AppError> {
        let mut conn = pool.acquire().await?;
        if UserService::find(&mut *conn, user_id).await?.is_none() {
            return Err(AppError::NotFound(USER_NOT_FOUND.into()));
        }
        let rows: Vec<OrderSummary> = sqlx::query_as(
            r#"
            SELECT o.id AS order_id,
                   o.order_date,
                   COUNT(p.id) AS product_count,
                   COALESCE(SUM(p.price), 0)::DOUBLE PRECISION AS total
            FROM orders o
            LEFT JOIN order_product op ON op.order_id = o.id
            LEFT JOIN products p ON p.id = op.product_id
            WHERE o.user_id = $1
            GROUP BY o.id, o.order_date
            ORDER BY o.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    async fn find(conn: &mut PgConnection, id: i32) -> Result<Option<OrderRow>, AppError> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as(&sql).bind(id).fetch_optional(conn).await?;
        Ok(row)
    }

    /// Order row plus its products in insertion order.
    async fn load(conn: &mut PgConnection, id: i32) -> Result<Option<Order>, AppError> {
        let Some(row) = Self::find(&mut *conn, id).await? else {
            return Ok(None);
        };
        let mut products = Self::products_for(&mut *conn, &[id]).await?;
        let items = products.remove(&id).unwrap_or_default();
        Ok(Some(Order::from_row(row, items)))
    }

    /// Products of several orders in one query, grouped by order id.
    async fn products_for(conn: &mut PgConnection, order_ids: &[i32]) -> Result<HashMap<i32, Vec<Product>>, AppError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let lines: Vec<OrderLine> = sqlx::query_as(
            r#"
            SELECT op.order_id, p.id, p.product_name, p.price
            FROM order_product op
            JOIN products p ON p.id = op.product_id
            WHERE op.order_id = ANY($1)
            ORDER BY op.order_id, op.added_at, p.id
            "#,
        )
        .bind(order_ids)
        .fetch_all(conn)
        .await?;
        let mut grouped: HashMap<i32, Vec<Product>> = HashMap::new();
        for line in lines {
            grouped.entry(line.order_id).or_default().push(line.product);
        }
        Ok(grouped)
    }

    /// Order first, then product: the first missing one decides the 404 message.
    async fn require_pair(conn: &mut PgConnection, order_id: i32, product_id: i32) -> Result<(), AppError> {
        if Self::find(&mut *conn, order_id).await?.is_none() {
            return Err(not_found());
        }
        if ProductService::find(&mut *conn, product_id).await?.is_none() {
            return Err(AppError::NotFound(PRODUCT_NOT_FOUND.into()));
        }
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound(ORDER_NOT_FOUND.into())
}
