//! Table DDL for users, products, orders and the order/product association.
//! Statements run in dependency order inside one transaction and are idempotent (IF NOT EXISTS).

use crate::error::AppError;
use sqlx::PgPool;

/// DDL in the order the foreign keys require.
pub const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            name VARCHAR(120) NOT NULL,
            address VARCHAR(255),
            email VARCHAR(120) NOT NULL,
            CONSTRAINT uq_users_email UNIQUE (email)
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id SERIAL PRIMARY KEY,
            product_name VARCHAR(200) NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            CONSTRAINT ck_products_price_non_negative CHECK (price >= 0)
        )
        "#,
    ),
    (
        "orders",
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id SERIAL PRIMARY KEY,
            order_date TIMESTAMP NOT NULL DEFAULT (NOW() AT TIME ZONE 'utc'),
            user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE
        )
        "#,
    ),
    (
        "order_product",
        r#"
        CREATE TABLE IF NOT EXISTS order_product (
            order_id INTEGER NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
            product_id INTEGER NOT NULL REFERENCES products (id) ON DELETE CASCADE,
            added_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
            PRIMARY KEY (order_id, product_id),
            CONSTRAINT uq_order_product UNIQUE (order_id, product_id)
        )
        "#,
    ),
];

/// Index for listing a user's orders.
const INDEXES: &[&str] = &["CREATE INDEX IF NOT EXISTS ix_orders_user_id ON orders (user_id)"];

/// Create all tables if missing. Safe to call repeatedly.
pub async fn create_tables(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for (name, ddl) in TABLES {
        tracing::debug!(table = %name, "create table");
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    for ddl in INDEXES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(tables = TABLES.len(), "schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_in_dependency_order() {
        let names: Vec<&str> = TABLES.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["users", "products", "orders", "order_product"]);
    }

    #[test]
    fn association_has_composite_key_and_redundant_unique() {
        let (_, ddl) = TABLES[3];
        assert!(ddl.contains("PRIMARY KEY (order_id, product_id)"));
        assert!(ddl.contains("CONSTRAINT uq_order_product UNIQUE (order_id, product_id)"));
    }

    #[test]
    fn ddl_is_idempotent() {
        assert!(TABLES.iter().all(|(_, ddl)| ddl.contains("IF NOT EXISTS")));
    }
}
