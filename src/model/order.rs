use super::Product;
use chrono::NaiveDateTime;
use serde::Serialize;

/// A bare row of `orders`, before its products are attached.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i32,
    pub order_date: NaiveDateTime,
    pub user_id: i32,
}

/// Order representation: the only one that exposes `user_id`. Products are read-only here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: i32,
    pub order_date: NaiveDateTime,
    pub user_id: i32,
    pub products: Vec<Product>,
}

impl Order {
    pub fn from_row(row: OrderRow, products: Vec<Product>) -> Self {
        Order {
            id: row.id,
            order_date: row.order_date,
            user_id: row.user_id,
            products,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderTotal {
    pub order_id: i32,
    pub total: f64,
}

/// One line of a user's order summary.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub order_id: i32,
    pub order_date: NaiveDateTime,
    pub product_count: i64,
    pub total: f64,
}
