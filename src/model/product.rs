use serde::Serialize;

/// A row of `products`. Serialized as `id, product_name, price`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub product_name: String,
    pub price: f64,
}
