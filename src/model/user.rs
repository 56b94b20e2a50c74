use serde::Serialize;

/// A row of `users`. Serialized as `id, name, address, email`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub email: String,
}
