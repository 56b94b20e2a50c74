//! HTTP handlers: health and maintenance, users, products, orders.

pub mod common;
pub mod orders;
pub mod products;
pub mod users;
