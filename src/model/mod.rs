//! Row types and their JSON representations. Field order in each struct is the response field order.

mod order;
mod product;
mod user;

pub use order::{Order, OrderRow, OrderSummary, OrderTotal};
pub use product::Product;
pub use user::User;
