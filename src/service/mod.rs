//! Services: request decoding and validation, pagination, and per-entity persistence.

pub mod orders;
pub mod pagination;
pub mod products;
pub mod users;
pub mod validation;

pub use orders::OrderService;
pub use pagination::Pagination;
pub use products::ProductService;
pub use users::UserService;
