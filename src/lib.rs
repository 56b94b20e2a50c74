//! Storefront API: users, products and orders over PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError, FieldErrors};
pub use migration::create_tables;
pub use routes::app;
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
