//! Router assembly: resource routes, JSON fallbacks, and the request guard.

mod common;
mod orders;
mod products;
mod users;

pub use common::common_routes;
pub use orders::order_routes;
pub use products::product_routes;
pub use users::user_routes;

use crate::error::AppError;
use crate::middleware::{json_method_not_allowed, panic_response, require_json, MAX_BODY_BYTES};
use crate::state::AppState;
use axum::{middleware, Router};
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

async fn no_such_route() -> AppError {
    AppError::NoSuchRoute
}

/// The whole service: every route plus the guard, error fallbacks, and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(product_routes(state.clone()))
        .merge(order_routes(state))
        .fallback(no_such_route)
        .layer(middleware::from_fn(require_json))
        .layer(middleware::map_response(json_method_not_allowed))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
