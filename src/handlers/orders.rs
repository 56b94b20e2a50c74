//! Order handlers, association changes, and aggregates.

use crate::error::AppError;
use crate::extractors::{IdPath, JsonBody};
use crate::model::Order;
use crate::response::{created, message, ok};
use crate::service::validation::NewOrder;
use crate::service::OrderService;
use crate::state::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct RemovedBody {
    message: &'static str,
    order: Order,
}

/// POST /orders
pub async fn create(State(state): State<AppState>, JsonBody(body): JsonBody) -> Result<impl IntoResponse, AppError> {
    let new = NewOrder::from_body(&body)?;
    let order = OrderService::create(&state.pool, new).await?;
    Ok(created(order))
}

/// GET /orders/:id
pub async fn read(State(state): State<AppState>, IdPath(id): IdPath<i32>) -> Result<impl IntoResponse, AppError> {
    let order = OrderService::get(&state.pool, id).await?;
    Ok(ok(order))
}

/// DELETE /orders/:id
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath<i32>) -> Result<impl IntoResponse, AppError> {
    OrderService::delete(&state.pool, id).await?;
    Ok(message("Order deleted"))
}

/// PUT /orders/:id/add_product/:product_id
pub async fn add_product(
    State(state): State<AppState>,
    IdPath((id, product_id)): IdPath<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let order = OrderService::add_product(&state.pool, id, product_id).await?;
    Ok(ok(order))
}

/// DELETE /orders/:id/remove_product/:product_id
pub async fn remove_product(
    State(state): State<AppState>,
    IdPath((id, product_id)): IdPath<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let order = OrderService::remove_product(&state.pool, id, product_id).await?;
    Ok(ok(RemovedBody {
        message: "Product removed from order",
        order,
    }))
}

/// GET /orders/user/:user_id
pub async fn for_user(State(state): State<AppState>, IdPath(user_id): IdPath<i32>) -> Result<impl IntoResponse, AppError> {
    let orders = OrderService::for_user(&state.pool, user_id).await?;
    Ok(ok(orders))
}

/// GET /orders/:id/products
pub async fn products(State(state): State<AppState>, IdPath(id): IdPath<i32>) -> Result<impl IntoResponse, AppError> {
    let products = OrderService::products(&state.pool, id).await?;
    Ok(ok(products))
}

/// GET /orders/:id/total
pub async fn total(State(state): State<AppState>, IdPath(id): IdPath<i32>) -> Result<impl IntoResponse, AppError> {
    let total = OrderService::total(&state.pool, id).await?;
    Ok(ok(total))
}

/// GET /orders/user/:user_id/summary
pub async fn summary(State(state): State<AppState>, IdPath(user_id): IdPath<i32>) -> Result<impl IntoResponse, AppError> {
    let rows = OrderService::summary(&state.pool, user_id).await?;
    Ok(ok(rows))
}
