//! Product handlers.

use crate::error::AppError;
use crate::extractors::{IdPath, JsonBody};
use crate::response::{created, message, ok};
use crate::service::validation::NewProduct;
use crate::service::{Pagination, ProductService};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;

/// GET /products?page=&per_page=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let page = ProductService::list(&state.pool, Pagination::from_query(&params)).await?;
    Ok(ok(page))
}

/// GET /products/:id
pub async fn read(State(state): State<AppState>, IdPath(id): IdPath<i32>) -> Result<impl IntoResponse, AppError> {
    let product = ProductService::get(&state.pool, id).await?;
    Ok(ok(product))
}

/// POST /products
pub async fn create(State(state): State<AppState>, JsonBody(body): JsonBody) -> Result<impl IntoResponse, AppError> {
    let new = NewProduct::from_body(&body)?;
    let product = ProductService::create(&state.pool, new).await?;
    Ok(created(product))
}

/// PUT /products/:id. Price is re-validated when present.
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let product = ProductService::update(&state.pool, id, &body).await?;
    Ok(ok(product))
}

/// DELETE /products/:id
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath<i32>) -> Result<impl IntoResponse, AppError> {
    ProductService::delete(&state.pool, id).await?;
    Ok(message("Product deleted"))
}
