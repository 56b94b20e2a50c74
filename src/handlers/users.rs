//! User handlers.

use crate::error::AppError;
use crate::extractors::{IdPath, JsonBody};
use crate::response::{created, message, ok};
use crate::service::validation::NewUser;
use crate::service::{Pagination, UserService};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;

/// GET /users?page=&per_page=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let page = UserService::list(&state.pool, Pagination::from_query(&params)).await?;
    Ok(ok(page))
}

/// GET /users/:id
pub async fn read(State(state): State<AppState>, IdPath(id): IdPath<i32>) -> Result<impl IntoResponse, AppError> {
    let user = UserService::get(&state.pool, id).await?;
    Ok(ok(user))
}

/// POST /users
pub async fn create(State(state): State<AppState>, JsonBody(body): JsonBody) -> Result<impl IntoResponse, AppError> {
    let new = NewUser::from_body(&body)?;
    let user = UserService::create(&state.pool, new).await?;
    Ok(created(user))
}

/// PUT /users/:id. Only fields present in the body change.
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let user = UserService::update(&state.pool, id, &body).await?;
    Ok(ok(user))
}

/// DELETE /users/:id
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath<i32>) -> Result<impl IntoResponse, AppError> {
    UserService::delete(&state.pool, id).await?;
    Ok(message("User deleted"))
}
