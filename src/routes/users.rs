use crate::handlers::users::{create, delete, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/:id", get(read).put(update).delete(delete))
        .with_state(state)
}
