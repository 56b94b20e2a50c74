//! Health and maintenance routes.

use crate::handlers::common::{health, init_db};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

/// GET / and POST /init-db.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/init-db", post(init_db))
        .with_state(state)
}
