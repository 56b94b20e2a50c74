//! Order routes. Static `user` segments win over `:id` when matching.

use crate::handlers::orders::{
    add_product, create, delete, for_user, products, read, remove_product, summary, total,
};
use crate::state::AppState;
use axum::{
    routing::{delete as delete_route, get, post, put},
    Router,
};

pub fn order_routes(state: AppState) -> Router {
    Router::new()
        .route("/orders", post(create))
        .route("/orders/:id", get(read).delete(delete))
        .route("/orders/:id/add_product/:product_id", put(add_product))
        .route("/orders/:id/remove_product/:product_id", delete_route(remove_product))
        .route("/orders/:id/products", get(products))
        .route("/orders/:id/total", get(total))
        .route("/orders/user/:user_id", get(for_user))
        .route("/orders/user/:user_id/summary", get(summary))
        .with_state(state)
}
