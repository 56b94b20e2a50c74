//! Router behaviour that never reaches the database.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{offline_app, send, send_raw};
use serde_json::json;

#[tokio::test]
async fn health_is_ok() {
    let app = offline_app(false, None);
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = offline_app(false, None);
    let (status, body) = send(&app, Method::GET, "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));
}

#[tokio::test]
async fn non_integer_ids_do_not_match() {
    let app = offline_app(false, None);
    for uri in ["/users/abc", "/products/1.5", "/orders/x/total", "/orders/user/me"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["error"], "Not Found");
    }
    let (status, _) = send(&app, Method::PUT, "/orders/1/add_product/x", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn undecodable_ids_are_json_404() {
    let app = offline_app(false, None);
    for uri in ["/users/%FF", "/products/%FF", "/orders/%FF/total", "/orders/1/remove_product/%FF"] {
        let method = if uri.contains("remove_product") { Method::DELETE } else { Method::GET };
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body, json!({ "error": "Not Found" }));
    }
}

#[tokio::test]
async fn user_id_beyond_key_range_is_user_not_found() {
    let app = offline_app(false, None);
    let (status, body) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({ "user_id": 2147483648i64, "order_date": "2025-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn wrong_method_is_json_405() {
    let app = offline_app(false, None);
    let (status, body) = send(&app, Method::DELETE, "/", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "error": "Method Not Allowed" }));
    let (status, _) = send(&app, Method::PATCH, "/users/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let app = offline_app(false, None);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("name=Ada"))
        .unwrap();
    let (status, body) = send_raw(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Content-Type must be application/json" }));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = offline_app(false, None);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"product_name\": "))
        .unwrap();
    let (status, body) = send_raw(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn empty_body_passes_guard_but_needs_an_object() {
    let app = offline_app(false, None);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/orders")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_raw(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Request body must be a JSON object.");
}

#[tokio::test]
async fn negative_price_fails_before_persistence() {
    let app = offline_app(false, None);
    let (status, body) = send(&app, Method::POST, "/products", Some(json!({ "product_name": "Widget", "price": -1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["price"][0], "price must be a non-negative number.");
}

#[tokio::test]
async fn bad_email_fails_before_persistence() {
    let app = offline_app(false, None);
    let (status, body) = send(&app, Method::POST, "/users", Some(json!({ "name": "Ada", "email": "pizza" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["email"][0], "email must be a valid email address.");
}

#[tokio::test]
async fn order_requires_user_id_and_date() {
    let app = offline_app(false, None);
    let (status, body) = send(&app, Method::POST, "/orders", Some(json!({ "order_date": "2025-01-01" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["user_id"][0], "user_id is required");

    let (status, body) = send(&app, Method::POST, "/orders", Some(json!({ "user_id": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["order_date"][0], "order_date is required (YYYY-MM-DD or ISO8601).");
}

#[tokio::test]
async fn init_db_requires_token_outside_dev_mode() {
    let app = offline_app(false, Some("s3cret"));
    let (status, body) = send(&app, Method::POST, "/init-db", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "unauthorized to initialize database" }));

    let req = Request::builder()
        .method(Method::POST)
        .uri("/init-db")
        .header("X-Init-Token", "guess")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send_raw(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn init_db_without_configured_token_is_closed() {
    let app = offline_app(false, None);
    let (status, _) = send(&app, Method::POST, "/init-db", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
