#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use storefront_api::{app, create_tables, AppState, Settings};
use std::sync::OnceLock;
use tokio::sync::OnceCell;
use tower::ServiceExt;

pub fn settings(database_url: &str, dev_mode: bool, token: Option<&str>) -> Settings {
    Settings {
        database_url: database_url.to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        dev_mode,
        init_db_token: token.map(str::to_string),
        max_connections: 2,
        auto_init_db: false,
    }
}

/// Router over a pool that never connects unless a handler reaches the database.
pub fn offline_app(dev_mode: bool, token: Option<&str>) -> Router {
    let url = "postgres://nobody@127.0.0.1:1/offline";
    let pool = PgPoolOptions::new().connect_lazy(url).unwrap();
    app(AppState::new(pool, settings(url, dev_mode, token)))
}

static SCHEMA: OnceLock<OnceCell<()>> = OnceLock::new();

/// Router over `TEST_DATABASE_URL`, or `None` when it is not set.
pub async fn live_app() -> Option<Router> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await.unwrap();
    SCHEMA
        .get_or_init(OnceCell::new)
        .get_or_init(|| async { create_tables(&pool).await.unwrap() })
        .await;
    Some(app(AppState::new(pool, settings(&url, true, None))))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    send_raw(app, req.body(body).unwrap()).await
}

pub async fn send_raw(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// An email no other test run has used.
pub fn unique_email(tag: &str) -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static SEQ: AtomicU32 = AtomicU32::new(0);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}-{}@example.com", tag, nanos, SEQ.fetch_add(1, Ordering::Relaxed))
}
