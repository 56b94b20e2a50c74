//! Request guard and response rewrites that keep every error in the JSON envelope.

use crate::error::AppError;
use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;

/// Largest request body the service reads.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// Non-empty POST/PUT/PATCH bodies must be declared as JSON. Empty bodies pass.
pub async fn require_json(req: Request, next: Next) -> Response {
    let method = req.method();
    if method != Method::POST && method != Method::PUT && method != Method::PATCH {
        return next.run(req).await;
    }
    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!(error = %e, "request body unreadable");
            return AppError::BadRequest("Failed to read request body.".into()).into_response();
        }
    };
    if !bytes.is_empty() && !is_json(&parts.headers) {
        tracing::debug!(method = %parts.method, uri = %parts.uri, "rejected non-JSON body");
        return AppError::BadRequest("Content-Type must be application/json".into()).into_response();
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// The router answers a known path with the wrong verb with an empty 405; give it the envelope.
pub async fn json_method_not_allowed(res: Response) -> Response {
    if res.status() != StatusCode::METHOD_NOT_ALLOWED {
        return res;
    }
    let allow = res.headers().get(header::ALLOW).cloned();
    let mut rewritten = AppError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}

/// Panics become a plain 500 envelope.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn json_mime_ignores_parameters_and_case() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("Application/JSON; charset=utf-8"));
        assert!(is_json(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn method_not_allowed_gets_envelope_and_keeps_allow() {
        let mut res = StatusCode::METHOD_NOT_ALLOWED.into_response();
        res.headers_mut().insert(header::ALLOW, HeaderValue::from_static("GET,HEAD"));
        let res = json_method_not_allowed(res).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[header::ALLOW], "GET,HEAD");
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Method Not Allowed");
    }

    #[tokio::test]
    async fn other_responses_pass_through() {
        let res = json_method_not_allowed(StatusCode::NO_CONTENT.into_response()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn panic_is_a_500() {
        let res = panic_response(Box::new("boom"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
