//! JSON object body, parsed whatever the content type says. The content-type guard runs first.

use crate::error::AppError;
use crate::service::validation::Body;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;

const NOT_AN_OBJECT: &str = "Request body must be a JSON object.";

#[derive(Debug, Clone)]
pub struct JsonBody(pub Body);

impl JsonBody {
    pub fn parse(bytes: &[u8]) -> Result<Self, AppError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::BadRequest(NOT_AN_OBJECT.into()));
        }
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| AppError::BadRequest(format!("Failed to decode JSON object: {}", e)))?;
        match value {
            Value::Object(map) => Ok(JsonBody(map)),
            _ => Err(AppError::BadRequest(NOT_AN_OBJECT.into())),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Self::parse(&bytes)
    }
}
