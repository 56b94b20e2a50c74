//! Extract the maintenance token from the `X-Init-Token` header.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const INIT_TOKEN_HEADER: &str = "X-Init-Token";

/// Optional token presented by the caller of `/init-db`.
#[derive(Clone, Debug)]
pub struct InitToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for InitToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(INIT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(InitToken(value))
    }
}
