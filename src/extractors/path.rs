//! Integer path ids. Any segment that does not decode as one behaves like an unmatched route.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// `IdPath<i32>` for one id, `IdPath<(i32, i32)>` for two.
#[derive(Clone, Copy, Debug)]
pub struct IdPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(IdPath(value)),
            Err(rejection) => {
                tracing::debug!(uri = %parts.uri, reason = %rejection.body_text(), "path ids rejected");
                Err(AppError::NoSuchRoute)
            }
        }
    }
}
