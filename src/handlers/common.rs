//! Health check and the guarded schema initialisation endpoint.

use crate::config::Settings;
use crate::error::AppError;
use crate::extractors::InitToken;
use crate::migration::create_tables;
use crate::response::message;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use subtle::ConstantTimeEq;

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
}

/// GET /
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// Development mode is always allowed. Otherwise the presented token must equal the
/// configured one; with no token configured nobody is allowed.
pub fn authorize_init(settings: &Settings, presented: Option<&str>) -> Result<(), AppError> {
    if settings.dev_mode {
        return Ok(());
    }
    let allowed = match (settings.init_db_token.as_deref(), presented) {
        (Some(expected), Some(given)) => bool::from(expected.as_bytes().ct_eq(given.as_bytes())),
        _ => false,
    };
    if allowed {
        Ok(())
    } else {
        tracing::warn!(token_presented = presented.is_some(), "init-db rejected");
        Err(AppError::Unauthorized("unauthorized to initialize database".into()))
    }
}

/// POST /init-db
pub async fn init_db(
    State(state): State<AppState>,
    InitToken(token): InitToken,
) -> Result<impl IntoResponse, AppError> {
    authorize_init(&state.settings, token.as_deref())?;
    create_tables(&state.pool).await?;
    Ok(message("Database tables created (if not existing)."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dev_mode: bool, token: Option<&str>) -> Settings {
        Settings {
            database_url: "postgres://localhost/shop".into(),
            bind_addr: "127.0.0.1:3000".parse().unwrap(),
            dev_mode,
            init_db_token: token.map(str::to_string),
            max_connections: 1,
            auto_init_db: false,
        }
    }

    #[test]
    fn dev_mode_needs_no_token() {
        assert!(authorize_init(&settings(true, None), None).is_ok());
        assert!(authorize_init(&settings(true, Some("s3cret")), Some("wrong")).is_ok());
    }

    #[test]
    fn matching_token_is_allowed() {
        assert!(authorize_init(&settings(false, Some("s3cret")), Some("s3cret")).is_ok());
    }

    #[test]
    fn wrong_or_missing_token_is_rejected() {
        let s = settings(false, Some("s3cret"));
        assert!(matches!(authorize_init(&s, Some("s3cre")), Err(AppError::Unauthorized(_))));
        assert!(matches!(authorize_init(&s, None), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn unconfigured_token_rejects_outside_dev_mode() {
        assert!(authorize_init(&settings(false, None), Some("anything")).is_err());
    }
}
