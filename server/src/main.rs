//! Storefront server: reads settings from the environment (and `.env`), prepares the
//! database, and serves the API until Ctrl-C.
//!
//! Run from repo root: `cargo run -p storefront-server`

use storefront_api::{app, connect, create_tables, ensure_database_exists, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("storefront_api=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    ensure_database_exists(&settings.database_url).await?;
    let pool = connect(&settings).await?;
    if settings.auto_init_db {
        create_tables(&pool).await?;
    }
    if settings.dev_mode {
        tracing::warn!("development mode: /init-db is open");
    }

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("storefront listening on http://{}", listener.local_addr()?);
    let state = AppState::new(pool.clone(), settings);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
