//! ROSTER API Server Entry Point
//!
//! Loads configuration, prepares the agents table and starts the Axum
//! HTTP server.

use std::sync::Arc;

use axum::Router;
use roster_api::telemetry::{init_tracing, TelemetryConfig};
use roster_api::{
    create_api_router, resolve_bind_addr, ApiConfig, ApiError, ApiResult, AppState, DbClient,
    DbConfig,
};

#[tokio::main]
async fn main() -> ApiResult<()> {
    init_tracing(&TelemetryConfig::default())?;

    let api_config = ApiConfig::from_env();
    let allow_lists = api_config.load_allow_lists()?;

    let db_config = DbConfig::from_env();
    let db = DbClient::from_config(&db_config)?;
    db.migrate().await?;

    let state = AppState::new(Arc::new(db), allow_lists);
    let app: Router = create_api_router(state, &api_config);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting ROSTER API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
