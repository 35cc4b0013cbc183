//! REST API Routes Module
//!
//! Assembles the route modules into one router:
//! - POST /api/agents
//! - GET /health/ping, GET /health/ready
//! - GET /openapi.json (feature `openapi`)

pub mod agent;
pub mod health;

use axum::{
    http::{header, Method},
    Router,
};
use std::time::Duration;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::state::AppState;

#[cfg(feature = "openapi")]
use crate::openapi::ApiDoc;
#[cfg(feature = "openapi")]
use axum::{response::IntoResponse, routing::get, Json};
#[cfg(feature = "openapi")]
use utoipa::OpenApi;

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let allowed = config.clone();
        let cors = cors.allow_origin(AllowOrigin::predicate(move |origin, _parts| {
            origin
                .to_str()
                .map(|o| allowed.is_origin_allowed(o))
                .unwrap_or(false)
        }));

        if config.cors_allow_credentials {
            cors.allow_credentials(true)
        } else {
            cors
        }
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the complete API router.
///
/// Layers, outermost first: CORS, request tracing, concurrency cap.
pub fn create_api_router(state: AppState, api_config: &ApiConfig) -> Router {
    #[allow(unused_mut)]
    let mut router = Router::new()
        .merge(agent::create_router())
        .merge(health::create_router());

    #[cfg(feature = "openapi")]
    {
        router = router.route("/openapi.json", get(openapi_json));
    }

    router
        .with_state(state)
        .layer(GlobalConcurrencyLimitLayer::new(
            api_config.max_concurrent_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(api_config))
}
