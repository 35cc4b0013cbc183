//! Agent REST API Routes

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::{
    error::{ApiError, ApiResult},
    services::AgentService,
    state::AppState,
    types::{AgentResponse, CreateAgentRequest},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/agents - Register a new agent
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/agents",
    tag = "Agents",
    request_body = CreateAgentRequest,
    responses(
        (status = 201, description = "Agent registered successfully", body = AgentResponse),
        (status = 400, description = "Request failed validation", body = ApiError),
        (status = 409, description = "Agent name already exists", body = ApiError),
        (status = 500, description = "Unexpected failure", body = ApiError),
    ),
))]
pub async fn create_agent(
    OriginalUri(uri): OriginalUri,
    State(service): State<AgentService>,
    payload: Result<Json<CreateAgentRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let created: ApiResult<AgentResponse> = match payload {
        Ok(Json(req)) => service.create_agent(req).await.map_err(ApiError::from),
        Err(rejection) => Err(ApiError::from(rejection)),
    };
    let agent = created.map_err(|e| e.with_path(uri.path()))?;
    Ok((StatusCode::CREATED, Json(agent)))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn create_router() -> Router<AppState> {
    Router::new().route("/api/agents", post(create_agent))
}
