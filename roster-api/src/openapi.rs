//! OpenAPI document for the ROSTER API
//!
//! Generated with utoipa from the wire types and route annotations.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use crate::routes::{agent, health};
use crate::types::{AgentResponse, CreateAgentRequest};

use roster_core::{ScopeKind, VisibilityScope};

/// OpenAPI document for ROSTER API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ROSTER API",
        description = "Agent registration service",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Agents", description = "Agent registration"),
        (name = "Health", description = "Liveness and readiness probes")
    ),
    paths(
        agent::create_agent,
        health::ping,
        health::readiness,
    ),
    components(schemas(
        CreateAgentRequest,
        AgentResponse,
        VisibilityScope,
        ScopeKind,
        ApiError,
        ErrorCode,
        HealthResponse,
        HealthStatus,
        HealthDetails,
        ComponentHealth,
    ))
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Render the document as pretty-printed JSON.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
