//! ROSTER API - REST layer for the agent registry
//!
//! Exposes `POST /api/agents` plus health probes over Axum. Requests are
//! validated against the configured allow-lists, checked for name
//! uniqueness and persisted through an [`roster_storage::AgentStore`],
//! either PostgreSQL (`DbClient`) or the in-memory mock used in tests.

pub mod config;
pub mod db;
pub mod error;
pub mod macros;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use config::{resolve_bind_addr, ApiConfig};
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::AgentService;
pub use state::{AppState, SharedStore};
pub use types::*;
