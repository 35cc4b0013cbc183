//! Error Types for ROSTER API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use roster_core::{format_timestamp, RosterError, StorageError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request body or field shape is invalid
    ValidationFailed,

    /// Source is not in the allow-list
    InvalidSource,

    /// A tag is not in the allow-list
    InvalidTag,

    /// Icon URL is not an http(s) URL
    InvalidIconUrl,

    /// Category is not in the allow-list
    InvalidCategory,

    /// Target system URL is missing or not an http(s) URL
    InvalidTargetUrl,

    /// Visibility scope is missing or inconsistent
    InvalidVisibilityScope,

    // ========================================================================
    // Conflict Errors (409)
    // ========================================================================
    /// An agent with the same name already exists
    NameExists,

    /// A storage integrity constraint rejected the write
    StorageConstraintViolation,

    // ========================================================================
    // Server Errors (500, 503)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    /// Database connection pool exhausted
    ConnectionPoolExhausted,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidSource
            | ErrorCode::InvalidTag
            | ErrorCode::InvalidIconUrl
            | ErrorCode::InvalidCategory
            | ErrorCode::InvalidTargetUrl
            | ErrorCode::InvalidVisibilityScope => StatusCode::BAD_REQUEST,

            ErrorCode::NameExists | ErrorCode::StorageConstraintViolation => StatusCode::CONFLICT,

            ErrorCode::ServiceUnavailable | ErrorCode::ConnectionPoolExhausted => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidSource => "Invalid source",
            ErrorCode::InvalidTag => "Invalid tag",
            ErrorCode::InvalidIconUrl => "Icon URL must be a valid HTTP/HTTPS URL",
            ErrorCode::InvalidCategory => "Invalid category",
            ErrorCode::InvalidTargetUrl => "Target system URL must be a valid HTTP/HTTPS URL",
            ErrorCode::InvalidVisibilityScope => "Invalid visibility scope",
            ErrorCode::NameExists => "Agent name already exists",
            ErrorCode::StorageConstraintViolation => "Data integrity violation",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
            ErrorCode::ConnectionPoolExhausted => "Connection pool exhausted",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl From<&ValidationError> for ErrorCode {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::InvalidName { .. } | ValidationError::InvalidDescription { .. } => {
                ErrorCode::ValidationFailed
            }
            ValidationError::InvalidSource { .. } => ErrorCode::InvalidSource,
            ValidationError::InvalidTag { .. } => ErrorCode::InvalidTag,
            ValidationError::InvalidIconUrl { .. } => ErrorCode::InvalidIconUrl,
            ValidationError::InvalidCategory { .. } => ErrorCode::InvalidCategory,
            ValidationError::InvalidTargetUrl { .. } => ErrorCode::InvalidTargetUrl,
            ValidationError::InvalidVisibilityScope { .. } => ErrorCode::InvalidVisibilityScope,
        }
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (`{field, value}` for rejected input)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,

    /// When the error was raised, as `yyyy-MM-ddTHH:mm:ss.SSSZ`
    #[cfg_attr(feature = "openapi", schema(example = "2024-03-09T07:05:01.042Z"))]
    pub timestamp: String,

    /// Request path that produced the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            timestamp: format_timestamp(&Utc::now()),
            path: None,
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            details: None,
            timestamp: format_timestamp(&Utc::now()),
            path: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Record the request path the error answers.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create a ValidationFailed error.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Create a NameExists error carrying the duplicate name.
    pub fn name_exists(name: &str) -> Self {
        Self::new(
            ErrorCode::NameExists,
            format!("Agent name '{}' already exists", name),
        )
        .with_details(serde_json::json!({ "field": "name", "value": name }))
    }

    /// Create a StorageConstraintViolation error.
    pub fn storage_constraint_violation() -> Self {
        Self::from_code(ErrorCode::StorageConstraintViolation)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a ServiceUnavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Create a ConnectionPoolExhausted error.
    pub fn connection_pool_exhausted() -> Self {
        Self::from_code(ErrorCode::ConnectionPoolExhausted)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let code = ErrorCode::from(&err);
        ApiError::new(code, err.to_string()).with_details(serde_json::json!({
            "field": err.field(),
            "value": err.rejected_value(),
        }))
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueViolation { .. } | StorageError::ConstraintViolation { .. } => {
                tracing::error!("Storage constraint violation: {:?}", err);
                ApiError::storage_constraint_violation()
            }
            StorageError::Unavailable { .. } => {
                tracing::error!("Storage unavailable: {:?}", err);
                ApiError::service_unavailable("Storage is temporarily unavailable")
            }
            StorageError::Backend { .. } | StorageError::LockPoisoned => {
                tracing::error!("Storage failure: {:?}", err);
                ApiError::from_code(ErrorCode::InternalError)
            }
        }
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::Validation(e) => e.into(),
            RosterError::NameExists { name } => ApiError::name_exists(&name),
            RosterError::Storage(e) => e.into(),
            RosterError::Config(e) => {
                tracing::error!("Configuration error: {:?}", e);
                ApiError::from_code(ErrorCode::InternalError)
            }
        }
    }
}

// ============================================================================
// CONVERSIONS FROM STANDARD ERRORS
// ============================================================================

/// Convert from tokio_postgres::Error to ApiError.
impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        // Log the full error for debugging
        tracing::error!("Database error: {:?}", err);

        // Return a generic error to avoid leaking internal details
        ApiError::from_code(ErrorCode::InternalError)
    }
}

/// Convert from deadpool_postgres::PoolError to ApiError.
impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        tracing::error!("Connection pool error: {:?}", err);

        match err {
            deadpool_postgres::PoolError::Timeout(_) => ApiError::connection_pool_exhausted(),
            deadpool_postgres::PoolError::Closed => {
                ApiError::service_unavailable("Database connection pool is closed")
            }
            _ => ApiError::internal_error("Failed to acquire database connection"),
        }
    }
}

/// Malformed or non-JSON bodies become a structured validation error.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::validation_failed(format!("Invalid request body: {}", rejection.body_text()))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::ValidationFailed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidTag.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NameExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::StorageConstraintViolation.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::InternalError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ErrorCode::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_error_conversion_carries_field_and_value() {
        let err = ApiError::from(ValidationError::InvalidCategory {
            category: "Games".to_string(),
            allowed: vec!["Test".to_string()],
        });
        assert_eq!(err.code, ErrorCode::InvalidCategory);
        assert!(err.message.contains("Games"));
        assert_eq!(
            err.details,
            Some(serde_json::json!({ "field": "category", "value": "Games" }))
        );
    }

    #[test]
    fn test_scope_error_has_null_value() {
        let err = ApiError::from(ValidationError::InvalidVisibilityScope {
            reason: "values cannot be empty".to_string(),
        });
        assert_eq!(err.code, ErrorCode::InvalidVisibilityScope);
        assert_eq!(
            err.details,
            Some(serde_json::json!({ "field": "visibilityScope", "value": null }))
        );
    }

    #[test]
    fn test_name_and_description_map_to_validation_failed() {
        let err = ApiError::from(ValidationError::InvalidDescription {
            reason: "too long".to_string(),
        });
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_name_exists_conversion() {
        let err = ApiError::from(RosterError::NameExists {
            name: "Helper".to_string(),
        });
        assert_eq!(err.code, ErrorCode::NameExists);
        assert!(err.message.contains("Helper"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_storage_errors_do_not_leak_detail() {
        let err = ApiError::from(RosterError::Storage(StorageError::ConstraintViolation {
            constraint: Some("agents_category_check".to_string()),
            reason: "secret detail".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::StorageConstraintViolation);
        assert!(!err.message.contains("secret"));

        let err = ApiError::from(RosterError::Storage(StorageError::Backend {
            reason: "connection reset by peer".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("peer"));

        let err = ApiError::from(StorageError::Unavailable {
            reason: "pool closed".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_error_serialization() -> Result<(), serde_json::Error> {
        let err = ApiError::name_exists("Helper");
        let json = serde_json::to_string(&err)?;

        assert!(json.contains("NAME_EXISTS"));
        assert!(json.contains("Helper"));

        let deserialized: ApiError = serde_json::from_str(&json)?;
        assert_eq!(deserialized, err);
        Ok(())
    }

    #[test]
    fn test_details_omitted_when_absent() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&ApiError::from_code(ErrorCode::InternalError))?;
        assert!(!json.contains("details"));
        assert!(!json.contains("path"));
        Ok(())
    }

    #[test]
    fn test_error_carries_timestamp_and_path() -> Result<(), serde_json::Error> {
        let before = Utc::now();
        let err = ApiError::validation_failed("bad").with_path("/api/agents");
        let value = serde_json::to_value(&err)?;

        assert_eq!(value["path"], "/api/agents");
        let stamp = value["timestamp"].as_str().unwrap_or_default();
        let parsed = roster_core::parse_timestamp(stamp);
        assert!(matches!(parsed, Ok(ts) if ts <= Utc::now() && ts >= before - chrono::Duration::milliseconds(1)));
        Ok(())
    }
}
