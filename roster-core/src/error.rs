//! Error types for ROSTER operations

use thiserror::Error;

/// Validation errors raised by the agent creation rules.
///
/// Every variant carries the offending value so callers can correct the
/// request and resubmit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid description: {reason}")]
    InvalidDescription { reason: String },

    #[error("Invalid source: '{value}'. Allowed sources are: {allowed:?}")]
    InvalidSource { value: String, allowed: Vec<String> },

    #[error("Invalid tag: '{tag}'. Allowed tags are: {allowed:?}")]
    InvalidTag { tag: String, allowed: Vec<String> },

    #[error("Icon URL must be a valid HTTP/HTTPS URL: '{url}'")]
    InvalidIconUrl { url: String },

    #[error("Invalid category: '{category}'. Allowed categories are: {allowed:?}")]
    InvalidCategory { category: String, allowed: Vec<String> },

    #[error("Target system URL must be a valid HTTP/HTTPS URL: '{url}'")]
    InvalidTargetUrl { url: String },

    #[error("Invalid visibility scope: {reason}")]
    InvalidVisibilityScope { reason: String },
}

impl ValidationError {
    /// Request field the error refers to, using wire (camelCase) names.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidName { .. } => "name",
            ValidationError::InvalidDescription { .. } => "description",
            ValidationError::InvalidSource { .. } => "source",
            ValidationError::InvalidTag { .. } => "tags",
            ValidationError::InvalidIconUrl { .. } => "iconUrl",
            ValidationError::InvalidCategory { .. } => "category",
            ValidationError::InvalidTargetUrl { .. } => "targetSystemUrl",
            ValidationError::InvalidVisibilityScope { .. } => "visibilityScope",
        }
    }

    /// The rejected value, when there is a single one to report.
    pub fn rejected_value(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidName { name, .. } => Some(name),
            ValidationError::InvalidSource { value, .. } => Some(value),
            ValidationError::InvalidTag { tag, .. } => Some(tag),
            ValidationError::InvalidIconUrl { url } => Some(url),
            ValidationError::InvalidCategory { category, .. } => Some(category),
            ValidationError::InvalidTargetUrl { url } => Some(url),
            ValidationError::InvalidDescription { .. }
            | ValidationError::InvalidVisibilityScope { .. } => None,
        }
    }
}

/// Storage layer errors.
///
/// Constraint violations are reported separately from backend failures so
/// the creation flow can turn a unique-name violation into a duplicate-name
/// error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Unique constraint '{constraint}' violated")]
    UniqueViolation { constraint: String },

    #[error("Integrity constraint violated ({constraint:?}): {reason}")]
    ConstraintViolation {
        constraint: Option<String>,
        reason: String,
    },

    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Storage backend failure: {reason}")]
    Backend { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unable to read configuration from {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Master error type for all ROSTER errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Agent name '{name}' already exists")]
    NameExists { name: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for ROSTER operations.
pub type RosterResult<T> = Result<T, RosterError>;

/// Result type alias for storage collaborators.
pub type StorageResult<T> = Result<T, StorageError>;
