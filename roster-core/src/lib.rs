//! ROSTER Core - Agent Types and Rules
//!
//! Data types, allow-list configuration and the storage-independent
//! validation rules for agent registration. All other crates depend on this.

mod config;
mod entities;
mod error;
mod identity;
pub mod validation;

pub use config::{
    AllowLists, ENV_ALLOWED_CATEGORIES, ENV_ALLOWED_SOURCES, ENV_ALLOWED_TAGS,
    ENV_ALLOW_UNRESTRICTED_SCOPE,
};
pub use entities::{
    Agent, AgentDraft, ScopeKind, ScopeKindParseError, VisibilityScope, SYSTEM_CREATOR,
};
pub use error::{
    ConfigError, RosterError, RosterResult, StorageError, StorageResult, ValidationError,
};
pub use identity::{
    format_timestamp, new_agent_id, parse_timestamp, AgentId, Timestamp, TIMESTAMP_FORMAT,
};
pub use validation::{AgentValidator, MAX_DESCRIPTION_CHARS, MAX_NAME_CHARS};
