//! Agent entity and its visibility scope

use crate::{new_agent_id, AgentId, Timestamp, ValidationError};
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Principal recorded as `creator` on every agent created through the service.
pub const SYSTEM_CREATOR: &str = "system";

// ============================================================================
// VISIBILITY SCOPE
// ============================================================================

/// Who may see an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeKind {
    /// Restricted to the listed organizations
    Organization,
    /// Restricted to the listed people
    #[serde(alias = "PERSON")]
    Personnel,
    /// Unrestricted; only accepted when enabled in the allow-list config
    All,
}

impl ScopeKind {
    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            ScopeKind::Organization => "ORGANIZATION",
            ScopeKind::Personnel => "PERSONNEL",
            ScopeKind::All => "ALL",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, ScopeKindParseError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ORGANIZATION" => Ok(ScopeKind::Organization),
            "PERSONNEL" | "PERSON" => Ok(ScopeKind::Personnel),
            "ALL" => Ok(ScopeKind::All),
            _ => Err(ScopeKindParseError(s.to_string())),
        }
    }

    /// Restrictive kinds need at least one identifier in `values`.
    pub fn requires_values(&self) -> bool {
        matches!(self, ScopeKind::Organization | ScopeKind::Personnel)
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for ScopeKind {
    type Err = ScopeKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid scope kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeKindParseError(pub String);

impl fmt::Display for ScopeKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid visibility scope kind: {}", self.0)
    }
}

impl std::error::Error for ScopeKindParseError {}

/// Visibility scope value object owned by exactly one agent.
///
/// `values` keeps caller order and duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VisibilityScope {
    pub kind: Option<ScopeKind>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub values: Vec<String>,
}

/// `"values": null` reads the same as an absent or empty list.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl VisibilityScope {
    pub fn new(kind: ScopeKind, values: Vec<String>) -> Self {
        Self {
            kind: Some(kind),
            values,
        }
    }

    /// Check the scope invariants.
    ///
    /// `allow_unrestricted` decides whether [`ScopeKind::All`] is accepted.
    pub fn validate(&self, allow_unrestricted: bool) -> Result<(), ValidationError> {
        let kind = self
            .kind
            .ok_or_else(|| ValidationError::InvalidVisibilityScope {
                reason: "Visibility scope kind cannot be null".to_string(),
            })?;

        if kind == ScopeKind::All && !allow_unrestricted {
            return Err(ValidationError::InvalidVisibilityScope {
                reason: "Unrestricted (ALL) visibility is not enabled".to_string(),
            });
        }

        if kind.requires_values() && self.values.is_empty() {
            return Err(ValidationError::InvalidVisibilityScope {
                reason: format!("Visibility values cannot be empty for {} kind", kind),
            });
        }

        Ok(())
    }
}

// ============================================================================
// AGENT
// ============================================================================

/// Caller-supplied agent fields, before the system assigns identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDraft {
    pub source: String,
    pub name: String,
    pub tags: Vec<String>,
    pub icon_url: Option<String>,
    pub description: String,
    pub category: String,
    pub target_system_url: String,
    pub visibility_scope: Option<VisibilityScope>,
}

/// A registered agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: AgentId,
    pub source: String,
    pub name: String,
    pub tags: Vec<String>,
    pub icon_url: Option<String>,
    pub description: String,
    pub category: String,
    pub target_system_url: String,
    pub visibility_scope: VisibilityScope,
    pub creator: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

impl Agent {
    /// Build an agent from a draft with explicit system fields.
    pub fn from_draft(draft: AgentDraft, id: AgentId, creator: &str, created_at: Timestamp) -> Self {
        Self {
            id,
            source: draft.source,
            name: draft.name,
            tags: draft.tags,
            icon_url: draft.icon_url,
            description: draft.description,
            category: draft.category,
            target_system_url: draft.target_system_url,
            visibility_scope: draft.visibility_scope.unwrap_or_default(),
            creator: creator.to_string(),
            created_at,
        }
    }

    /// Build an agent with a fresh id, the current time and the given creator.
    pub fn register(draft: AgentDraft, creator: &str) -> Self {
        Self::from_draft(draft, new_agent_id(), creator, Utc::now())
    }

    /// The caller-supplied portion of this agent.
    pub fn draft(&self) -> AgentDraft {
        AgentDraft {
            source: self.source.clone(),
            name: self.name.clone(),
            tags: self.tags.clone(),
            icon_url: self.icon_url.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            target_system_url: self.target_system_url.clone(),
            visibility_scope: Some(self.visibility_scope.clone()),
        }
    }
}
