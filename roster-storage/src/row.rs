//! Persisted shape of an agent.
//!
//! List-valued fields are stored as JSON-encoded arrays in text columns.
//! Nothing outside this module sees the encoded strings.

use roster_core::{Agent, AgentId, ScopeKind, Timestamp, VisibilityScope};
use tracing::warn;

/// Name of the unique constraint on `agents.name`.
pub const AGENT_NAME_CONSTRAINT: &str = "agents_name_key";

/// Name of the primary key constraint on `agents.id`.
pub const AGENT_PKEY_CONSTRAINT: &str = "agents_pkey";

/// One row of the `agents` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRow {
    pub id: AgentId,
    pub source: String,
    pub name: String,
    /// JSON array of tag strings.
    pub tags: String,
    pub icon_url: Option<String>,
    pub description: String,
    pub category: String,
    pub target_system_url: String,
    pub visibility_kind: String,
    /// JSON array of organization or personnel identifiers.
    pub visibility_values: String,
    pub creator: String,
    pub created_at: Timestamp,
}

impl From<&Agent> for AgentRow {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            source: agent.source.clone(),
            name: agent.name.clone(),
            tags: encode_list(&agent.tags),
            icon_url: agent.icon_url.clone(),
            description: agent.description.clone(),
            category: agent.category.clone(),
            target_system_url: agent.target_system_url.clone(),
            visibility_kind: agent
                .visibility_scope
                .kind
                .map(|k| k.as_db_str().to_string())
                .unwrap_or_default(),
            visibility_values: encode_list(&agent.visibility_scope.values),
            creator: agent.creator.clone(),
            created_at: agent.created_at,
        }
    }
}

impl From<Agent> for AgentRow {
    fn from(agent: Agent) -> Self {
        Self::from(&agent)
    }
}

impl From<AgentRow> for Agent {
    fn from(row: AgentRow) -> Self {
        let tags = decode_list(&row.tags, "tags", row.id);
        let values = decode_list(&row.visibility_values, "visibility_values", row.id);
        let kind = decode_kind(&row.visibility_kind, row.id);
        Self {
            id: row.id,
            source: row.source,
            name: row.name,
            tags,
            icon_url: row.icon_url,
            description: row.description,
            category: row.category,
            target_system_url: row.target_system_url,
            visibility_scope: VisibilityScope { kind, values },
            creator: row.creator,
            created_at: row.created_at,
        }
    }
}

/// Encode a list as a JSON array. An empty list encodes as `[]`.
pub fn encode_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a JSON array column.
///
/// Blank columns decode to an empty list. Malformed content also decodes to
/// an empty list, with a warning naming the row and column.
pub fn decode_list(raw: &str, column: &str, id: AgentId) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!(agent_id = %id, column, error = %e, "Malformed list column, reading as empty");
            Vec::new()
        }
    }
}

fn decode_kind(raw: &str, id: AgentId) -> Option<ScopeKind> {
    if raw.trim().is_empty() {
        return None;
    }
    match ScopeKind::from_db_str(raw) {
        Ok(kind) => Some(kind),
        Err(e) => {
            warn!(agent_id = %id, error = %e, "Unknown visibility kind in stored row");
            None
        }
    }
}
