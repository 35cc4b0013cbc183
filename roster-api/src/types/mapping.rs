//! Conversions between wire types and the domain model.
//!
//! Request to draft copies caller fields verbatim. Absent strings become
//! empty and are rejected later by validation; absent lists become empty.
//! System fields (`id`, `creator`, `createdAt`) only ever come from the
//! domain side.

use roster_core::{Agent, AgentDraft};

use super::{AgentResponse, CreateAgentRequest};

impl From<CreateAgentRequest> for AgentDraft {
    fn from(req: CreateAgentRequest) -> Self {
        Self {
            source: req.source.unwrap_or_default(),
            name: req.name.unwrap_or_default(),
            tags: req.tags.unwrap_or_default(),
            icon_url: req.icon_url,
            description: req.description.unwrap_or_default(),
            category: req.category.unwrap_or_default(),
            target_system_url: req.target_system_url.unwrap_or_default(),
            visibility_scope: req.visibility_scope,
        }
    }
}

impl From<AgentDraft> for CreateAgentRequest {
    fn from(draft: AgentDraft) -> Self {
        Self {
            source: Some(draft.source),
            name: Some(draft.name),
            tags: Some(draft.tags),
            icon_url: draft.icon_url,
            description: Some(draft.description),
            category: Some(draft.category),
            target_system_url: Some(draft.target_system_url),
            visibility_scope: draft.visibility_scope,
        }
    }
}

impl From<Agent> for AgentResponse {
    fn from(agent: Agent) -> Self {
        Self {
            id: agent.id,
            source: agent.source,
            name: agent.name,
            tags: agent.tags,
            icon_url: agent.icon_url,
            description: agent.description,
            category: agent.category,
            target_system_url: agent.target_system_url,
            visibility_scope: agent.visibility_scope,
            creator: agent.creator,
            created_at: agent.created_at,
        }
    }
}
