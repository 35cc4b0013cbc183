//! Agent-related API types

use roster_core::{AgentId, Timestamp, VisibilityScope};
use serde::{Deserialize, Serialize};

/// Request to register a new agent.
///
/// Every field is optional at the wire level so that a missing field is
/// reported by the validation rules with its own error code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    /// Origin system of the agent (allow-listed)
    pub source: Option<String>,
    /// Unique display name, at most 50 characters
    pub name: Option<String>,
    /// Classification tags (each allow-listed)
    pub tags: Option<Vec<String>>,
    /// Optional http(s) icon URL
    pub icon_url: Option<String>,
    /// Free text, at most 500 characters
    pub description: Option<String>,
    /// Category (allow-listed)
    pub category: Option<String>,
    /// http(s) URL of the system the agent fronts
    pub target_system_url: Option<String>,
    /// Who may see the agent
    pub visibility_scope: Option<VisibilityScope>,
}

/// Agent response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
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
    /// Creation time as `yyyy-MM-ddTHH:mm:ss.SSSZ`
    #[serde(with = "wire_timestamp")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-03-09T07:05:01.042Z"))]
    pub created_at: Timestamp,
}

mod wire_timestamp {
    use roster_core::{format_timestamp, parse_timestamp, Timestamp};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use roster_core::ScopeKind;

    #[test]
    fn test_request_accepts_camel_case_and_missing_fields() -> Result<(), serde_json::Error> {
        let req: CreateAgentRequest = serde_json::from_str(
            r#"{"source":"fastgpt","name":"Helper","iconUrl":null,
                "targetSystemUrl":"https://x.com",
                "visibilityScope":{"kind":"ORGANIZATION","values":["org1"]}}"#,
        )?;
        assert_eq!(req.source.as_deref(), Some("fastgpt"));
        assert_eq!(req.tags, None);
        assert_eq!(req.description, None);
        assert_eq!(req.target_system_url.as_deref(), Some("https://x.com"));
        assert_eq!(
            req.visibility_scope.and_then(|s| s.kind),
            Some(ScopeKind::Organization)
        );
        Ok(())
    }

    #[test]
    fn test_response_serializes_created_at_with_millis() -> Result<(), serde_json::Error> {
        let Some(created_at) = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single() else {
            panic!("valid calendar date");
        };
        let response = AgentResponse {
            id: uuid::Uuid::nil(),
            source: "hand".to_string(),
            name: "Helper".to_string(),
            tags: vec![],
            icon_url: None,
            description: "d".to_string(),
            category: "Test".to_string(),
            target_system_url: "https://x.com".to_string(),
            visibility_scope: VisibilityScope::new(ScopeKind::Personnel, vec!["u1".to_string()]),
            creator: "system".to_string(),
            created_at,
        };
        let json = serde_json::to_value(&response)?;
        assert_eq!(json["createdAt"], "2024-01-02T03:04:05.000Z");
        assert_eq!(json["targetSystemUrl"], "https://x.com");
        assert_eq!(json["visibilityScope"]["kind"], "PERSONNEL");

        let back: AgentResponse = serde_json::from_value(json)?;
        assert_eq!(back, response);
        Ok(())
    }
}
