//! ROSTER Test Utilities
//!
//! Centralized test infrastructure for the ROSTER workspace:
//! - Proptest generators for drafts and scopes
//! - Test fixtures for common scenarios
//! - Custom assertions for ROSTER-specific validation

// Re-export mock storage from its source crate
pub use roster_storage::MockStorage;

// Re-export core types for convenience
pub use roster_core::{
    Agent, AgentDraft, AgentId, AllowLists, RosterError, RosterResult, ScopeKind, StorageError,
    Timestamp, ValidationError, VisibilityScope, SYSTEM_CREATOR,
};

pub use fixtures::*;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating ROSTER inputs.
    //!
    //! Everything generated here passes validation against
    //! [`test_allow_lists`](super::fixtures::test_allow_lists).

    use super::*;
    use proptest::prelude::*;

    /// Generate a Timestamp with millisecond precision.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        // 2020-01-01 .. 2030-01-01
        (1_577_836_800_000i64..1_893_456_000_000i64).prop_map(|millis| {
            chrono::DateTime::from_timestamp_millis(millis).unwrap_or_else(chrono::Utc::now)
        })
    }

    /// Generate a name of 1..=50 characters that is not blank.
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 _-]{0,49}"
    }

    /// Generate a description of 1..=500 characters that is not blank.
    pub fn arb_description() -> impl Strategy<Value = String> {
        "[a-z][a-zA-Z0-9 .,]{0,120}"
    }

    /// Generate an absolute http(s) URL.
    pub fn arb_http_url() -> impl Strategy<Value = String> {
        ("https?", "[a-z]{1,12}", "(com|io|net)", "(/[a-z0-9]{1,8}){0,3}")
            .prop_map(|(scheme, host, tld, path)| format!("{}://{}.{}{}", scheme, host, tld, path))
    }

    /// Generate a source from the test allow-list.
    pub fn arb_source() -> impl Strategy<Value = String> {
        prop::sample::select(test_allow_lists().sources)
    }

    /// Generate a category from the test allow-list.
    pub fn arb_category() -> impl Strategy<Value = String> {
        prop::sample::select(test_allow_lists().categories)
    }

    /// Generate tags from the test allow-list, possibly empty or repeated.
    pub fn arb_tags() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(prop::sample::select(test_allow_lists().tags), 0..4)
    }

    /// Generate a restrictive scope with at least one value.
    pub fn arb_visibility_scope() -> impl Strategy<Value = VisibilityScope> {
        (
            prop_oneof![Just(ScopeKind::Organization), Just(ScopeKind::Personnel)],
            prop::collection::vec("[a-z0-9]{1,12}", 1..5),
        )
            .prop_map(|(kind, values)| VisibilityScope::new(kind, values))
    }

    /// Generate a draft that passes every storage-independent rule.
    pub fn arb_valid_draft() -> impl Strategy<Value = AgentDraft> {
        (
            arb_source(),
            arb_name(),
            arb_tags(),
            prop::option::of(arb_http_url()),
            arb_description(),
            arb_category(),
            arb_http_url(),
            arb_visibility_scope(),
        )
            .prop_map(
                |(source, name, tags, icon_url, description, category, target, scope)| {
                    AgentDraft {
                        source,
                        name,
                        tags,
                        icon_url,
                        description,
                        category,
                        target_system_url: target,
                        visibility_scope: Some(scope),
                    }
                },
            )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// Allow-lists used across the test suites: the shipped defaults plus
    /// the ASCII `AI` tag and `Test` category.
    pub fn test_allow_lists() -> AllowLists {
        let mut lists = AllowLists::default();
        lists.tags.insert(0, "AI".to_string());
        lists.categories.insert(0, "Test".to_string());
        lists
    }

    /// The canonical valid draft: `fastgpt` / `Helper` / `AI` / `Test`.
    pub fn helper_draft() -> AgentDraft {
        AgentDraft {
            source: "fastgpt".to_string(),
            name: "Helper".to_string(),
            tags: vec!["AI".to_string()],
            icon_url: None,
            description: "d".to_string(),
            category: "Test".to_string(),
            target_system_url: "https://x.com".to_string(),
            visibility_scope: Some(org_scope(&["org1"])),
        }
    }

    /// A valid draft with the given name.
    pub fn named_draft(name: &str) -> AgentDraft {
        AgentDraft {
            name: name.to_string(),
            ..helper_draft()
        }
    }

    /// An ORGANIZATION scope with the given values.
    pub fn org_scope(values: &[&str]) -> VisibilityScope {
        VisibilityScope::new(
            ScopeKind::Organization,
            values.iter().map(|v| v.to_string()).collect(),
        )
    }

    /// The canonical valid request body, as JSON text.
    pub fn helper_request_json() -> &'static str {
        r#"{"source":"fastgpt","name":"Helper","tags":["AI"],"description":"d","category":"Test","targetSystemUrl":"https://x.com","visibilityScope":{"kind":"ORGANIZATION","values":["org1"]}}"#
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for ROSTER-specific validation.

    use super::*;

    /// Assert that a RosterResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &RosterResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a RosterResult is a Validation error.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &RosterResult<T>) {
        match result {
            Err(RosterError::Validation(_)) => {}
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    /// Assert that a RosterResult is a NameExists error for `name`.
    #[track_caller]
    pub fn assert_name_exists<T: std::fmt::Debug>(result: &RosterResult<T>, name: &str) {
        match result {
            Err(RosterError::NameExists { name: n }) => {
                assert_eq!(n, name, "Wrong name in NameExists error");
            }
            other => panic!("Expected NameExists for {:?}, got: {:?}", name, other),
        }
    }

    /// Assert that an agent carries the system-assigned fields.
    #[track_caller]
    pub fn assert_system_fields(agent: &Agent) {
        assert!(!agent.id.is_nil(), "Agent id must not be nil");
        assert_eq!(agent.creator, SYSTEM_CREATOR);
        assert!(
            agent.created_at <= chrono::Utc::now(),
            "createdAt {} is in the future",
            agent.created_at
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use roster_core::AgentValidator;

    #[test]
    fn test_helper_draft_is_valid() {
        let lists = test_allow_lists();
        assert_eq!(AgentValidator::new(&lists).validate(&helper_draft()), Ok(()));
        assert!(lists.validate().is_ok());
    }

    #[test]
    fn test_registered_agent_has_system_fields() {
        let agent = Agent::register(named_draft("Other"), SYSTEM_CREATOR);
        assertions::assert_system_fields(&agent);
        assert_eq!(agent.name, "Other");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_generated_drafts_validate(draft in generators::arb_valid_draft()) {
            let lists = test_allow_lists();
            prop_assert_eq!(AgentValidator::new(&lists).validate(&draft), Ok(()));
        }

        #[test]
        fn prop_generated_timestamps_have_millis(ts in generators::arb_timestamp()) {
            let rendered = roster_core::format_timestamp(&ts);
            prop_assert_eq!(roster_core::parse_timestamp(&rendered), Ok(ts));
        }
    }
}
