//! Agent Service
//!
//! Business logic for agent registration: validate, check name uniqueness,
//! persist, and map the stored record to a response.

use std::sync::Arc;

use roster_core::{
    Agent, AgentDraft, AgentValidator, AllowLists, RosterError, RosterResult, StorageError,
    SYSTEM_CREATOR,
};
use roster_storage::{AgentRow, AgentStore, AGENT_NAME_CONSTRAINT};
use tracing::{info, warn};

use crate::types::{AgentResponse, CreateAgentRequest};

/// Registers agents against a store and a set of allow-lists.
#[derive(Clone)]
pub struct AgentService {
    store: Arc<dyn AgentStore>,
    allow_lists: Arc<AllowLists>,
}

impl AgentService {
    pub fn new(store: Arc<dyn AgentStore>, allow_lists: Arc<AllowLists>) -> Self {
        Self { store, allow_lists }
    }

    /// Register a new agent.
    ///
    /// # Errors
    /// - `Validation` when a rule rejects the request; nothing is written.
    /// - `NameExists` when the name is taken, either at the pre-check or
    ///   when the store's unique constraint fires on write.
    /// - `Storage` for any other storage failure.
    pub async fn create_agent(&self, req: CreateAgentRequest) -> RosterResult<AgentResponse> {
        let draft = AgentDraft::from(req);

        if let Err(e) = AgentValidator::new(&self.allow_lists).validate(&draft) {
            warn!(field = e.field(), error = %e, "Rejected agent registration");
            return Err(e.into());
        }

        if self.store.exists_by_name(&draft.name).await? {
            warn!(name = %draft.name, "Rejected agent registration: name exists");
            return Err(RosterError::NameExists { name: draft.name });
        }

        let name = draft.name.clone();
        let agent = Agent::register(draft, SYSTEM_CREATOR);

        let saved = match self.store.save(AgentRow::from(&agent)).await {
            Ok(row) => row,
            Err(StorageError::UniqueViolation { constraint })
                if constraint == AGENT_NAME_CONSTRAINT =>
            {
                warn!(name = %name, "Agent name claimed concurrently");
                return Err(RosterError::NameExists { name });
            }
            Err(e) => {
                tracing::error!(name = %name, error = ?e, "Failed to persist agent");
                return Err(e.into());
            }
        };

        let created = Agent::from(saved);
        info!(agent_id = %created.id, name = %created.name, "Agent registered");
        Ok(AgentResponse::from(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use roster_core::{StorageResult, ValidationError};
    use roster_storage::MockStorage;
    use roster_test_utils::assertions::{assert_name_exists, assert_ok, assert_validation_error};
    use roster_test_utils::generators::arb_valid_draft;
    use roster_test_utils::{helper_draft, test_allow_lists};
    use tokio::runtime::Runtime;

    fn helper_request() -> CreateAgentRequest {
        CreateAgentRequest::from(helper_draft())
    }

    fn service_with(store: Arc<dyn AgentStore>) -> AgentService {
        AgentService::new(store, Arc::new(test_allow_lists()))
    }

    /// Store whose pre-check never sees the existing row, as if another
    /// request committed between the check and the write.
    struct BlindPrecheck(MockStorage);

    #[async_trait]
    impl AgentStore for BlindPrecheck {
        async fn exists_by_name(&self, _name: &str) -> StorageResult<bool> {
            Ok(false)
        }

        async fn save(&self, row: AgentRow) -> StorageResult<AgentRow> {
            self.0.save(row).await
        }
    }

    struct FailingStore;

    #[async_trait]
    impl AgentStore for FailingStore {
        async fn exists_by_name(&self, _name: &str) -> StorageResult<bool> {
            Ok(false)
        }

        async fn save(&self, _row: AgentRow) -> StorageResult<AgentRow> {
            Err(StorageError::ConstraintViolation {
                constraint: Some("agents_category_check".to_string()),
                reason: "check failed".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_create_agent_success() -> RosterResult<()> {
        let store = Arc::new(MockStorage::new());
        let service = service_with(store.clone());

        let before = chrono::Utc::now();
        let response = service.create_agent(helper_request()).await?;

        assert!(!response.id.is_nil());
        assert_eq!(response.name, "Helper");
        assert_eq!(response.creator, SYSTEM_CREATOR);
        assert!(response.created_at >= before);
        assert!(response.created_at <= chrono::Utc::now());
        assert_eq!(store.save_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_without_write() -> RosterResult<()> {
        let store = Arc::new(MockStorage::new());
        let service = service_with(store.clone());
        service.create_agent(helper_request()).await?;

        let result = service.create_agent(helper_request()).await;
        assert_name_exists(&result, "Helper");
        assert_eq!(store.save_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_race_on_write_maps_to_name_exists() -> RosterResult<()> {
        let store = Arc::new(BlindPrecheck(MockStorage::new()));
        let service = service_with(store.clone());
        service.create_agent(helper_request()).await?;

        let result = service.create_agent(helper_request()).await;
        assert_name_exists(&result, "Helper");
        assert_eq!(store.0.save_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_other_constraint_stays_storage_error() {
        let service = service_with(Arc::new(FailingStore));
        let result = service.create_agent(helper_request()).await;
        assert!(matches!(
            result,
            Err(RosterError::Storage(StorageError::ConstraintViolation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_invalid_icon_url_writes_nothing() {
        let store = Arc::new(MockStorage::new());
        let service = service_with(store.clone());
        let req = CreateAgentRequest {
            icon_url: Some("not-a-url".to_string()),
            ..helper_request()
        };

        let result = service.create_agent(req).await;
        assert_validation_error(&result);
        assert!(matches!(
            result,
            Err(RosterError::Validation(ValidationError::InvalidIconUrl { .. }))
        ));
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_validation_runs_before_uniqueness() -> RosterResult<()> {
        let store = Arc::new(MockStorage::new());
        let service = service_with(store.clone());
        service.create_agent(helper_request()).await?;

        // Same name, bad category: the category error wins.
        let req = CreateAgentRequest {
            category: Some("Games".to_string()),
            ..helper_request()
        };
        let result = service.create_agent(req).await;
        assert!(matches!(
            result,
            Err(RosterError::Validation(ValidationError::InvalidCategory { .. }))
        ));
        Ok(())
    }

    fn test_runtime() -> Result<Runtime, TestCaseError> {
        Runtime::new().map_err(|e| TestCaseError::fail(format!("Failed to create runtime: {}", e)))
    }

    /// A lowercase word that is in neither the source nor the category list.
    fn arb_unlisted_value() -> impl Strategy<Value = String> {
        "[a-z]{3,12}".prop_filter("must not be allow-listed", |v| {
            let lists = test_allow_lists();
            !lists.allows_source(v) && !lists.allows_category(v)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_valid_request_is_echoed_with_one_write(draft in arb_valid_draft()) {
            let rt = test_runtime()?;
            let store = Arc::new(MockStorage::new());
            let service = service_with(store.clone());

            let result = rt.block_on(service.create_agent(CreateAgentRequest::from(draft.clone())));
            assert_ok(&result);
            let response = result.map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert!(!response.id.is_nil());
            prop_assert_eq!(&response.source, &draft.source);
            prop_assert_eq!(&response.name, &draft.name);
            prop_assert_eq!(&response.tags, &draft.tags);
            prop_assert_eq!(&response.icon_url, &draft.icon_url);
            prop_assert_eq!(&response.description, &draft.description);
            prop_assert_eq!(&response.category, &draft.category);
            prop_assert_eq!(&response.target_system_url, &draft.target_system_url);
            prop_assert_eq!(Some(&response.visibility_scope), draft.visibility_scope.as_ref());
            prop_assert_eq!(response.creator.as_str(), SYSTEM_CREATOR);
            prop_assert!(response.created_at <= chrono::Utc::now());
            prop_assert_eq!(store.save_count(), 1);
        }

        #[test]
        fn prop_unlisted_source_writes_nothing(
            draft in arb_valid_draft(),
            source in arb_unlisted_value(),
        ) {
            let rt = test_runtime()?;
            let store = Arc::new(MockStorage::new());
            let service = service_with(store.clone());
            let req = CreateAgentRequest {
                source: Some(source),
                ..CreateAgentRequest::from(draft)
            };

            let result = rt.block_on(service.create_agent(req));
            assert_validation_error(&result);
            prop_assert!(matches!(
                result,
                Err(RosterError::Validation(ValidationError::InvalidSource { .. }))
            ), "expected InvalidSource validation error");
            prop_assert_eq!(store.save_count(), 0);
        }

        #[test]
        fn prop_unlisted_category_writes_nothing(
            draft in arb_valid_draft(),
            category in arb_unlisted_value(),
        ) {
            let rt = test_runtime()?;
            let store = Arc::new(MockStorage::new());
            let service = service_with(store.clone());
            let req = CreateAgentRequest {
                category: Some(category),
                ..CreateAgentRequest::from(draft)
            };

            let result = rt.block_on(service.create_agent(req));
            assert_validation_error(&result);
            prop_assert!(matches!(
                result,
                Err(RosterError::Validation(ValidationError::InvalidCategory { .. }))
            ), "expected InvalidCategory validation error");
            prop_assert_eq!(store.save_count(), 0);
        }
    }
}
