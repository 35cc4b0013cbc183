//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use roster_core::AllowLists;
use roster_storage::AgentStore;

use crate::services::AgentService;

/// Handle to the configured agent store.
pub type SharedStore = Arc<dyn AgentStore>;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub agents: AgentService,
    /// Same store the service writes to; used by readiness checks.
    pub store: SharedStore,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: SharedStore, allow_lists: AllowLists) -> Self {
        Self {
            agents: AgentService::new(store.clone(), Arc::new(allow_lists)),
            store,
            start_time: Instant::now(),
        }
    }
}

crate::impl_from_ref!(AgentService, agents);
crate::impl_from_ref!(SharedStore, store);
crate::impl_from_ref!(Instant, start_time);
