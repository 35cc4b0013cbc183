//! ROSTER Storage - Storage Trait and In-Memory Implementation
//!
//! Defines the storage abstraction for registered agents.
//! The PostgreSQL implementation lives in roster-api.

pub mod row;

pub use row::{decode_list, encode_list, AgentRow, AGENT_NAME_CONSTRAINT, AGENT_PKEY_CONSTRAINT};

use async_trait::async_trait;
use roster_core::{AgentId, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

// ============================================================================
// STORAGE TRAIT
// ============================================================================

/// Async storage for agents.
///
/// Implementations must enforce name uniqueness and report a violation as
/// [`StorageError::UniqueViolation`] naming [`AGENT_NAME_CONSTRAINT`].
#[async_trait]
pub trait AgentStore: Send + Sync {
    /// Whether an agent with exactly this name is stored.
    async fn exists_by_name(&self, name: &str) -> StorageResult<bool>;

    /// Persist a new agent row and return it as stored.
    async fn save(&self, row: AgentRow) -> StorageResult<AgentRow>;

    /// Readiness probe.
    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}

// ============================================================================
// MOCK STORAGE
// ============================================================================

/// In-memory storage for tests and local runs.
///
/// Enforces the same name and id constraints as the database under a single
/// write lock.
#[derive(Debug, Default)]
pub struct MockStorage {
    agents: Arc<RwLock<HashMap<AgentId, AgentRow>>>,
    saves: AtomicUsize,
}

impl MockStorage {
    /// Create a new mock storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of stored agents.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.agents.read().map_err(|_| StorageError::LockPoisoned)?.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Look up a stored row by exact name.
    pub fn find_by_name(&self, name: &str) -> StorageResult<Option<AgentRow>> {
        let agents = self.agents.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(agents.values().find(|row| row.name == name).cloned())
    }

    /// Clear all stored data.
    pub fn clear(&self) -> StorageResult<()> {
        self.agents
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .clear();
        Ok(())
    }
}

#[async_trait]
impl AgentStore for MockStorage {
    async fn exists_by_name(&self, name: &str) -> StorageResult<bool> {
        Ok(self.find_by_name(name)?.is_some())
    }

    async fn save(&self, row: AgentRow) -> StorageResult<AgentRow> {
        let mut agents = self.agents.write().map_err(|_| StorageError::LockPoisoned)?;
        if agents.contains_key(&row.id) {
            return Err(StorageError::UniqueViolation {
                constraint: AGENT_PKEY_CONSTRAINT.to_string(),
            });
        }
        if agents.values().any(|existing| existing.name == row.name) {
            return Err(StorageError::UniqueViolation {
                constraint: AGENT_NAME_CONSTRAINT.to_string(),
            });
        }
        agents.insert(row.id, row.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(row)
    }
}
