//! Agent registry: identity assignment and the canonical agent collection.

use crate::agent::entity::{Agent, AgentDraft, AgentUpdate};
use crate::error::{ApiError, StorageError};
use crate::store::{self, KeyValueStore, MemoryStore};
use crate::types::AgentId;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Storage key used when no configuration overrides it
pub const DEFAULT_AGENTS_KEY: &str = "ai-warroom-agents";

/// Agent registry for managing live agents
///
/// Holds the in-memory aggregate (listing follows insertion order) and
/// delegates persistence to the key-value store port. Every read returns an
/// owned snapshot; callers re-fetch after any update instead of holding on
/// to an earlier snapshot.
pub struct AgentRegistry {
    agents: RwLock<IndexMap<AgentId, Agent>>,
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
}

impl AgentRegistry {
    /// Create an empty registry persisting under `storage_key`
    pub fn new(store: Arc<dyn KeyValueStore>, storage_key: impl Into<String>) -> Self {
        Self {
            agents: RwLock::new(IndexMap::new()),
            store,
            storage_key: storage_key.into(),
        }
    }

    /// Create an empty registry backed by a private in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), DEFAULT_AGENTS_KEY)
    }

    /// Register a new agent with a fresh id and timestamps
    pub fn create_agent(&self, draft: AgentDraft) -> Agent {
        let id = uuid::Uuid::new_v4().to_string();
        let agent = Agent::from_draft(id.clone(), draft);
        self.agents.write().insert(id, agent.clone());
        tracing::info!(agent_id = %agent.id(), name = %agent.name(), "Created agent");
        agent
    }

    pub fn get_agent(&self, agent_id: &str) -> Option<Agent> {
        self.agents.read().get(agent_id).cloned()
    }

    /// Snapshot of every agent in insertion order
    pub fn get_all_agents(&self) -> Vec<Agent> {
        self.agents.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }

    /// Replace the stored agent with `update` merged over its current state.
    ///
    /// Returns the replacement, or `None` when the id is unknown.
    pub fn update_agent(&self, agent_id: &str, update: AgentUpdate) -> Option<Agent> {
        let mut agents = self.agents.write();
        let current = agents.get(agent_id)?;
        let replacement = current.merged(update);
        agents.insert(agent_id.to_string(), replacement.clone());
        tracing::debug!(agent_id, "Updated agent");
        Some(replacement)
    }

    pub fn delete_agent(&self, agent_id: &str) -> bool {
        let removed = self.agents.write().shift_remove(agent_id).is_some();
        if removed {
            tracing::info!(agent_id, "Deleted agent");
        }
        removed
    }

    /// Apply an experience award in place; returns the updated snapshot.
    pub fn award_experience(&self, agent_id: &str, amount: i64) -> Option<Agent> {
        let mut agents = self.agents.write();
        let agent = agents.get_mut(agent_id)?;
        let previous = agent.level();
        if agent.add_experience(amount) {
            tracing::info!(
                agent_id,
                from = previous.get(),
                to = agent.level().get(),
                "Agent leveled up"
            );
        }
        Some(agent.clone())
    }

    /// Toggle a module on an agent.
    ///
    /// `None` when the agent is unknown, `Some(false)` when the module is.
    pub fn set_module_active(&self, agent_id: &str, module_id: &str, active: bool) -> Option<bool> {
        let mut agents = self.agents.write();
        let agent = agents.get_mut(agent_id)?;
        Some(agent.set_module_active(module_id, active))
    }

    /// Overwrite the persisted collection with the current agents
    pub fn save_agents(&self) -> Result<(), ApiError> {
        let snapshot = self.get_all_agents();
        store::save_collection(self.store.as_ref(), &self.storage_key, &snapshot)?;
        Ok(())
    }

    /// Merge persisted agents into the live collection.
    ///
    /// Stored agents replace live agents with the same id; other live agents
    /// are kept. Malformed stored data is logged and the collection is reset
    /// to empty. Returns the number of agents read from storage.
    pub fn load_agents(&self) -> Result<usize, ApiError> {
        match store::load_collection::<Agent>(self.store.as_ref(), &self.storage_key) {
            Ok(Some(stored)) => {
                let count = stored.len();
                let mut agents = self.agents.write();
                for agent in stored {
                    agents.insert(agent.id().to_string(), agent);
                }
                Ok(count)
            }
            Ok(None) => Ok(0),
            Err(StorageError::Malformed { key, reason }) => {
                tracing::warn!(key = %key, reason = %reason, "Failed to load agents");
                self.agents.write().clear();
                Ok(0)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::in_memory()
    }
}
