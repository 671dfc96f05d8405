//! Experience ledger: append-only award events and level projections.

use crate::agent::{Agent, AgentLevel, AgentRegistry};
use crate::error::ApiError;
use crate::store::{self, KeyValueStore};
use crate::types::{now, record_id, AgentId, Timestamp};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key used when no configuration overrides it
pub const DEFAULT_EVENTS_KEY: &str = "ai-warroom-experience-events";

/// What an experience award was given for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceKind {
    CodeReview,
    SecurityScan,
    Optimization,
    Challenge,
    Contribution,
}

/// Immutable record of one award
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEvent {
    pub id: String,
    pub agent_id: AgentId,
    #[serde(rename = "type")]
    pub kind: ExperienceKind,
    pub amount: i64,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Experience ledger
///
/// Applies awards to agents through the registry and keeps the event
/// history. Events are never mutated or removed.
pub struct ExperienceLedger {
    registry: Arc<AgentRegistry>,
    events: RwLock<Vec<ExperienceEvent>>,
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
}

impl ExperienceLedger {
    /// Create a ledger and load its persisted events
    pub fn open(
        registry: Arc<AgentRegistry>,
        store: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let storage_key = storage_key.into();
        let events = store::load_collection_or_reset(store.as_ref(), &storage_key)?;
        Ok(Self {
            registry,
            events: RwLock::new(events),
            store,
            storage_key,
        })
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// Award experience to an agent.
    ///
    /// Returns `Ok(None)` when the agent is unknown. Otherwise the agent is
    /// updated and persisted, the event is appended and persisted, and the
    /// updated agent is returned.
    pub fn add_experience(
        &self,
        agent_id: &str,
        kind: ExperienceKind,
        amount: i64,
        details: Option<&str>,
    ) -> Result<Option<Agent>, ApiError> {
        let Some(agent) = self.registry.award_experience(agent_id, amount) else {
            tracing::debug!(agent_id, "Experience award for unknown agent ignored");
            return Ok(None);
        };
        self.registry.save_agents()?;

        let event = ExperienceEvent {
            id: record_id("exp"),
            agent_id: agent_id.to_string(),
            kind,
            amount,
            timestamp: now(),
            details: details.map(str::to_string),
        };

        let snapshot = {
            let mut events = self.events.write();
            events.push(event);
            events.clone()
        };
        store::save_collection(self.store.as_ref(), &self.storage_key, &snapshot)?;

        tracing::info!(
            agent_id,
            kind = ?kind,
            amount,
            experience = agent.experience(),
            level = agent.level().get(),
            "Experience awarded"
        );
        Ok(Some(agent))
    }

    pub fn agent_events(&self, agent_id: &str) -> Vec<ExperienceEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.agent_id == agent_id)
            .cloned()
            .collect()
    }

    pub fn all_events(&self) -> Vec<ExperienceEvent> {
        self.events.read().clone()
    }

    /// Threshold for `level`; `None` outside 1..=5
    pub fn experience_for_level(level: u8) -> Option<i64> {
        AgentLevel::new(level).map(AgentLevel::threshold)
    }

    /// Experience still needed for the next level; 0 at the maximum level
    pub fn experience_to_next_level(agent: &Agent) -> i64 {
        match agent.level().next() {
            Some(next) => next.threshold().saturating_sub(agent.experience()).max(0),
            None => 0,
        }
    }

    /// Progress through the current level as a whole percentage, 0..=100
    pub fn level_progress(agent: &Agent) -> u8 {
        let level = agent.level();
        let Some(next) = level.next() else {
            return 100;
        };
        // Balances may sit at the i64 bounds
        let span = i128::from(next.threshold() - level.threshold());
        let progressed = i128::from(agent.experience()) - i128::from(level.threshold());
        (progressed * 100).div_euclid(span).clamp(0, 100) as u8
    }
}
