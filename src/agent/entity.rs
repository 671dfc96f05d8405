//! Agent entity: identity, leveling state and module list.

use crate::types::{next_after, now, AgentId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Experience required to reach each level, indexed by level 1..=5
pub const EXPERIENCE_THRESHOLDS: [i64; 5] = [0, 100, 300, 600, 1000];

/// Closed set of module/challenge capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CodeReview,
    SecurityAnalysis,
    Optimization,
    Documentation,
    Testing,
    Refactoring,
    Debugging,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CodeReview => "code_review",
            Capability::SecurityAnalysis => "security_analysis",
            Capability::Optimization => "optimization",
            Capability::Documentation => "documentation",
            Capability::Testing => "testing",
            Capability::Refactoring => "refactoring",
            Capability::Debugging => "debugging",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agent level, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AgentLevel(u8);

impl AgentLevel {
    pub const MIN: AgentLevel = AgentLevel(1);
    pub const MAX: AgentLevel = AgentLevel(5);

    pub fn new(level: u8) -> Option<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&level) {
            Some(AgentLevel(level))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Largest level whose threshold `experience` reaches.
    pub fn from_experience(experience: i64) -> Self {
        let reached = EXPERIENCE_THRESHOLDS
            .iter()
            .take_while(|&&threshold| experience >= threshold)
            .count();
        AgentLevel(reached.max(1) as u8)
    }

    /// Experience required to reach this level
    pub fn threshold(self) -> i64 {
        EXPERIENCE_THRESHOLDS[(self.0 - 1) as usize]
    }

    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }
}

impl Default for AgentLevel {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<u8> for AgentLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        AgentLevel::new(value).ok_or_else(|| format!("agent level {} outside 1..=5", value))
    }
}

impl From<AgentLevel> for u8 {
    fn from(level: AgentLevel) -> Self {
        level.0
    }
}

impl fmt::Display for AgentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Togglable capability unit owned by one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentModule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub capability: Capability,
    pub level: u32,
    pub is_active: bool,
}

impl AgentModule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        capability: Capability,
        level: u32,
        is_active: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            capability,
            level: level.max(1),
            is_active,
        }
    }
}

/// Input for creating an agent; the registry assigns id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDraft {
    pub name: String,
    pub description: String,
    pub avatar: Option<String>,
    pub experience: i64,
    pub modules: Vec<AgentModule>,
}

impl AgentDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_experience(mut self, experience: i64) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_modules(mut self, modules: Vec<AgentModule>) -> Self {
        self.modules = modules;
        self
    }
}

impl From<&Agent> for AgentDraft {
    fn from(agent: &Agent) -> Self {
        Self {
            name: agent.name.clone(),
            description: agent.description.clone(),
            avatar: agent.avatar.clone(),
            experience: agent.experience,
            modules: agent.modules.clone(),
        }
    }
}

/// Partial update merged over an agent snapshot.
///
/// Level is not settable: it follows experience.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<Option<String>>,
    pub experience: Option<i64>,
    pub modules: Option<Vec<AgentModule>>,
}

/// Agent entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    id: AgentId,
    name: String,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
    level: AgentLevel,
    experience: i64,
    modules: Vec<AgentModule>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Agent {
    pub(crate) fn from_draft(id: AgentId, draft: AgentDraft) -> Self {
        let created = now();
        Self {
            id,
            name: draft.name,
            description: draft.description,
            avatar: draft.avatar,
            level: AgentLevel::from_experience(draft.experience),
            experience: draft.experience,
            modules: draft.modules,
            created_at: created,
            updated_at: created,
        }
    }

    /// Snapshot with a fixed identity and timestamps.
    pub(crate) fn restored(
        id: AgentId,
        draft: AgentDraft,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            created_at,
            updated_at,
            ..Self::from_draft(id, draft)
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn level(&self) -> AgentLevel {
        self.level
    }

    pub fn experience(&self) -> i64 {
        self.experience
    }

    pub fn modules(&self) -> &[AgentModule] {
        &self.modules
    }

    pub fn active_modules(&self) -> impl Iterator<Item = &AgentModule> {
        self.modules.iter().filter(|m| m.is_active)
    }

    /// True when an active module has `capability` at `min_level` or above.
    pub fn has_active_capability(&self, capability: Capability, min_level: u32) -> bool {
        self.active_modules()
            .any(|m| m.capability == capability && m.level >= min_level)
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Add experience and re-derive the level.
    ///
    /// Amounts are not validated. The level never decreases. Returns true
    /// when the level changed.
    pub fn add_experience(&mut self, amount: i64) -> bool {
        self.experience = self.experience.saturating_add(amount);
        let previous = self.level;
        self.level = previous.max(AgentLevel::from_experience(self.experience));
        self.touch();
        self.level != previous
    }

    pub fn activate_module(&mut self, module_id: &str) -> bool {
        self.set_module_active(module_id, true)
    }

    pub fn deactivate_module(&mut self, module_id: &str) -> bool {
        self.set_module_active(module_id, false)
    }

    pub(crate) fn set_module_active(&mut self, module_id: &str, active: bool) -> bool {
        match self.modules.iter_mut().find(|m| m.id == module_id) {
            Some(module) => {
                module.is_active = active;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// New instance with `update` merged over this snapshot, same id.
    pub(crate) fn merged(&self, update: AgentUpdate) -> Agent {
        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = name;
        }
        if let Some(description) = update.description {
            next.description = description;
        }
        if let Some(avatar) = update.avatar {
            next.avatar = avatar;
        }
        if let Some(experience) = update.experience {
            next.experience = experience;
            next.level = next.level.max(AgentLevel::from_experience(experience));
        }
        if let Some(modules) = update.modules {
            next.modules = modules;
        }
        next.touch();
        next
    }

    fn touch(&mut self) {
        self.updated_at = next_after(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_agent() -> Agent {
        let modules = vec![
            AgentModule::new("1", "Basic", "basic", Capability::CodeReview, 1, true),
            AgentModule::new("2", "Perf", "perf", Capability::Optimization, 2, false),
        ];
        Agent::from_draft(
            "agent-1".to_string(),
            AgentDraft::new("Reviewer", "reviews code").with_modules(modules),
        )
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(AgentLevel::from_experience(0).get(), 1);
        assert_eq!(AgentLevel::from_experience(99).get(), 1);
        assert_eq!(AgentLevel::from_experience(100).get(), 2);
        assert_eq!(AgentLevel::from_experience(299).get(), 2);
        assert_eq!(AgentLevel::from_experience(300).get(), 3);
        assert_eq!(AgentLevel::from_experience(600).get(), 4);
        assert_eq!(AgentLevel::from_experience(1000).get(), 5);
        assert_eq!(AgentLevel::from_experience(1_000_000).get(), 5);
        assert_eq!(AgentLevel::from_experience(-50).get(), 1);
    }

    #[test]
    fn test_level_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<AgentLevel>("3").is_ok());
        assert!(serde_json::from_str::<AgentLevel>("0").is_err());
        assert!(serde_json::from_str::<AgentLevel>("6").is_err());
    }

    #[test]
    fn test_multi_step_level_up() {
        let mut agent = sample_agent();
        assert!(agent.add_experience(650));
        assert_eq!(agent.level().get(), 4);
        assert!(!agent.add_experience(10));
        assert!(agent.add_experience(340));
        assert_eq!(agent.level(), AgentLevel::MAX);
    }

    #[test]
    fn test_negative_experience_keeps_level() {
        let mut agent = sample_agent();
        agent.add_experience(120);
        assert_eq!(agent.level().get(), 2);
        agent.add_experience(-500);
        assert_eq!(agent.experience(), -380);
        assert_eq!(agent.level().get(), 2);
    }

    #[test]
    fn test_module_toggle() {
        let mut agent = sample_agent();
        let before = agent.updated_at();
        assert!(agent.activate_module("2"));
        assert!(agent.updated_at() > before);
        assert_eq!(agent.active_modules().count(), 2);
        assert!(agent.has_active_capability(Capability::Optimization, 2));

        assert!(agent.deactivate_module("1"));
        assert!(!agent.has_active_capability(Capability::CodeReview, 1));
        assert_eq!(agent.modules()[0].capability, Capability::CodeReview);
        assert_eq!(agent.modules()[0].level, 1);

        let stamp = agent.updated_at();
        assert!(!agent.activate_module("missing"));
        assert_eq!(agent.updated_at(), stamp);
    }

    #[test]
    fn test_merged_keeps_identity() {
        let agent = sample_agent();
        let update = AgentUpdate {
            name: Some("Renamed".to_string()),
            experience: Some(320),
            ..AgentUpdate::default()
        };
        let next = agent.merged(update);
        assert_eq!(next.id(), agent.id());
        assert_eq!(next.name(), "Renamed");
        assert_eq!(next.level().get(), 3);
        assert_eq!(next.created_at(), agent.created_at());
        assert!(next.updated_at() > agent.updated_at());
        assert_eq!(agent.name(), "Reviewer");
    }

    #[test]
    fn test_serialized_field_names() {
        let agent = sample_agent();
        let value = serde_json::to_value(&agent).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["modules"][0]["isActive"], serde_json::json!(true));
        assert_eq!(value["modules"][0]["capability"], serde_json::json!("code_review"));
        assert!(value.get("avatar").is_none());
    }

    proptest! {
        #[test]
        fn prop_level_is_threshold_function(experience in -10_000i64..100_000) {
            let level = AgentLevel::from_experience(experience);
            prop_assert!((1..=5).contains(&level.get()));
            if experience >= 0 {
                prop_assert!(experience >= level.threshold());
            }
            if let Some(next) = level.next() {
                prop_assert!(experience < next.threshold());
            }
        }

        #[test]
        fn prop_level_is_monotonic(awards in proptest::collection::vec(0i64..400, 0..20)) {
            let mut agent = sample_agent();
            let mut previous = agent.level();
            for amount in awards {
                agent.add_experience(amount);
                prop_assert!(agent.level() >= previous);
                prop_assert_eq!(agent.level(), AgentLevel::from_experience(agent.experience()));
                previous = agent.level();
            }
        }
    }
}
