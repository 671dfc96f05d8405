//! Challenge catalog: gated task definitions and the attempt history.

use super::ledger::{ExperienceKind, ExperienceLedger};
use crate::agent::{Agent, Capability};
use crate::decision::DecisionSource;
use crate::error::ApiError;
use crate::store::{self, KeyValueStore};
use crate::types::{now, record_id, AgentId, ChallengeId, Timestamp};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_CHALLENGES_KEY: &str = "ai-warroom-challenges";
pub const DEFAULT_ATTEMPTS_KEY: &str = "ai-warroom-challenge-attempts";
pub const DEFAULT_SUCCESS_PROBABILITY: f64 = 0.8;

const SUCCESS_FEEDBACK: &str = "Great job! Your solution passed all test cases.";
const FAILURE_FEEDBACK: &str = "Your solution failed some test cases. Try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeType {
    CodeReview,
    Security,
    Optimization,
    Refactoring,
    Debugging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeDifficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// Gate evaluated against an agent before a challenge is offered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_agent_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_capabilities: Option<Vec<Capability>>,
}

impl ChallengeRequirements {
    /// Level and capability gate; completion is checked separately.
    pub fn admits(&self, agent: &Agent) -> bool {
        if let Some(min_level) = self.min_agent_level {
            if agent.level().get() < min_level {
                return false;
            }
        }
        match &self.required_capabilities {
            Some(required) if !required.is_empty() => {
                let active: HashSet<Capability> =
                    agent.active_modules().map(|m| m.capability).collect();
                required.iter().all(|cap| active.contains(cap))
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ChallengeType,
    pub difficulty: ChallengeDifficulty,
    pub experience_reward: i64,
    #[serde(default)]
    pub requirements: ChallengeRequirements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_cases: Option<Vec<TestCase>>,
    /// Agents that completed the challenge, each at most once
    #[serde(default)]
    pub completed_by: Vec<AgentId>,
    pub created_at: Timestamp,
}

impl Challenge {
    pub fn is_completed_by(&self, agent_id: &str) -> bool {
        self.completed_by.iter().any(|id| id == agent_id)
    }
}

/// Input for `ChallengeCatalog::create_challenge`
#[derive(Debug, Clone, PartialEq)]
pub struct NewChallenge {
    pub title: String,
    pub description: String,
    pub kind: ChallengeType,
    pub difficulty: ChallengeDifficulty,
    pub experience_reward: i64,
    pub requirements: ChallengeRequirements,
    pub code: Option<String>,
    pub test_cases: Option<Vec<TestCase>>,
}

impl NewChallenge {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        kind: ChallengeType,
        difficulty: ChallengeDifficulty,
        experience_reward: i64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind,
            difficulty,
            experience_reward,
            requirements: ChallengeRequirements::default(),
            code: None,
            test_cases: None,
        }
    }

    pub fn with_requirements(mut self, min_agent_level: Option<u8>, capabilities: &[Capability]) -> Self {
        self.requirements = ChallengeRequirements {
            min_agent_level,
            required_capabilities: (!capabilities.is_empty()).then(|| capabilities.to_vec()),
        };
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_test_cases(mut self, test_cases: Vec<TestCase>) -> Self {
        self.test_cases = Some(test_cases);
        self
    }
}

/// Append-only record of one attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeAttempt {
    pub id: String,
    pub challenge_id: ChallengeId,
    pub agent_id: AgentId,
    pub successful: bool,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Storage keys and grading knobs for the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    pub challenges_key: String,
    pub attempts_key: String,
    /// Probability that an attempt is graded successful
    pub success_probability: f64,
    /// Seed the default challenges when storage holds none
    pub seed_defaults: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            challenges_key: DEFAULT_CHALLENGES_KEY.to_string(),
            attempts_key: DEFAULT_ATTEMPTS_KEY.to_string(),
            success_probability: DEFAULT_SUCCESS_PROBABILITY,
            seed_defaults: true,
        }
    }
}

/// Challenge catalog
pub struct ChallengeCatalog {
    ledger: Arc<ExperienceLedger>,
    decisions: Arc<dyn DecisionSource>,
    store: Arc<dyn KeyValueStore>,
    settings: CatalogSettings,
    challenges: RwLock<Vec<Challenge>>,
    attempts: RwLock<Vec<ChallengeAttempt>>,
}

impl ChallengeCatalog {
    /// Load challenges and attempts, seeding the defaults into an empty catalog.
    pub fn open(
        ledger: Arc<ExperienceLedger>,
        store: Arc<dyn KeyValueStore>,
        decisions: Arc<dyn DecisionSource>,
        settings: CatalogSettings,
    ) -> Result<Self, ApiError> {
        let challenges = store::load_collection_or_reset(store.as_ref(), &settings.challenges_key)?;
        let attempts = store::load_collection_or_reset(store.as_ref(), &settings.attempts_key)?;
        let catalog = Self {
            ledger,
            decisions,
            store,
            settings,
            challenges: RwLock::new(challenges),
            attempts: RwLock::new(attempts),
        };

        if catalog.settings.seed_defaults && catalog.challenges.read().is_empty() {
            for challenge in default_challenges() {
                catalog.create_challenge(challenge)?;
            }
            tracing::info!("Seeded default challenges");
        }
        Ok(catalog)
    }

    pub fn all_challenges(&self) -> Vec<Challenge> {
        self.challenges.read().clone()
    }

    pub fn challenge_by_id(&self, challenge_id: &str) -> Option<Challenge> {
        self.challenges
            .read()
            .iter()
            .find(|c| c.id == challenge_id)
            .cloned()
    }

    /// Challenges the agent qualifies for and has not completed.
    pub fn available_challenges_for_agent(&self, agent: &Agent) -> Vec<Challenge> {
        self.challenges
            .read()
            .iter()
            .filter(|c| c.requirements.admits(agent) && !c.is_completed_by(agent.id()))
            .cloned()
            .collect()
    }

    pub fn completed_challenges_for_agent(&self, agent: &Agent) -> Vec<Challenge> {
        self.challenges
            .read()
            .iter()
            .filter(|c| c.is_completed_by(agent.id()))
            .cloned()
            .collect()
    }

    pub fn attempts_by_agent(&self, agent_id: &str) -> Vec<ChallengeAttempt> {
        self.attempts
            .read()
            .iter()
            .filter(|a| a.agent_id == agent_id)
            .cloned()
            .collect()
    }

    pub fn attempts_by_challenge(&self, challenge_id: &str) -> Vec<ChallengeAttempt> {
        self.attempts
            .read()
            .iter()
            .filter(|a| a.challenge_id == challenge_id)
            .cloned()
            .collect()
    }

    /// Record an attempt at a challenge.
    ///
    /// Grading is a weighted draw from the decision source. A successful
    /// attempt marks the challenge completed for the agent and awards the
    /// reward through the ledger, but only the first time.
    pub async fn attempt_challenge(
        &self,
        agent: &Agent,
        challenge_id: &str,
        solution: &str,
    ) -> Result<ChallengeAttempt, ApiError> {
        let Some(challenge) = self.challenge_by_id(challenge_id) else {
            return Err(ApiError::ChallengeNotFound(challenge_id.to_string()));
        };

        let successful = self.decisions.chance(self.settings.success_probability);
        let attempt = ChallengeAttempt {
            id: record_id("attempt"),
            challenge_id: challenge.id.clone(),
            agent_id: agent.id().to_string(),
            successful,
            timestamp: now(),
            solution: Some(solution.to_string()),
            feedback: Some(if successful { SUCCESS_FEEDBACK } else { FAILURE_FEEDBACK }.to_string()),
        };

        let attempts = {
            let mut attempts = self.attempts.write();
            attempts.push(attempt.clone());
            attempts.clone()
        };
        store::save_collection(self.store.as_ref(), &self.settings.attempts_key, &attempts)?;

        if successful && self.mark_completed(&challenge.id, agent.id())? {
            tracing::info!(
                agent_id = agent.id(),
                challenge_id = %challenge.id,
                reward = challenge.experience_reward,
                "Challenge completed"
            );
            let note = format!("Completed challenge: {}", challenge.title);
            if self
                .ledger
                .add_experience(
                    agent.id(),
                    ExperienceKind::Challenge,
                    challenge.experience_reward,
                    Some(&note),
                )?
                .is_none()
            {
                tracing::warn!(
                    agent_id = agent.id(),
                    "Challenge completed by an agent missing from the registry"
                );
            }
        }

        Ok(attempt)
    }

    /// Add the agent to `completed_by`; false when it was already there.
    fn mark_completed(&self, challenge_id: &str, agent_id: &str) -> Result<bool, ApiError> {
        let snapshot = {
            let mut challenges = self.challenges.write();
            let Some(challenge) = challenges.iter_mut().find(|c| c.id == challenge_id) else {
                return Ok(false);
            };
            if challenge.is_completed_by(agent_id) {
                return Ok(false);
            }
            challenge.completed_by.push(agent_id.to_string());
            challenges.clone()
        };
        store::save_collection(self.store.as_ref(), &self.settings.challenges_key, &snapshot)?;
        Ok(true)
    }

    pub fn create_challenge(&self, new: NewChallenge) -> Result<Challenge, ApiError> {
        let challenge = Challenge {
            id: record_id("challenge"),
            title: new.title,
            description: new.description,
            kind: new.kind,
            difficulty: new.difficulty,
            experience_reward: new.experience_reward,
            requirements: new.requirements,
            code: new.code,
            test_cases: new.test_cases,
            completed_by: Vec::new(),
            created_at: now(),
        };

        let snapshot = {
            let mut challenges = self.challenges.write();
            challenges.push(challenge.clone());
            challenges.clone()
        };
        store::save_collection(self.store.as_ref(), &self.settings.challenges_key, &snapshot)?;
        tracing::info!(challenge_id = %challenge.id, title = %challenge.title, "Challenge created");
        Ok(challenge)
    }
}

const LOGIN_QUERY_SAMPLE: &str = r#"function login(username, password) {
  const query = "SELECT * FROM users WHERE username = '" + username + "' AND password = '" + password + "'";
  return db.execute(query);
}
"#;

const FIND_DUPLICATES_SAMPLE: &str = r#"function findDuplicates(array) {
  const duplicates = [];
  for (let i = 0; i < array.length; i++) {
    for (let j = 0; j < array.length; j++) {
      if (i !== j && array[i] === array[j] && !duplicates.includes(array[i])) {
        duplicates.push(array[i]);
      }
    }
  }
  return duplicates;
}
"#;

const USER_MANAGER_SAMPLE: &str = r#"class UserManager {
  constructor() {
    this.users = [];
  }

  addUser(user) {
    this.users.push(user);
  }

  findUser(name) {
    for (var i = 0; i < this.users.length; i++) {
      var user = this.users[i];
      if (user.name == name) return user;
    }
  }

  deleteUser(name) {
    var userIndex = -1;
    for (var i = 0; i < this.users.length; i++) {
      var user = this.users[i];
      if (user.name == name) userIndex = i;
    }
    if (userIndex != -1) this.users.splice(userIndex, 1);
  }
}
"#;

fn default_challenges() -> Vec<NewChallenge> {
    vec![
        NewChallenge::new(
            "Find and Fix Security Vulnerabilities",
            "Identify and fix security vulnerabilities in the provided code snippet.",
            ChallengeType::Security,
            ChallengeDifficulty::Medium,
            50,
        )
        .with_requirements(Some(1), &[Capability::SecurityAnalysis])
        .with_code(LOGIN_QUERY_SAMPLE),
        NewChallenge::new(
            "Optimize Algorithm Performance",
            "Improve the performance of this inefficient algorithm.",
            ChallengeType::Optimization,
            ChallengeDifficulty::Hard,
            75,
        )
        .with_requirements(Some(2), &[Capability::Optimization])
        .with_code(FIND_DUPLICATES_SAMPLE),
        NewChallenge::new(
            "Code Review Challenge",
            "Review this code and identify all issues and potential improvements.",
            ChallengeType::CodeReview,
            ChallengeDifficulty::Easy,
            30,
        )
        .with_requirements(Some(1), &[Capability::CodeReview])
        .with_code(USER_MANAGER_SAMPLE),
    ]
}
