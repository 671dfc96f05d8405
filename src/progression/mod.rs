//! Agent Progression
//!
//! The experience ledger applies awards to registry agents and keeps an
//! append-only event history; the challenge catalog gates challenges on agent
//! level and active capabilities and pays rewards through the ledger.

pub mod challenges;
pub mod ledger;

pub use challenges::{
    CatalogSettings, Challenge, ChallengeAttempt, ChallengeCatalog, ChallengeDifficulty,
    ChallengeRequirements, ChallengeType, NewChallenge, TestCase, DEFAULT_ATTEMPTS_KEY,
    DEFAULT_CHALLENGES_KEY, DEFAULT_SUCCESS_PROBABILITY,
};
pub use ledger::{ExperienceEvent, ExperienceKind, ExperienceLedger, DEFAULT_EVENTS_KEY};
