use warroom::behaviors::{CodeReviewBehavior, OptimizationBehavior, SecurityBehavior};
use warroom::decision::FixedDecisions;
use warroom::progression::{ExperienceKind, ExperienceLedger};
use warroom::ApiError;

use crate::integration::support::memory_engine;

#[tokio::test]
async fn challenge_rewards_unlock_higher_tier_challenges() {
    let engine = memory_engine(FixedDecisions::always());
    let agent = engine
        .registry()
        .create_agent(OptimizationBehavior::default_profile("Tuner", "speeds things up"));

    let titles = |agent: &warroom::Agent| -> Vec<String> {
        engine
            .catalog()
            .available_challenges_for_agent(agent)
            .into_iter()
            .map(|c| c.title)
            .collect()
    };
    assert!(titles(&agent).is_empty(), "level 1 optimizer has nothing yet");

    let agent = engine
        .ledger()
        .add_experience(agent.id(), ExperienceKind::Optimization, 100, Some("first pass"))
        .unwrap()
        .unwrap();
    assert_eq!(agent.level().get(), 2);
    assert_eq!(titles(&agent), vec!["Optimize Algorithm Performance".to_string()]);

    let challenge = engine
        .catalog()
        .available_challenges_for_agent(&agent)
        .remove(0);
    let attempt = engine
        .catalog()
        .attempt_challenge(&agent, &challenge.id, "use a Set")
        .await
        .unwrap();
    assert!(attempt.successful);

    let agent = engine.registry().get_agent(agent.id()).unwrap();
    assert_eq!(agent.experience(), 175);
    assert_eq!(ExperienceLedger::experience_to_next_level(&agent), 125);
    assert_eq!(ExperienceLedger::level_progress(&agent), 37);
    assert!(titles(&agent).is_empty());

    let kinds: Vec<ExperienceKind> = engine
        .ledger()
        .agent_events(agent.id())
        .iter()
        .map(|e| e.kind)
        .collect();
    assert_eq!(kinds, vec![ExperienceKind::Optimization, ExperienceKind::Challenge]);
}

#[tokio::test]
async fn repeated_success_is_rewarded_once() {
    let engine = memory_engine(FixedDecisions::always());
    let agent = engine
        .registry()
        .create_agent(CodeReviewBehavior::default_profile("Reviewer", "reads code"));
    let challenge = engine
        .catalog()
        .all_challenges()
        .into_iter()
        .find(|c| c.title == "Code Review Challenge")
        .unwrap();

    for _ in 0..3 {
        engine
            .catalog()
            .attempt_challenge(&agent, &challenge.id, "use strict equality")
            .await
            .unwrap();
    }

    let stored = engine.catalog().challenge_by_id(&challenge.id).unwrap();
    assert_eq!(stored.completed_by.len(), 1);
    assert_eq!(engine.catalog().attempts_by_agent(agent.id()).len(), 3);
    assert_eq!(engine.registry().get_agent(agent.id()).unwrap().experience(), 30);
}

#[tokio::test]
async fn unknown_challenge_leaves_state_untouched() {
    let engine = memory_engine(FixedDecisions::always());
    let agent = engine
        .registry()
        .create_agent(SecurityBehavior::default_profile("Sentinel", "guards"));

    let err = engine
        .catalog()
        .attempt_challenge(&agent, "challenge-0-deadbeef", "patch")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Challenge with ID challenge-0-deadbeef not found");
    assert!(matches!(err, ApiError::ChallengeNotFound(_)));
    assert!(engine.catalog().attempts_by_agent(agent.id()).is_empty());
    assert!(engine.ledger().all_events().is_empty());
}

#[test]
fn awards_to_deleted_agents_are_ignored() {
    let engine = memory_engine(FixedDecisions::never());
    let agent = engine.registry().create_agent(warroom::AgentDraft::new("Ghost", "soon gone"));
    assert!(engine.registry().delete_agent(agent.id()));

    let result = engine
        .ledger()
        .add_experience(agent.id(), ExperienceKind::Contribution, 500, None)
        .unwrap();
    assert!(result.is_none());
    assert!(engine.ledger().all_events().is_empty());
}

#[test]
fn level_never_drops_after_penalties() {
    let engine = memory_engine(FixedDecisions::never());
    let agent = engine.registry().create_agent(warroom::AgentDraft::new("Veteran", "v"));
    let ledger = engine.ledger();

    let leveled = ledger
        .add_experience(agent.id(), ExperienceKind::Contribution, 650, None)
        .unwrap()
        .unwrap();
    assert_eq!(leveled.level().get(), 4);

    let penalized = ledger
        .add_experience(agent.id(), ExperienceKind::Contribution, -600, Some("revert"))
        .unwrap()
        .unwrap();
    assert_eq!(penalized.experience(), 50);
    assert_eq!(penalized.level().get(), 4);
    assert_eq!(ExperienceLedger::level_progress(&penalized), 0);
}
