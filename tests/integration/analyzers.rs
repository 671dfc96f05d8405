use warroom::behaviors::{
    CodeReviewBehavior, OptimizationBehavior, OptimizationRule, ReviewSeverity, SecurityBehavior,
    VulnerabilitySeverity,
};
use warroom::decision::FixedDecisions;
use warroom::progression::Challenge;
use warroom::WarRoom;

use crate::integration::support::memory_engine;

fn challenge_code(engine: &WarRoom, title: &str) -> String {
    engine
        .catalog()
        .all_challenges()
        .into_iter()
        .find(|c: &Challenge| c.title == title)
        .and_then(|c| c.code)
        .unwrap()
}

#[test]
fn security_scan_flags_login_query() {
    let engine = memory_engine(FixedDecisions::never());
    let code = challenge_code(&engine, "Find and Fix Security Vulnerabilities");
    let agent = engine
        .registry()
        .create_agent(SecurityBehavior::default_profile("Sentinel", "scanner"));

    let result = engine.security().scan(&agent, &code, "javascript", "login.js");
    assert!(!result.advanced);
    assert_eq!(result.vulnerabilities.len(), 1);
    let finding = &result.vulnerabilities[0];
    assert_eq!(finding.line, 2);
    assert_eq!(finding.severity, VulnerabilitySeverity::High);
    assert_eq!(finding.cwe.as_deref(), Some("CWE-89"));
    assert_eq!(result.summary.by_severity.high, 1);
    assert_eq!(result.summary.score, 90);
}

#[test]
fn optimization_flags_nested_duplicate_search() {
    let engine = memory_engine(FixedDecisions::never());
    let code = challenge_code(&engine, "Optimize Algorithm Performance");
    let agent = engine.registry().create_agent(
        OptimizationBehavior::default_profile("Tuner", "speeds things up").with_experience(300),
    );

    let result = engine.optimization().analyze(&agent, &code, "javascript", "dupes.js");
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].rule, OptimizationRule::NestedLoop);
    assert_eq!(result.issues[0].line, 4);
    assert_eq!(result.summary.by_impact.medium, 1);
    assert_eq!(result.summary.score, 91);

    let rewrite = result.optimized_code.unwrap();
    assert!(rewrite
        .lines()
        .nth(3)
        .unwrap()
        .ends_with("// TODO: Optimize nested loop"));
}

#[test]
fn code_review_flags_legacy_user_manager() {
    let engine = memory_engine(FixedDecisions::never());
    let code = challenge_code(&engine, "Code Review Challenge");
    let agent = engine
        .registry()
        .create_agent(CodeReviewBehavior::default_profile("Reviewer", "reads code"));

    let result = engine.code_review().review(&agent, &code, "javascript", "users.js");
    let lines_for = |message: &str| -> Vec<usize> {
        result
            .issues
            .iter()
            .filter(|i| i.message == message)
            .map(|i| i.line)
            .collect()
    };
    assert_eq!(lines_for("Use of 'var' declaration"), vec![12, 18, 20]);
    assert_eq!(lines_for("Loose equality comparison"), vec![13, 21, 23]);
    assert_eq!(lines_for("Potential issue detected").len(), 4);
    assert!(result.issues.iter().all(|i| i.severity != ReviewSeverity::Error));
    assert_eq!(result.summary, format!("Found {} issues in the code.", result.issues.len()));
}

#[test]
fn analyzers_never_mutate_the_agent() {
    let engine = memory_engine(FixedDecisions::always());
    let agent = engine
        .registry()
        .create_agent(SecurityBehavior::default_profile("Sentinel", "scanner"));
    let before = engine.registry().get_agent(agent.id()).unwrap();

    engine.security().scan(&agent, "const password = 'hunter2hunter2';", "ts", "a.ts");
    engine.code_review().review(&agent, "let x = 1;", "ts", "a.ts");
    engine.optimization().analyze(&agent, "items.map(f)", "ts", "a.ts");

    assert_eq!(engine.registry().get_agent(agent.id()).unwrap(), before);
}
