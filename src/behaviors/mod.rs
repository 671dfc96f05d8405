//! Specialized Agent Behaviors
//!
//! Heuristic analyzers parametrized by an agent's active modules. Each runs a
//! basic pass unconditionally and, when the agent carries an active module of
//! the matching capability at `ADVANCED_MODULE_LEVEL` or above, an advanced
//! pass whose findings extend the basic ones. Analyzers never mutate the
//! agent; some findings are sampled from the injected `DecisionSource`.

pub mod code_review;
pub mod optimization;
pub mod security;

pub use code_review::{CodeReviewBehavior, CodeReviewResult, ReviewIssue, ReviewSeverity};
pub use optimization::{
    Impact, ImpactCounts, OptimizationBehavior, OptimizationIssue, OptimizationKind,
    OptimizationResult, OptimizationRule, OptimizationSummary, TypeCounts,
};
pub use security::{
    SecurityBehavior, SecurityScanResult, SecuritySummary, SeverityCounts, Vulnerability,
    VulnerabilitySeverity,
};

/// Module level that unlocks the advanced pass of an analyzer
pub const ADVANCED_MODULE_LEVEL: u32 = 3;

/// Languages whose syntax-specific checks the analyzers understand.
pub(crate) fn is_script_language(language: &str) -> bool {
    matches!(
        language.trim().to_ascii_lowercase().as_str(),
        "javascript" | "typescript" | "js" | "ts" | "jsx" | "tsx"
    )
}

/// Split source into lines, keeping a single empty line for empty input.
pub(crate) fn source_lines(code: &str) -> Vec<&str> {
    code.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Score out of 100 after deducting `weighted * factor`, floored at 0.
pub(crate) fn deducted_score(weighted: u32, factor: u32) -> u32 {
    100u32.saturating_sub(weighted.saturating_mul(factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_language_detection() {
        assert!(is_script_language("typescript"));
        assert!(is_script_language(" JavaScript "));
        assert!(is_script_language("tsx"));
        assert!(!is_script_language("rust"));
        assert!(!is_script_language(""));
    }

    #[test]
    fn test_source_lines() {
        assert_eq!(source_lines(""), vec![""]);
        assert_eq!(source_lines("a\r\nb\n"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_deducted_score_floors_at_zero() {
        assert_eq!(deducted_score(0, 5), 100);
        assert_eq!(deducted_score(3, 5), 85);
        assert_eq!(deducted_score(40, 3), 0);
        assert_eq!(deducted_score(u32::MAX, 10), 0);
    }
}
