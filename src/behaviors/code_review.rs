//! Code review behavior.

use super::{deducted_score, is_script_language, source_lines, ADVANCED_MODULE_LEVEL};
use crate::agent::{Agent, AgentDraft, AgentModule, Capability};
use crate::decision::DecisionSource;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

lazy_static! {
    static ref VAR_DECLARATION: Regex = Regex::new(r"^\s*var\s+\w").unwrap();
    static ref LOOSE_EQUALITY: Regex = Regex::new(r"[^=!<>]==[^=]|!=[^=]").unwrap();
}

/// Functions longer than this are flagged
const LONG_SOURCE_LINES: usize = 50;
/// Lines wider than this are flagged
const MAX_LINE_WIDTH: usize = 120;
/// Points deducted per finding
const FINDING_PENALTY: u32 = 5;
/// Chance a sampled finding is reported as an error
const SAMPLED_ERROR_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewIssue {
    pub line: usize,
    pub severity: ReviewSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ReviewIssue {
    fn new(line: usize, severity: ReviewSeverity, message: &str, suggestion: Option<&str>) -> Self {
        Self {
            line,
            severity,
            message: message.to_string(),
            suggestion: suggestion.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeReviewResult {
    pub file: String,
    pub issues: Vec<ReviewIssue>,
    pub summary: String,
    /// 0-100, higher is cleaner
    pub score: u32,
    /// Whether the advanced pass ran
    pub advanced: bool,
}

/// Reviews source code on behalf of an agent
pub struct CodeReviewBehavior {
    decisions: Arc<dyn DecisionSource>,
}

impl CodeReviewBehavior {
    pub fn new(decisions: Arc<dyn DecisionSource>) -> Self {
        Self { decisions }
    }

    pub fn review(&self, agent: &Agent, code: &str, language: &str, filename: &str) -> CodeReviewResult {
        let advanced = agent.has_active_capability(Capability::CodeReview, ADVANCED_MODULE_LEVEL);
        let issues = if advanced {
            self.advanced_review(agent, code, language)
        } else {
            self.basic_review(agent, code, language)
        };

        CodeReviewResult {
            file: filename.to_string(),
            summary: format!("Found {} issues in the code.", issues.len()),
            score: deducted_score(issues.len() as u32, FINDING_PENALTY),
            issues,
            advanced,
        }
    }

    fn random_line(&self, line_count: usize) -> usize {
        self.decisions.index(line_count) + 1
    }

    fn basic_review(&self, agent: &Agent, code: &str, language: &str) -> Vec<ReviewIssue> {
        let lines = source_lines(code);
        let mut issues = Vec::new();

        if lines.len() > LONG_SOURCE_LINES {
            issues.push(ReviewIssue::new(
                self.random_line(lines.len()),
                ReviewSeverity::Warning,
                "Function is too long, consider breaking it down",
                None,
            ));
        }

        if is_script_language(language) {
            for (i, line) in lines.iter().enumerate() {
                if VAR_DECLARATION.is_match(line) {
                    issues.push(ReviewIssue::new(
                        i + 1,
                        ReviewSeverity::Warning,
                        "Use of 'var' declaration",
                        Some("Prefer 'let' or 'const' for block-scoped bindings"),
                    ));
                }
                if LOOSE_EQUALITY.is_match(line) {
                    issues.push(ReviewIssue::new(
                        i + 1,
                        ReviewSeverity::Warning,
                        "Loose equality comparison",
                        Some("Use strict equality (=== / !==) to avoid type coercion"),
                    ));
                }
            }
        }

        for (i, line) in lines.iter().enumerate() {
            if line.chars().count() > MAX_LINE_WIDTH {
                issues.push(ReviewIssue::new(
                    i + 1,
                    ReviewSeverity::Info,
                    "Line exceeds recommended width",
                    Some("Wrap long expressions across several lines"),
                ));
            }
        }

        // Less experienced agents report more unspecific findings.
        let sampled = (5 - i32::from(agent.level().get())).max(1);
        for _ in 0..sampled {
            let severity = if self.decisions.chance(SAMPLED_ERROR_CHANCE) {
                ReviewSeverity::Error
            } else {
                ReviewSeverity::Warning
            };
            issues.push(ReviewIssue::new(
                self.random_line(lines.len()),
                severity,
                "Potential issue detected",
                Some("Consider refactoring this section"),
            ));
        }

        issues
    }

    fn advanced_review(&self, agent: &Agent, code: &str, language: &str) -> Vec<ReviewIssue> {
        let mut issues = self.basic_review(agent, code, language);
        let line_count = source_lines(code).len();

        issues.push(ReviewIssue::new(
            self.random_line(line_count),
            ReviewSeverity::Info,
            "Consider adding more descriptive variable names",
            Some("Use semantic naming to improve code readability"),
        ));

        if agent
            .active_modules()
            .any(|m| m.capability == Capability::Optimization)
        {
            issues.push(ReviewIssue::new(
                self.random_line(line_count),
                ReviewSeverity::Info,
                "This operation could be optimized",
                Some("Consider using a more efficient algorithm here"),
            ));
        }

        issues
    }

    /// Draft for a new code review agent with the standard module set
    pub fn default_profile(name: &str, description: &str) -> AgentDraft {
        AgentDraft::new(name, description).with_modules(vec![
            AgentModule::new(
                "1",
                "Basic Code Review",
                "Identifies common code issues and style problems",
                Capability::CodeReview,
                1,
                true,
            ),
            AgentModule::new(
                "2",
                "Style Checker",
                "Ensures code follows style guidelines",
                Capability::CodeReview,
                1,
                true,
            ),
            AgentModule::new(
                "3",
                "Advanced Pattern Recognition",
                "Identifies complex code patterns and anti-patterns",
                Capability::CodeReview,
                3,
                false,
            ),
            AgentModule::new(
                "4",
                "Performance Analysis",
                "Identifies performance bottlenecks",
                Capability::Optimization,
                2,
                false,
            ),
        ])
    }
}
