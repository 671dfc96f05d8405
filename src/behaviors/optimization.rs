//! Optimization behavior: performance findings and an annotated rewrite.

use super::{deducted_score, is_script_language, source_lines, ADVANCED_MODULE_LEVEL};
use crate::agent::{Agent, AgentDraft, AgentModule, Capability};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref LOOP_START: Regex = Regex::new(r"for\s*\(|while\s*\(").unwrap();
    static ref COLLECTION_OPERATION: Regex = Regex::new(r"\.map\(|\.filter\(|\.reduce\(").unwrap();
    static ref LISTENER_ADDED: Regex = Regex::new(r"addEventListener|on\w+\s*=").unwrap();
    static ref LISTENER_REMOVED: Regex = Regex::new(r"removeEventListener").unwrap();
    static ref COMPONENT_FUNCTION: Regex = Regex::new(r"function\s+\w+Component").unwrap();
    static ref INLINE_OBJECT: Regex = Regex::new(r"style=\{\{|props=\{\{").unwrap();
}

/// Points deducted per weighted finding
const WEIGHT_FACTOR: u32 = 3;
/// Agents below this level do not produce a rewrite
const REWRITE_MIN_LEVEL: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationKind {
    Performance,
    Memory,
    Network,
    Rendering,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl Impact {
    pub fn weight(self) -> u32 {
        match self {
            Impact::Low => 1,
            Impact::Medium => 3,
            Impact::High => 5,
        }
    }
}

/// Heuristic that produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationRule {
    NestedLoop,
    CollectionOperation,
    EventListenerLeak,
    MissingMemo,
    InlineObject,
}

impl OptimizationRule {
    fn annotate(self, line: &str) -> String {
        match self {
            OptimizationRule::NestedLoop => format!("{} // TODO: Optimize nested loop", line),
            OptimizationRule::CollectionOperation if line.contains(".map(") => {
                format!("{} // Consider using for loop for better performance", line)
            }
            OptimizationRule::CollectionOperation => line.to_string(),
            OptimizationRule::EventListenerLeak => {
                format!("{} // TODO: Add removeEventListener in cleanup function", line)
            }
            OptimizationRule::MissingMemo => {
                format!("// Consider wrapping with React.memo:\n{}", line)
            }
            OptimizationRule::InlineObject => {
                format!("{} // Move object declaration outside render or use useMemo", line)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationIssue {
    pub id: String,
    pub file: String,
    pub line: usize,
    pub rule: OptimizationRule,
    #[serde(rename = "type")]
    pub kind: OptimizationKind,
    pub impact: Impact,
    pub description: String,
    pub suggestion: String,
    /// e.g. "~30% faster execution"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_improvement: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactCounts {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub performance: u32,
    pub memory: u32,
    pub network: u32,
    pub rendering: u32,
    pub other: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSummary {
    pub total: usize,
    pub by_impact: ImpactCounts,
    pub by_type: TypeCounts,
    /// 0-100, higher is better optimized
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub issues: Vec<OptimizationIssue>,
    pub summary: OptimizationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized_code: Option<String>,
    pub advanced: bool,
}

/// Finds optimization opportunities on behalf of an agent
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimizationBehavior;

impl OptimizationBehavior {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, agent: &Agent, code: &str, language: &str, filename: &str) -> OptimizationResult {
        let advanced = agent.has_active_capability(Capability::Optimization, ADVANCED_MODULE_LEVEL);
        let issues = if advanced {
            advanced_pass(code, language, filename)
        } else {
            basic_pass(code, language, filename)
        };

        let mut by_impact = ImpactCounts::default();
        let mut by_type = TypeCounts::default();
        let mut weighted = 0u32;
        for issue in &issues {
            match issue.impact {
                Impact::Low => by_impact.low += 1,
                Impact::Medium => by_impact.medium += 1,
                Impact::High => by_impact.high += 1,
            }
            match issue.kind {
                OptimizationKind::Performance => by_type.performance += 1,
                OptimizationKind::Memory => by_type.memory += 1,
                OptimizationKind::Network => by_type.network += 1,
                OptimizationKind::Rendering => by_type.rendering += 1,
                OptimizationKind::Other => by_type.other += 1,
            }
            weighted = weighted.saturating_add(issue.impact.weight());
        }

        let optimized_code = if agent.level().get() >= REWRITE_MIN_LEVEL && !issues.is_empty() {
            Some(annotated_rewrite(code, &issues))
        } else {
            None
        };

        OptimizationResult {
            summary: OptimizationSummary {
                total: issues.len(),
                by_impact,
                by_type,
                score: deducted_score(weighted, WEIGHT_FACTOR),
            },
            issues,
            optimized_code,
            advanced,
        }
    }

    /// Draft for a new optimization agent with the standard module set
    pub fn default_profile(name: &str, description: &str) -> AgentDraft {
        AgentDraft::new(name, description).with_modules(vec![
            AgentModule::new(
                "1",
                "Basic Performance Analyzer",
                "Identifies common performance bottlenecks",
                Capability::Optimization,
                1,
                true,
            ),
            AgentModule::new(
                "2",
                "Memory Usage Optimizer",
                "Detects memory leaks and excessive memory usage",
                Capability::Optimization,
                2,
                true,
            ),
            AgentModule::new(
                "3",
                "Advanced Algorithm Optimizer",
                "Suggests algorithm improvements for better time complexity",
                Capability::Optimization,
                3,
                false,
            ),
            AgentModule::new(
                "4",
                "Framework-Specific Optimizer",
                "Provides optimization techniques specific to frameworks like React",
                Capability::Optimization,
                2,
                false,
            ),
        ])
    }
}

#[allow(clippy::too_many_arguments)]
fn issue(
    id: String,
    filename: &str,
    line: usize,
    rule: OptimizationRule,
    kind: OptimizationKind,
    impact: Impact,
    description: &str,
    suggestion: &str,
    estimated_improvement: Option<&str>,
) -> OptimizationIssue {
    OptimizationIssue {
        id,
        file: filename.to_string(),
        line,
        rule,
        kind,
        impact,
        description: description.to_string(),
        suggestion: suggestion.to_string(),
        estimated_improvement: estimated_improvement.map(str::to_string),
    }
}

fn basic_pass(code: &str, language: &str, filename: &str) -> Vec<OptimizationIssue> {
    let lines = source_lines(code);
    let mut issues = Vec::new();

    if is_script_language(language) {
        // A closing brace ends the tracked loop body.
        let mut in_loop = false;
        for (i, line) in lines.iter().enumerate() {
            if LOOP_START.is_match(line) {
                if in_loop {
                    issues.push(issue(
                        format!("nested-loop-{}", i),
                        filename,
                        i + 1,
                        OptimizationRule::NestedLoop,
                        OptimizationKind::Performance,
                        Impact::Medium,
                        "Nested loop detected, potential O(n²) time complexity",
                        "Consider restructuring to avoid nested loops or use a more efficient algorithm",
                        None,
                    ));
                }
                in_loop = true;
            }
            if in_loop && line.contains('}') {
                in_loop = false;
            }
        }
    }

    for (i, line) in lines.iter().enumerate() {
        if COLLECTION_OPERATION.is_match(line) {
            issues.push(issue(
                format!("array-operation-{}", i),
                filename,
                i + 1,
                OptimizationRule::CollectionOperation,
                OptimizationKind::Performance,
                Impact::Low,
                "Array operation that may be inefficient for large datasets",
                "For large arrays, consider using a for loop or optimizing the callback function",
                None,
            ));
        }
    }

    issues
}

fn advanced_pass(code: &str, language: &str, filename: &str) -> Vec<OptimizationIssue> {
    let mut issues = basic_pass(code, language, filename);
    if !is_script_language(language) {
        return issues;
    }
    let lines = source_lines(code);

    let added = lines.iter().filter(|l| LISTENER_ADDED.is_match(l)).count();
    let removed = lines.iter().filter(|l| LISTENER_REMOVED.is_match(l)).count();
    if added > removed {
        issues.push(issue(
            "event-listener-leak".to_string(),
            filename,
            1,
            OptimizationRule::EventListenerLeak,
            OptimizationKind::Memory,
            Impact::High,
            "Potential memory leak: more event listeners added than removed",
            "Ensure all event listeners are properly removed when components unmount",
            Some("Prevents memory growth over time"),
        ));
    }

    let memoized = code.contains("React.memo") || code.contains("useMemo");
    for (i, line) in lines.iter().enumerate() {
        if !memoized && COMPONENT_FUNCTION.is_match(line) {
            issues.push(issue(
                format!("missing-memo-{}", i),
                filename,
                i + 1,
                OptimizationRule::MissingMemo,
                OptimizationKind::Rendering,
                Impact::Medium,
                "Component may re-render unnecessarily",
                "Use React.memo() for functional components or useMemo() for expensive calculations",
                Some("Can reduce unnecessary renders by 30-50%"),
            ));
        }
        if INLINE_OBJECT.is_match(line) {
            issues.push(issue(
                format!("inline-object-{}", i),
                filename,
                i + 1,
                OptimizationRule::InlineObject,
                OptimizationKind::Rendering,
                Impact::Low,
                "Inline object creation in render method",
                "Move object creation outside the render function or memoize it",
                Some("Small performance improvement on frequent re-renders"),
            ));
        }
    }

    issues
}

/// Annotate flagged lines, bottom-up so earlier edits cannot shift later
/// line numbers.
fn annotated_rewrite(code: &str, issues: &[OptimizationIssue]) -> String {
    let mut lines: Vec<String> = source_lines(code).into_iter().map(str::to_string).collect();
    let mut ordered: Vec<&OptimizationIssue> = issues.iter().collect();
    ordered.sort_by(|a, b| b.line.cmp(&a.line));

    for issue in ordered {
        if issue.line == 0 || issue.line > lines.len() {
            continue;
        }
        let index = issue.line - 1;
        lines[index] = issue.rule.annotate(&lines[index]);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentRegistry;

    const DUPLICATES: &str = "function findDuplicates(array) {
  const duplicates = [];
  for (let i = 0; i < array.length; i++) {
    for (let j = 0; j < array.length; j++) {
      duplicates.push(array[i]);
    }
  }
  return duplicates.map(x => x);
}";

    const COMPONENT: &str = "function ListComponent(props) {
  window.addEventListener('resize', onResize);
  return <div style={{ color: 'red' }}>{props.items.filter(Boolean)}</div>;
}";

    #[test]
    fn test_basic_pass_findings() {
        let registry = AgentRegistry::in_memory();
        let agent = registry.create_agent(OptimizationBehavior::default_profile("Optimizer", "o"));
        let result = OptimizationBehavior::new().analyze(&agent, DUPLICATES, "javascript", "dup.js");

        assert!(!result.advanced);
        let rules: Vec<(OptimizationRule, usize)> =
            result.issues.iter().map(|i| (i.rule, i.line)).collect();
        assert_eq!(
            rules,
            vec![
                (OptimizationRule::NestedLoop, 4),
                (OptimizationRule::CollectionOperation, 8)
            ]
        );
        assert_eq!(result.summary.by_impact.medium, 1);
        assert_eq!(result.summary.by_impact.low, 1);
        assert_eq!(result.summary.by_type.performance, 2);
        assert_eq!(result.summary.score, 88);
        // level 1 agents do not rewrite
        assert!(result.optimized_code.is_none());
    }

    #[test]
    fn test_non_script_language_only_scans_collections() {
        let registry = AgentRegistry::in_memory();
        let agent = registry.create_agent(OptimizationBehavior::default_profile("Optimizer", "o"));
        let result = OptimizationBehavior::new().analyze(&agent, DUPLICATES, "rust", "dup.rs");
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].rule, OptimizationRule::CollectionOperation);
    }

    #[test]
    fn test_advanced_pass_and_rewrite() {
        let registry = AgentRegistry::in_memory();
        let agent = registry.create_agent(
            OptimizationBehavior::default_profile("Optimizer", "o").with_experience(300),
        );
        let basic = OptimizationBehavior::new().analyze(&agent, COMPONENT, "tsx", "list.tsx");

        registry.set_module_active(agent.id(), "3", true);
        let agent = registry.get_agent(agent.id()).unwrap();
        let result = OptimizationBehavior::new().analyze(&agent, COMPONENT, "tsx", "list.tsx");

        assert!(result.advanced);
        assert_eq!(&result.issues[..basic.issues.len()], &basic.issues[..]);
        let rules: Vec<OptimizationRule> = result.issues.iter().map(|i| i.rule).collect();
        assert!(rules.contains(&OptimizationRule::EventListenerLeak));
        assert!(rules.contains(&OptimizationRule::MissingMemo));
        assert!(rules.contains(&OptimizationRule::InlineObject));
        assert_eq!(result.summary.by_impact.high, 1);
        assert_eq!(result.summary.by_type.memory, 1);
        assert_eq!(result.summary.by_type.rendering, 2);

        let rewritten = result.optimized_code.expect("level 3 agent rewrites");
        let lines: Vec<&str> = rewritten.lines().collect();
        assert_eq!(lines[0], "// Consider wrapping with React.memo:");
        assert!(lines[1].ends_with("// TODO: Add removeEventListener in cleanup function"));
        assert!(lines[3].ends_with("// Move object declaration outside render or use useMemo"));
        assert_eq!(lines.len(), COMPONENT.lines().count() + 1);
    }

    #[test]
    fn test_memoized_component_is_not_flagged() {
        let registry = AgentRegistry::in_memory();
        let agent = registry.create_agent(OptimizationBehavior::default_profile("Optimizer", "o"));
        registry.set_module_active(agent.id(), "3", true);
        let agent = registry.get_agent(agent.id()).unwrap();

        let code = "const Memo = React.memo(function CardComponent() { return null; });";
        let result = OptimizationBehavior::new().analyze(&agent, code, "js", "card.js");
        assert!(result
            .issues
            .iter()
            .all(|i| i.rule != OptimizationRule::MissingMemo));
    }
}
