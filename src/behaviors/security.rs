//! Security scan behavior.

use super::{deducted_score, is_script_language, source_lines, ADVANCED_MODULE_LEVEL};
use crate::agent::{Agent, AgentDraft, AgentModule, Capability};
use crate::decision::DecisionSource;
use crate::types::{now, Timestamp};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

lazy_static! {
    static ref SQL_CONCATENATION: Regex =
        Regex::new(r#"(?i)\b(SELECT|INSERT|UPDATE|DELETE)\b.*["'`]\s*\+\s*[A-Za-z_$]"#).unwrap();
    static ref SECRET_NAME: Regex =
        Regex::new(r"(?i)password|secret|key|token|credential|api[_-]?key").unwrap();
    static ref SECRET_VALUE: Regex = Regex::new(r#"['"][A-Za-z0-9_\-.]{8,}['"]"#).unwrap();
    static ref RAW_HTML_INJECTION: Regex = Regex::new(r"dangerouslySetInnerHTML").unwrap();
}

/// Points deducted per weighted finding
const WEIGHT_FACTOR: u32 = 2;
/// Chance the sampled configuration finding is reported
const CONFIGURATION_FINDING_CHANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VulnerabilitySeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl VulnerabilitySeverity {
    pub fn weight(self) -> u32 {
        match self {
            VulnerabilitySeverity::Low => 1,
            VulnerabilitySeverity::Medium => 3,
            VulnerabilitySeverity::High => 5,
            VulnerabilitySeverity::Critical => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: String,
    pub file: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: VulnerabilitySeverity,
    pub description: String,
    pub remediation: String,
    /// Common Weakness Enumeration reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwe: Option<String>,
    /// CVSS base score, 0-10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl SeverityCounts {
    fn record(&mut self, severity: VulnerabilitySeverity) {
        match severity {
            VulnerabilitySeverity::Low => self.low += 1,
            VulnerabilitySeverity::Medium => self.medium += 1,
            VulnerabilitySeverity::High => self.high += 1,
            VulnerabilitySeverity::Critical => self.critical += 1,
        }
    }

    fn weighted(&self) -> u32 {
        self.low * VulnerabilitySeverity::Low.weight()
            + self.medium * VulnerabilitySeverity::Medium.weight()
            + self.high * VulnerabilitySeverity::High.weight()
            + self.critical * VulnerabilitySeverity::Critical.weight()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySummary {
    pub total: usize,
    pub by_severity: SeverityCounts,
    /// 0-100, higher is more secure
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScanResult {
    pub vulnerabilities: Vec<Vulnerability>,
    pub summary: SecuritySummary,
    pub scan_time: Timestamp,
    pub advanced: bool,
}

/// Scans source code for vulnerabilities on behalf of an agent
pub struct SecurityBehavior {
    decisions: Arc<dyn DecisionSource>,
}

impl SecurityBehavior {
    pub fn new(decisions: Arc<dyn DecisionSource>) -> Self {
        Self { decisions }
    }

    pub fn scan(&self, agent: &Agent, code: &str, language: &str, filename: &str) -> SecurityScanResult {
        let advanced =
            agent.has_active_capability(Capability::SecurityAnalysis, ADVANCED_MODULE_LEVEL);
        let vulnerabilities = if advanced {
            self.advanced_scan(code, language, filename)
        } else {
            self.basic_scan(code, language, filename)
        };

        let mut by_severity = SeverityCounts::default();
        for vulnerability in &vulnerabilities {
            by_severity.record(vulnerability.severity);
        }

        SecurityScanResult {
            summary: SecuritySummary {
                total: vulnerabilities.len(),
                by_severity,
                score: deducted_score(by_severity.weighted(), WEIGHT_FACTOR),
            },
            vulnerabilities,
            scan_time: now(),
            advanced,
        }
    }

    fn basic_scan(&self, code: &str, language: &str, filename: &str) -> Vec<Vulnerability> {
        let lines = source_lines(code);
        let mut vulnerabilities = Vec::new();

        if is_script_language(language) {
            for (i, line) in lines.iter().enumerate() {
                if SQL_CONCATENATION.is_match(line) {
                    vulnerabilities.push(Vulnerability {
                        id: format!("sql-injection-{}", i),
                        file: filename.to_string(),
                        line: i + 1,
                        kind: "SQL Injection".to_string(),
                        severity: VulnerabilitySeverity::High,
                        description:
                            "Possible SQL injection vulnerability detected in string concatenation"
                                .to_string(),
                        remediation: "Use parameterized queries or prepared statements".to_string(),
                        cwe: Some("CWE-89".to_string()),
                        cvss: None,
                    });
                }
            }
        }

        if self.decisions.chance(CONFIGURATION_FINDING_CHANCE) {
            let line = self.decisions.index(lines.len()) + 1;
            vulnerabilities.push(Vulnerability {
                id: format!("insecure-configuration-{}", line),
                file: filename.to_string(),
                line,
                kind: "Insecure Configuration".to_string(),
                severity: VulnerabilitySeverity::Low,
                description: "Potentially insecure configuration detected".to_string(),
                remediation: "Review and update security settings".to_string(),
                cwe: Some("CWE-1004".to_string()),
                cvss: None,
            });
        }

        vulnerabilities
    }

    fn advanced_scan(&self, code: &str, language: &str, filename: &str) -> Vec<Vulnerability> {
        let mut vulnerabilities = self.basic_scan(code, language, filename);
        let lines = source_lines(code);

        for (i, line) in lines.iter().enumerate() {
            if SECRET_NAME.is_match(line) && SECRET_VALUE.is_match(line) {
                vulnerabilities.push(Vulnerability {
                    id: format!("hardcoded-secret-{}", i),
                    file: filename.to_string(),
                    line: i + 1,
                    kind: "Hardcoded Secret".to_string(),
                    severity: VulnerabilitySeverity::Critical,
                    description: "Potential hardcoded secret or credential detected".to_string(),
                    remediation: "Move secrets to environment variables or a secure vault"
                        .to_string(),
                    cwe: Some("CWE-798".to_string()),
                    cvss: Some(9.1),
                });
            }
        }

        if is_script_language(language) {
            for (i, line) in lines.iter().enumerate() {
                if RAW_HTML_INJECTION.is_match(line) {
                    vulnerabilities.push(Vulnerability {
                        id: format!("xss-{}", i),
                        file: filename.to_string(),
                        line: i + 1,
                        kind: "Cross-Site Scripting (XSS)".to_string(),
                        severity: VulnerabilitySeverity::Medium,
                        description: "Potential XSS vulnerability with dangerouslySetInnerHTML"
                            .to_string(),
                        remediation:
                            "Sanitize user input and avoid using dangerouslySetInnerHTML"
                                .to_string(),
                        cwe: Some("CWE-79".to_string()),
                        cvss: Some(6.5),
                    });
                }
            }
        }

        vulnerabilities
    }

    /// Draft for a new security agent with the standard module set
    pub fn default_profile(name: &str, description: &str) -> AgentDraft {
        AgentDraft::new(name, description).with_modules(vec![
            AgentModule::new(
                "1",
                "Basic Vulnerability Scanner",
                "Detects common security vulnerabilities",
                Capability::SecurityAnalysis,
                1,
                true,
            ),
            AgentModule::new(
                "2",
                "Secret Detector",
                "Identifies hardcoded secrets and credentials",
                Capability::SecurityAnalysis,
                2,
                true,
            ),
            AgentModule::new(
                "3",
                "Advanced Threat Detection",
                "Identifies sophisticated security threats and vulnerabilities",
                Capability::SecurityAnalysis,
                3,
                false,
            ),
            AgentModule::new(
                "4",
                "Compliance Checker",
                "Verifies code against security compliance standards",
                Capability::SecurityAnalysis,
                4,
                false,
            ),
        ])
    }
}
