//! JSON output formatting

use serde::Serialize;

use super::{HistoryRenderer, ReportRenderer};
use crate::audit::AuditReport;
use crate::error::ComplyScanError;
use crate::rules::Severity;
use crate::store::{Audit, Repository, Violation};

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    version: &'static str,
    #[serde(flatten)]
    report: &'a AuditReport,
    summary: SeverityCounts,
}

#[derive(Serialize)]
struct SeverityCounts {
    critical: usize,
    high: usize,
    medium: usize,
    low: usize,
}

impl SeverityCounts {
    fn from_violations(violations: &[Violation]) -> Self {
        let count = |s: Severity| violations.iter().filter(|v| v.severity == s).count();
        Self {
            critical: count(Severity::Critical),
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
        }
    }
}

#[derive(Serialize)]
struct HistoryOutput<'a> {
    repository: &'a Repository,
    audits: &'a [Audit],
}

#[derive(Serialize)]
struct AuditOutput<'a> {
    repository: &'a Repository,
    audit: &'a Audit,
    summary: SeverityCounts,
    violations: &'a [Violation],
}

impl ReportRenderer for JsonOutput {
    fn render_report(&self, report: &AuditReport) -> Result<String, ComplyScanError> {
        let output = ReportOutput {
            version: env!("CARGO_PKG_VERSION"),
            report,
            summary: SeverityCounts::from_violations(&report.violations),
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }
}

impl HistoryRenderer for JsonOutput {
    fn render_history(
        &self,
        repository: &Repository,
        audits: &[Audit],
    ) -> Result<String, ComplyScanError> {
        Ok(serde_json::to_string_pretty(&HistoryOutput {
            repository,
            audits,
        })?)
    }

    fn render_audit(
        &self,
        repository: &Repository,
        audit: &Audit,
        violations: &[Violation],
    ) -> Result<String, ComplyScanError> {
        Ok(serde_json::to_string_pretty(&AuditOutput {
            repository,
            audit,
            summary: SeverityCounts::from_violations(violations),
            violations,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::fixtures;

    #[test]
    fn test_render_report() {
        let rendered = JsonOutput::new()
            .render_report(&fixtures::report(true))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["repository"]["owner"], "octocat");
        assert_eq!(json["audit"]["status"], "completed");
        assert_eq!(json["audit"]["violation_count"], 2);
        assert_eq!(json["manifest"], "requirements.txt");
        assert_eq!(json["policy"]["forbidden"][0], "tensorflow");
        assert_eq!(json["summary"]["critical"], 1);
        assert_eq!(json["summary"]["low"], 1);
        assert_eq!(json["violations"][0]["severity"], "critical");
        assert_eq!(json["violations"][0]["line_number"], 3);
        assert_eq!(json["truncated"], false);
    }

    #[test]
    fn test_render_audit_detail() {
        let report = fixtures::report(true);
        let rendered = JsonOutput::new()
            .render_audit(&report.repository, &report.audit, &report.violations)
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["violations"].as_array().unwrap().len(), 2);
        assert_eq!(json["summary"]["high"], 0);
    }

    #[test]
    fn test_render_history() {
        let report = fixtures::report(false);
        let rendered = JsonOutput::new()
            .render_history(&report.repository, std::slice::from_ref(&report.audit))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["audits"][0]["id"], report.audit.id.as_str());
    }
}
