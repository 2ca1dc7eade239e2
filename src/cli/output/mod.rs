//! Output formatting module for CLI

pub mod json;
mod markdown;
mod terminal;

pub use json::JsonOutput;
pub use markdown::MarkdownReport;
pub use terminal::TerminalOutput;

use crate::audit::AuditReport;
use crate::error::ComplyScanError;
use crate::store::{Audit, Repository, Violation};

/// Trait for rendering a finished audit
pub trait ReportRenderer {
    fn render_report(&self, report: &AuditReport) -> Result<String, ComplyScanError>;
}

/// Trait for rendering stored audit history
pub trait HistoryRenderer {
    fn render_history(
        &self,
        repository: &Repository,
        audits: &[Audit],
    ) -> Result<String, ComplyScanError>;

    fn render_audit(
        &self,
        repository: &Repository,
        audit: &Audit,
        violations: &[Violation],
    ) -> Result<String, ComplyScanError>;
}

/// Shared fixtures for the renderer tests
#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;

    use crate::audit::AuditReport;
    use crate::manifest::DependencyPolicy;
    use crate::rules::{Category, Severity};
    use crate::store::{Audit, NewViolation, Repository, Violation};

    pub fn repository() -> Repository {
        Repository {
            id: crate::store::repository_id("octocat", "hello"),
            owner: "octocat".to_string(),
            name: "hello".to_string(),
            url: "https://github.com/octocat/hello".to_string(),
            created_at: Utc::now(),
            last_synced_at: Utc::now(),
        }
    }

    pub fn violation(audit: &Audit, line: usize, severity: Severity, description: &str) -> Violation {
        NewViolation {
            audit_id: audit.id.clone(),
            repository_id: audit.repository_id.clone(),
            file_path: "src/app.py".to_string(),
            line_number: Some(line),
            rule_id: "SEC001".to_string(),
            category: Category::Security,
            severity,
            description: description.to_string(),
        }
        .into_violation(format!("v{line}"))
    }

    pub fn report(with_violations: bool) -> AuditReport {
        let repository = repository();
        let mut audit = Audit::new("a".repeat(64), repository.id.clone(), Utc::now());
        let violations = if with_violations {
            vec![
                violation(&audit, 3, Severity::Critical, "Unsafe dynamic evaluation: eval()"),
                violation(&audit, 7, Severity::Low, "Debug statement left in code: print()"),
            ]
        } else {
            Vec::new()
        };
        let analyzed = vec!["src/app.py".to_string(), "src/util.py".to_string()];
        let compliant = if with_violations { 1 } else { 2 };
        audit
            .complete(analyzed.len(), violations.len(), compliant)
            .unwrap();

        AuditReport {
            repository,
            audit,
            manifest: "requirements.txt".to_string(),
            policy: DependencyPolicy::parse("flask\nno tensorflow\n"),
            violations,
            analyzed_files: analyzed,
            failed_files: Vec::new(),
            skipped_files: Vec::new(),
            truncated: false,
            unreadable_dirs: Vec::new(),
        }
    }
}
