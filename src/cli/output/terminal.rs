//! Terminal output formatting with colors

use colored::{ColoredString, Colorize};

use super::{HistoryRenderer, ReportRenderer};
use crate::audit::AuditReport;
use crate::error::ComplyScanError;
use crate::rules::Severity;
use crate::store::{Audit, AuditStatus, Repository, Violation};

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_header(&self, repository: &Repository, audit: &Audit) -> String {
        format!(
            r#"
{} v{}

{} {}
{} {}
"#,
            "complyscan".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Repository:".dimmed(),
            repository.full_name().white().bold(),
            "Audit:".dimmed(),
            short_id(&audit.id).yellow()
        )
    }

    fn section(&self, title: &str) -> String {
        format!("\n{}\n{}\n\n", "━".repeat(50).dimmed(), title.bold())
    }

    fn severity_label(&self, severity: Severity) -> ColoredString {
        match severity {
            Severity::Critical => "❌ CRITICAL".red().bold(),
            Severity::High => "🔴 HIGH".red(),
            Severity::Medium => "⚠️  MEDIUM".yellow().bold(),
            Severity::Low => "ℹ️  LOW".blue().bold(),
        }
    }

    fn format_violations(&self, violations: &[Violation]) -> String {
        let mut output = self.section("  VIOLATIONS");

        if violations.is_empty() {
            output.push_str(&format!("  {}\n", "✓ No violations found".green()));
            return output;
        }

        for severity in Severity::ALL {
            let matching: Vec<_> = violations
                .iter()
                .filter(|v| v.severity == severity)
                .collect();
            if matching.is_empty() {
                continue;
            }
            output.push_str(&format!(
                "{} ({})\n",
                self.severity_label(severity),
                matching.len()
            ));
            for violation in matching {
                output.push_str(&self.format_violation(violation));
            }
            output.push('\n');
        }

        output
    }

    fn format_violation(&self, violation: &Violation) -> String {
        let location = match violation.line_number {
            Some(line) => format!("{}:{}", violation.file_path, line),
            None => violation.file_path.clone(),
        };
        format!(
            "  {} [{}] {}\n    {} {}\n",
            "•".dimmed(),
            violation.rule_id.cyan(),
            violation.description,
            "└─".dimmed(),
            location.dimmed()
        )
    }

    fn format_summary(&self, report: &AuditReport) -> String {
        let mut output = self.section("  SUMMARY");
        let audit = &report.audit;

        output.push_str(&format!(
            "  {} {}\n",
            "Manifest:".dimmed(),
            report.manifest
        ));
        output.push_str(&format!(
            "  {} {} allowed, {} forbidden\n",
            "Policy:".dimmed(),
            report.policy.allowed.len(),
            report.policy.forbidden.len()
        ));
        output.push_str(&format!(
            "  {} {} of {} candidates analyzed, {} compliant\n",
            "Files:".dimmed(),
            report.analyzed_files.len(),
            audit.total_files,
            audit.compliant_files
        ));

        let counts: Vec<String> = Severity::ALL
            .iter()
            .map(|s| format!("{} {}", report.count_by_severity(*s), s))
            .collect();
        output.push_str(&format!(
            "  {} {} ({})\n",
            "Violations:".dimmed(),
            audit.violation_count,
            counts.join(", ")
        ));

        if report.truncated {
            output.push_str(&format!(
                "  {} {} candidate files beyond the analysis limit were not scanned\n",
                "Note:".yellow(),
                report.skipped_files.len()
            ));
        }
        if !report.failed_files.is_empty() {
            output.push_str(&format!(
                "  {} could not fetch {}\n",
                "Note:".yellow(),
                report.failed_files.join(", ")
            ));
        }
        if !report.unreadable_dirs.is_empty() {
            output.push_str(&format!(
                "  {} could not list {}\n",
                "Note:".yellow(),
                report.unreadable_dirs.join(", ")
            ));
        }

        output
    }

    fn status_label(&self, status: AuditStatus) -> ColoredString {
        match status {
            AuditStatus::Completed => status.as_str().green(),
            AuditStatus::Failed => status.as_str().red(),
            AuditStatus::Pending => status.as_str().yellow(),
        }
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TerminalOutput {
    fn render_report(&self, report: &AuditReport) -> Result<String, ComplyScanError> {
        let mut output = self.format_header(&report.repository, &report.audit);
        output.push_str(&self.format_violations(&report.violations));
        output.push_str(&self.format_summary(report));
        Ok(output)
    }
}

impl HistoryRenderer for TerminalOutput {
    fn render_history(
        &self,
        repository: &Repository,
        audits: &[Audit],
    ) -> Result<String, ComplyScanError> {
        let mut output = format!(
            "\n{} {}\n",
            "Audit history for".dimmed(),
            repository.full_name().white().bold()
        );
        output.push_str(&self.section("  AUDITS"));

        if audits.is_empty() {
            output.push_str(&format!("  {}\n", "No audits recorded.".dimmed()));
            return Ok(output);
        }

        for audit in audits {
            output.push_str(&format!(
                "  {} {} {:<9} {} files, {} compliant, {} violations\n",
                short_id(&audit.id).yellow(),
                audit.started_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
                self.status_label(audit.status),
                audit.total_files,
                audit.compliant_files,
                audit.violation_count
            ));
            if let Some(reason) = &audit.failure_reason {
                output.push_str(&format!("    {} {}\n", "└─".dimmed(), reason.red()));
            }
        }

        Ok(output)
    }

    fn render_audit(
        &self,
        repository: &Repository,
        audit: &Audit,
        violations: &[Violation],
    ) -> Result<String, ComplyScanError> {
        let mut output = self.format_header(repository, audit);
        output.push_str(&format!(
            "{} {}\n",
            "Status:".dimmed(),
            self.status_label(audit.status)
        ));
        output.push_str(&self.format_violations(violations));
        Ok(output)
    }
}

/// First 12 characters of an id, enough to tell audits apart on screen
fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}
