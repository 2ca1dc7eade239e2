//! Markdown report formatting

use std::fmt::Write;

use super::ReportRenderer;
use crate::audit::AuditReport;
use crate::error::ComplyScanError;
use crate::rules::Severity;
use crate::store::Violation;

pub struct MarkdownReport {
    /// Also list the analyzed, failed and skipped files
    detailed: bool,
}

impl MarkdownReport {
    pub fn new(detailed: bool) -> Self {
        Self { detailed }
    }
}

impl Default for MarkdownReport {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Escape characters that would break a table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn violation_row(out: &mut String, violation: &Violation) {
    let line = violation
        .line_number
        .map(|l| l.to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(
        out,
        "| `{}` | {} | {} | `{}` | {} |",
        violation.rule_id,
        violation.category,
        cell(&violation.file_path),
        line,
        cell(&violation.description)
    );
}

fn file_list(out: &mut String, title: &str, files: &[String]) {
    if files.is_empty() {
        return;
    }
    let _ = writeln!(out, "### {} ({})\n", title, files.len());
    for file in files {
        let _ = writeln!(out, "- `{}`", file);
    }
    out.push('\n');
}

impl ReportRenderer for MarkdownReport {
    fn render_report(&self, report: &AuditReport) -> Result<String, ComplyScanError> {
        let mut out = String::new();
        let audit = &report.audit;

        let _ = writeln!(out, "# Compliance Audit: {}\n", report.repository.full_name());
        let _ = writeln!(out, "| | |\n|---|---|");
        let _ = writeln!(out, "| Repository | <{}> |", report.repository.url);
        let _ = writeln!(out, "| Audit | `{}` |", audit.id);
        let _ = writeln!(out, "| Status | {} |", audit.status);
        let _ = writeln!(out, "| Started | {} |", audit.started_at.to_rfc3339());
        let _ = writeln!(out, "| Manifest | `{}` |", report.manifest);
        let _ = writeln!(
            out,
            "| Files | {} analyzed of {} candidates, {} compliant |",
            report.analyzed_files.len(),
            audit.total_files,
            audit.compliant_files
        );
        let _ = writeln!(out, "| Violations | {} |\n", audit.violation_count);

        out.push_str("## Summary\n\n| Severity | Count |\n|---|---|\n");
        for severity in Severity::ALL {
            let _ = writeln!(out, "| {} | {} |", severity, report.count_by_severity(severity));
        }
        out.push('\n');

        if report.truncated {
            let _ = writeln!(
                out,
                "> **Note:** {} candidate files beyond the analysis limit were not scanned.\n",
                report.skipped_files.len()
            );
        }

        out.push_str("## Violations\n\n");
        if report.violations.is_empty() {
            out.push_str("No violations found.\n\n");
        } else {
            for severity in Severity::ALL {
                let matching: Vec<_> = report
                    .violations
                    .iter()
                    .filter(|v| v.severity == severity)
                    .collect();
                if matching.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "### {} ({})\n", severity, matching.len());
                out.push_str("| Rule | Category | File | Line | Description |\n");
                out.push_str("|---|---|---|---|---|\n");
                for violation in matching {
                    violation_row(&mut out, violation);
                }
                out.push('\n');
            }
        }

        if self.detailed {
            out.push_str("## Files\n\n");
            file_list(&mut out, "Analyzed", &report.analyzed_files);
            file_list(&mut out, "Failed to fetch", &report.failed_files);
            file_list(&mut out, "Skipped", &report.skipped_files);
            file_list(&mut out, "Unreadable directories", &report.unreadable_dirs);
        }

        let _ = writeln!(
            out,
            "---\n_Generated by complyscan v{}_",
            env!("CARGO_PKG_VERSION")
        );
        Ok(out)
    }
}
