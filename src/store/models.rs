//! Persisted records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PersistenceError;
use crate::rules::{Category, ScanHit, Severity};

/// A repository known to the store. Keyed by a stable id derived from `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub last_synced_at: DateTime<Utc>,
}

impl Repository {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Audit lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Pending,
    Completed,
    Failed,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit run against a repository.
///
/// Created `pending`, moved exactly once to `completed` or `failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub id: String,
    pub repository_id: String,
    pub status: AuditStatus,
    /// Candidate files found before the analysis cap was applied
    pub total_files: usize,
    /// Analyzed files with no violations
    pub compliant_files: usize,
    pub violation_count: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl Audit {
    pub fn new(id: String, repository_id: String, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            repository_id,
            status: AuditStatus::Pending,
            total_files: 0,
            compliant_files: 0,
            violation_count: 0,
            started_at,
            completed_at: None,
            failure_reason: None,
        }
    }

    pub fn ensure_pending(&self) -> Result<(), PersistenceError> {
        if self.status.is_terminal() {
            return Err(PersistenceError::AuditNotPending {
                id: self.id.clone(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// Move to `completed` with the final counters
    pub fn complete(
        &mut self,
        total_files: usize,
        violation_count: usize,
        compliant_files: usize,
    ) -> Result<(), PersistenceError> {
        self.ensure_pending()?;
        self.status = AuditStatus::Completed;
        self.total_files = total_files;
        self.violation_count = violation_count;
        self.compliant_files = compliant_files;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Move to `failed`, recording why
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), PersistenceError> {
        self.ensure_pending()?;
        self.status = AuditStatus::Failed;
        self.failure_reason = Some(reason.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }
}

/// A persisted violation. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    pub audit_id: String,
    pub repository_id: String,
    pub file_path: String,
    pub line_number: Option<usize>,
    pub rule_id: String,
    pub category: Category,
    pub severity: Severity,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Violation write request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewViolation {
    pub audit_id: String,
    pub repository_id: String,
    pub file_path: String,
    pub line_number: Option<usize>,
    pub rule_id: String,
    pub category: Category,
    pub severity: Severity,
    pub description: String,
}

impl NewViolation {
    /// Attach audit and file identity to a scanner hit
    pub fn from_hit(audit: &Audit, file_path: &str, hit: &ScanHit) -> Self {
        Self {
            audit_id: audit.id.clone(),
            repository_id: audit.repository_id.clone(),
            file_path: file_path.to_string(),
            line_number: Some(hit.line_number),
            rule_id: hit.rule_id.to_string(),
            category: hit.category,
            severity: hit.severity,
            description: hit.description.clone(),
        }
    }

    pub fn into_violation(self, id: String) -> Violation {
        Violation {
            id,
            audit_id: self.audit_id,
            repository_id: self.repository_id,
            file_path: self.file_path,
            line_number: self.line_number,
            rule_id: self.rule_id,
            category: self.category,
            severity: self.severity,
            description: self.description,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> Audit {
        Audit::new("a1".into(), "r1".into(), Utc::now())
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut audit = pending();
        audit.complete(5, 2, 3).unwrap();
        assert_eq!(audit.status, AuditStatus::Completed);
        assert_eq!(audit.total_files, 5);
        assert_eq!(audit.violation_count, 2);
        assert_eq!(audit.compliant_files, 3);
        assert!(audit.completed_at.is_some());

        let err = audit.complete(1, 1, 1).unwrap_err();
        assert!(matches!(err, PersistenceError::AuditNotPending { .. }));
        assert_eq!(audit.total_files, 5);
    }

    #[test]
    fn test_fail_records_reason() {
        let mut audit = pending();
        audit.fail("no manifest").unwrap();
        assert_eq!(audit.status, AuditStatus::Failed);
        assert_eq!(audit.failure_reason.as_deref(), Some("no manifest"));
        assert!(audit.fail("again").is_err());
        assert!(audit.complete(0, 0, 0).is_err());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AuditStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert!(AuditStatus::Failed.is_terminal());
        assert!(!AuditStatus::Pending.is_terminal());
    }

    #[test]
    fn test_new_violation_from_hit() {
        let audit = pending();
        let hit = ScanHit::new("SEC001", 7, Category::Security, Severity::Critical, "eval");
        let new = NewViolation::from_hit(&audit, "app.py", &hit);
        assert_eq!(new.audit_id, "a1");
        assert_eq!(new.repository_id, "r1");
        assert_eq!(new.line_number, Some(7));
        assert_eq!(new.rule_id, "SEC001");
    }
}
