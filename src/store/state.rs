//! Store state shared by the backends
//!
//! All validation and lifecycle rules live here so both backends enforce
//! the same behavior.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::models::{Audit, NewViolation, Repository, Violation};
use super::validation::{
    validate_description, validate_id, validate_name, validate_new_violation, validate_url,
};
use super::{derive_id, repository_id};
use crate::error::PersistenceError;

/// Everything a backend stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub repositories: Vec<Repository>,
    /// Audits in creation order
    #[serde(default)]
    pub audits: Vec<Audit>,
    /// Violations in insertion order
    #[serde(default)]
    pub violations: Vec<Violation>,
    /// Monotonic counter mixed into generated ids
    #[serde(default)]
    pub sequence: u64,
}

impl StoreState {
    fn next_sequence(&mut self) -> String {
        self.sequence += 1;
        self.sequence.to_string()
    }

    fn audit_mut(&mut self, id: &str) -> Result<&mut Audit, PersistenceError> {
        self.audits
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| PersistenceError::NotFound {
                kind: "audit",
                id: id.to_string(),
            })
    }

    pub fn upsert_repository(
        &mut self,
        owner: &str,
        name: &str,
        url: &str,
    ) -> Result<Repository, PersistenceError> {
        validate_name("owner", owner)?;
        validate_name("name", name)?;
        validate_url(url)?;

        let id = repository_id(owner, name);
        let now = Utc::now();
        if let Some(existing) = self.repositories.iter_mut().find(|r| r.id == id) {
            existing.url = url.to_string();
            existing.last_synced_at = now;
            debug!(repository = %existing.full_name(), "Repository refreshed");
            return Ok(existing.clone());
        }

        let repository = Repository {
            id,
            owner: owner.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            created_at: now,
            last_synced_at: now,
        };
        debug!(repository = %repository.full_name(), "Repository created");
        self.repositories.push(repository.clone());
        Ok(repository)
    }

    pub fn get_repository(&self, id: &str) -> Option<Repository> {
        self.repositories.iter().find(|r| r.id == id).cloned()
    }

    pub fn create_audit(&mut self, repository_id: &str) -> Result<Audit, PersistenceError> {
        validate_id("repository_id", repository_id)?;
        if self.get_repository(repository_id).is_none() {
            return Err(PersistenceError::NotFound {
                kind: "repository",
                id: repository_id.to_string(),
            });
        }

        let started_at = Utc::now();
        let sequence = self.next_sequence();
        let id = derive_id(&[
            "audit",
            repository_id,
            &started_at.timestamp_nanos_opt().unwrap_or_default().to_string(),
            &sequence,
        ]);
        let audit = Audit::new(id, repository_id.to_string(), started_at);
        self.audits.push(audit.clone());
        Ok(audit)
    }

    pub fn get_audit(&self, id: &str) -> Option<Audit> {
        self.audits.iter().find(|a| a.id == id).cloned()
    }

    pub fn list_audits(&self, repository_id: &str) -> Vec<Audit> {
        self.audits
            .iter()
            .rev()
            .filter(|a| a.repository_id == repository_id)
            .cloned()
            .collect()
    }

    pub fn log_violation(&mut self, new: NewViolation) -> Result<Violation, PersistenceError> {
        validate_new_violation(&new)?;
        let audit = self
            .audits
            .iter()
            .find(|a| a.id == new.audit_id)
            .ok_or_else(|| PersistenceError::NotFound {
                kind: "audit",
                id: new.audit_id.clone(),
            })?;
        audit.ensure_pending()?;
        if audit.repository_id != new.repository_id {
            return Err(PersistenceError::NotFound {
                kind: "repository",
                id: new.repository_id.clone(),
            });
        }

        let sequence = self.next_sequence();
        let id = derive_id(&["violation", &new.audit_id, &sequence]);
        let violation = new.into_violation(id);
        self.violations.push(violation.clone());
        Ok(violation)
    }

    pub fn list_violations(&self, audit_id: &str) -> Vec<Violation> {
        self.violations
            .iter()
            .filter(|v| v.audit_id == audit_id)
            .cloned()
            .collect()
    }

    pub fn complete_audit(
        &mut self,
        audit_id: &str,
        total_files: usize,
        violation_count: usize,
        compliant_files: usize,
    ) -> Result<Audit, PersistenceError> {
        validate_id("audit_id", audit_id)?;
        let audit = self.audit_mut(audit_id)?;
        audit.complete(total_files, violation_count, compliant_files)?;
        Ok(audit.clone())
    }

    pub fn fail_audit(&mut self, audit_id: &str, reason: &str) -> Result<Audit, PersistenceError> {
        validate_id("audit_id", audit_id)?;
        validate_description("failure_reason", reason)?;
        let audit = self.audit_mut(audit_id)?;
        audit.fail(reason)?;
        Ok(audit.clone())
    }

    pub fn delete_audit(&mut self, audit_id: &str) -> Result<bool, PersistenceError> {
        validate_id("audit_id", audit_id)?;
        let before = self.audits.len();
        self.audits.retain(|a| a.id != audit_id);
        if self.audits.len() == before {
            return Ok(false);
        }
        let violations_before = self.violations.len();
        self.violations.retain(|v| v.audit_id != audit_id);
        debug!(
            audit = audit_id,
            violations = violations_before - self.violations.len(),
            "Audit deleted"
        );
        Ok(true)
    }
}
