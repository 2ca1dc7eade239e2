//! In-memory store

use tokio::sync::RwLock;

use super::models::{Audit, NewViolation, Repository, Violation};
use super::state::StoreState;
use super::PersistenceGateway;
use crate::error::PersistenceError;

/// Process-local store; contents are lost on drop
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PersistenceGateway for MemoryStore {
    async fn upsert_repository(
        &self,
        owner: &str,
        name: &str,
        url: &str,
    ) -> Result<Repository, PersistenceError> {
        self.state.write().await.upsert_repository(owner, name, url)
    }

    async fn get_repository(&self, id: &str) -> Result<Option<Repository>, PersistenceError> {
        Ok(self.state.read().await.get_repository(id))
    }

    async fn create_audit(&self, repository_id: &str) -> Result<Audit, PersistenceError> {
        self.state.write().await.create_audit(repository_id)
    }

    async fn get_audit(&self, id: &str) -> Result<Option<Audit>, PersistenceError> {
        Ok(self.state.read().await.get_audit(id))
    }

    async fn list_audits(&self, repository_id: &str) -> Result<Vec<Audit>, PersistenceError> {
        Ok(self.state.read().await.list_audits(repository_id))
    }

    async fn log_violation(&self, violation: NewViolation) -> Result<Violation, PersistenceError> {
        self.state.write().await.log_violation(violation)
    }

    async fn list_violations(&self, audit_id: &str) -> Result<Vec<Violation>, PersistenceError> {
        Ok(self.state.read().await.list_violations(audit_id))
    }

    async fn complete_audit(
        &self,
        audit_id: &str,
        total_files: usize,
        violation_count: usize,
        compliant_files: usize,
    ) -> Result<Audit, PersistenceError> {
        self.state
            .write()
            .await
            .complete_audit(audit_id, total_files, violation_count, compliant_files)
    }

    async fn fail_audit(&self, audit_id: &str, reason: &str) -> Result<Audit, PersistenceError> {
        self.state.write().await.fail_audit(audit_id, reason)
    }

    async fn delete_audit(&self, audit_id: &str) -> Result<bool, PersistenceError> {
        self.state.write().await.delete_audit(audit_id)
    }
}
