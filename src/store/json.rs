//! JSON file store
//!
//! Keeps the full state in memory and rewrites the snapshot after every
//! mutation. The snapshot is written to a sibling temporary file and renamed
//! into place so a crash never leaves a truncated store behind.

use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;

use super::models::{Audit, NewViolation, Repository, Violation};
use super::state::StoreState;
use super::PersistenceGateway;
use crate::error::PersistenceError;

/// Store persisted to a single JSON document
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty when the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let state: StoreState = serde_json::from_str(&content)?;
                debug!(
                    path = %path.display(),
                    repositories = state.repositories.len(),
                    audits = state.audits.len(),
                    "Loaded audit store"
                );
                state
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No audit store found, starting empty");
                StoreState::default()
            }
            Err(e) => {
                return Err(PersistenceError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    async fn save(&self, state: &StoreState) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let content = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }

    /// Apply a mutation and persist it. The in-memory state is only replaced
    /// once the snapshot is on disk.
    async fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut StoreState) -> Result<T, PersistenceError> + Send,
    ) -> Result<T, PersistenceError> {
        let mut guard = self.state.write().await;
        let mut next = guard.clone();
        let value = apply(&mut next)?;
        self.save(&next).await?;
        *guard = next;
        Ok(value)
    }
}

#[async_trait::async_trait]
impl PersistenceGateway for JsonFileStore {
    async fn upsert_repository(
        &self,
        owner: &str,
        name: &str,
        url: &str,
    ) -> Result<Repository, PersistenceError> {
        self.mutate(|s| s.upsert_repository(owner, name, url)).await
    }

    async fn get_repository(&self, id: &str) -> Result<Option<Repository>, PersistenceError> {
        Ok(self.state.read().await.get_repository(id))
    }

    async fn create_audit(&self, repository_id: &str) -> Result<Audit, PersistenceError> {
        self.mutate(|s| s.create_audit(repository_id)).await
    }

    async fn get_audit(&self, id: &str) -> Result<Option<Audit>, PersistenceError> {
        Ok(self.state.read().await.get_audit(id))
    }

    async fn list_audits(&self, repository_id: &str) -> Result<Vec<Audit>, PersistenceError> {
        Ok(self.state.read().await.list_audits(repository_id))
    }

    async fn log_violation(&self, violation: NewViolation) -> Result<Violation, PersistenceError> {
        self.mutate(|s| s.log_violation(violation)).await
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
        self.mutate(|s| s.complete_audit(audit_id, total_files, violation_count, compliant_files))
            .await
    }

    async fn fail_audit(&self, audit_id: &str, reason: &str) -> Result<Audit, PersistenceError> {
        self.mutate(|s| s.fail_audit(audit_id, reason)).await
    }

    async fn delete_audit(&self, audit_id: &str) -> Result<bool, PersistenceError> {
        self.mutate(|s| s.delete_audit(audit_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AuditStatus;
    use tempfile::TempDir;

    const URL: &str = "https://github.com/octocat/hello";

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/store.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        let repo = store.upsert_repository("octocat", "hello", URL).await.unwrap();
        let audit = store.create_audit(&repo.id).await.unwrap();
        store.complete_audit(&audit.id, 3, 0, 3).await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let loaded = reopened.get_audit(&audit.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, AuditStatus::Completed);
        assert_eq!(loaded.total_files, 3);
        assert_eq!(reopened.list_audits(&repo.id).await.unwrap().len(), 1);

        // Ids keep advancing after reload
        let next = reopened.create_audit(&repo.id).await.unwrap();
        assert_ne!(next.id, audit.id);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("absent.json")).await.unwrap();
        let id = crate::store::repository_id("a", "b");
        assert!(store.get_repository(&id).await.unwrap().is_none());
        assert!(!dir.path().join("absent.json").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_rejected_write_leaves_snapshot_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        let repo = store.upsert_repository("octocat", "hello", URL).await.unwrap();
        let audit = store.create_audit(&repo.id).await.unwrap();
        store.fail_audit(&audit.id, "no manifest").await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(store.complete_audit(&audit.id, 1, 0, 1).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }
}
