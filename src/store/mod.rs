//! # Persistence Gateway
//!
//! The narrow write/read interface the audit orchestrator persists through,
//! plus two backends:
//!
//! - [`memory::MemoryStore`] - process-local maps, for tests and one-shot runs
//! - [`json::JsonFileStore`] - the same state snapshotted to a JSON file
//!
//! Every input is validated before anything is written. Writes against an
//! audit that is no longer `pending` are rejected.

pub mod json;
pub mod memory;
pub mod models;
pub mod state;
pub mod validation;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use models::{Audit, AuditStatus, NewViolation, Repository, Violation};

use sha2::{Digest, Sha256};

use crate::error::PersistenceError;

/// Storage backend for repositories, audits and violations.
#[async_trait::async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Create the repository or refresh `url` and `last_synced_at`. The id is
    /// stable for a given `owner/name`.
    async fn upsert_repository(
        &self,
        owner: &str,
        name: &str,
        url: &str,
    ) -> Result<Repository, PersistenceError>;

    async fn get_repository(&self, id: &str) -> Result<Option<Repository>, PersistenceError>;

    /// Create a `pending` audit for an existing repository
    async fn create_audit(&self, repository_id: &str) -> Result<Audit, PersistenceError>;

    async fn get_audit(&self, id: &str) -> Result<Option<Audit>, PersistenceError>;

    /// Audits of a repository, newest first
    async fn list_audits(&self, repository_id: &str) -> Result<Vec<Audit>, PersistenceError>;

    /// Append a violation to a `pending` audit
    async fn log_violation(&self, violation: NewViolation) -> Result<Violation, PersistenceError>;

    /// Violations of an audit in insertion order
    async fn list_violations(&self, audit_id: &str) -> Result<Vec<Violation>, PersistenceError>;

    /// Mark a `pending` audit completed with its final counters
    async fn complete_audit(
        &self,
        audit_id: &str,
        total_files: usize,
        violation_count: usize,
        compliant_files: usize,
    ) -> Result<Audit, PersistenceError>;

    /// Mark a `pending` audit failed
    async fn fail_audit(&self, audit_id: &str, reason: &str) -> Result<Audit, PersistenceError>;

    /// Delete an audit and its violations. Returns whether it existed.
    async fn delete_audit(&self, audit_id: &str) -> Result<bool, PersistenceError>;
}

/// SHA-256 hex digest over `/`-joined parts
pub fn derive_id(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(parts.join("/").as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Stable repository id. Owner and name compare case-insensitively, as on GitHub.
pub fn repository_id(owner: &str, name: &str) -> String {
    derive_id(&[&owner.to_lowercase(), &name.to_lowercase()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_id_is_stable() {
        let id = repository_id("Octocat", "Hello-World");
        assert_eq!(id, repository_id("octocat", "hello-world"));
        assert_eq!(id.len(), validation::ID_LEN);
        assert!(validation::validate_id("repository_id", &id).is_ok());
        assert_ne!(id, repository_id("octocat", "other"));
    }

    #[test]
    fn test_derive_id_known_digest() {
        // sha256("abc")
        assert_eq!(
            derive_id(&["abc"]),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
