//! # Audit Orchestrator
//!
//! Drives one audit run end to end:
//!
//! 1. upsert the repository and open a `pending` audit
//! 2. locate and parse the manifest (missing manifest fails the audit)
//! 3. walk the conventional source roots for candidates
//! 4. fetch and scan a bounded prefix of the candidates, persisting each
//!    violation as soon as it is found
//! 5. complete the audit with aggregate counters, exactly once
//!
//! The orchestrator owns no global state; the content provider and the
//! persistence gateway are handed in by the caller.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use url::Url;

use crate::config::Config;
use crate::error::{ComplyScanError, ConfigError, ProviderError};
use crate::manifest::{locate_manifest, DependencyPolicy};
use crate::providers::{fetch_with_fallback, ContentProvider, RepoRef};
use crate::rules::{Severity, ViolationScanner};
use crate::store::{Audit, NewViolation, PersistenceGateway, Repository, Violation};
use crate::walker::{TreeWalker, WalkOptions};

/// Owner used for checkouts audited from the local filesystem
pub const LOCAL_OWNER: &str = "local";

/// Repository identity an audit runs against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTarget {
    pub owner: String,
    pub name: String,
    pub url: String,
}

impl AuditTarget {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            url: url.into(),
        }
    }

    /// Target for a checkout on disk. The directory name becomes the
    /// repository name, with characters outside `[A-Za-z0-9._-]` replaced.
    pub fn local(path: &std::path::Path) -> Result<Self, ProviderError> {
        let invalid = || ProviderError::InvalidPath {
            path: path.display().to_string(),
        };
        let canonical = path.canonicalize().map_err(|_| invalid())?;
        let dir_name = canonical
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("checkout");
        let name: String = dir_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        let url = Url::from_directory_path(&canonical).map_err(|_| invalid())?;

        Ok(Self::new(LOCAL_OWNER, name, url.to_string()))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl From<&RepoRef> for AuditTarget {
    fn from(repo: &RepoRef) -> Self {
        Self::new(repo.owner.clone(), repo.name.clone(), repo.url())
    }
}

/// Knobs for one run, resolved from configuration
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Candidates actually fetched and scanned
    pub max_files: usize,
    /// Concurrent fetches (1 = sequential)
    pub concurrency: usize,
    pub source_roots: Vec<String>,
    pub branches: Vec<String>,
    pub manifest_filenames: Vec<String>,
    pub walk: WalkOptions,
}

impl AuditOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            max_files: config.analysis.max_files,
            concurrency: config.analysis.concurrency.max(1),
            source_roots: config.analysis.source_roots.clone(),
            branches: config.manifest.branches.clone(),
            manifest_filenames: config.manifest.filenames.clone(),
            walk: WalkOptions::from_config(&config.analysis, config.exclude_matcher()?),
        })
    }
}

/// Outcome of a completed audit run
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub repository: Repository,
    /// The audit in its final state
    pub audit: Audit,
    /// Manifest filename that was used
    pub manifest: String,
    pub policy: DependencyPolicy,
    /// Violations that were persisted, in scan order
    pub violations: Vec<Violation>,
    /// Files fetched and scanned
    pub analyzed_files: Vec<String>,
    /// Selected files whose fetch failed or returned nothing
    pub failed_files: Vec<String>,
    /// Candidates beyond the analysis cap, never scanned
    pub skipped_files: Vec<String>,
    /// Whether the cap excluded any candidate
    pub truncated: bool,
    /// Directories that could not be listed during the walk
    pub unreadable_dirs: Vec<String>,
}

impl AuditReport {
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    /// Highest severity among the violations
    pub fn max_severity(&self) -> Option<Severity> {
        self.violations.iter().map(|v| v.severity).max()
    }
}

/// Runs audits against one provider and one store
pub struct AuditOrchestrator {
    provider: Arc<dyn ContentProvider>,
    store: Arc<dyn PersistenceGateway>,
    config: Config,
    options: AuditOptions,
}

impl AuditOrchestrator {
    pub fn new(
        provider: Arc<dyn ContentProvider>,
        store: Arc<dyn PersistenceGateway>,
        config: Config,
    ) -> Result<Self, ConfigError> {
        let options = AuditOptions::from_config(&config)?;
        Ok(Self {
            provider,
            store,
            config,
            options,
        })
    }

    /// Run one audit.
    ///
    /// # Errors
    ///
    /// - [`ComplyScanError::ManifestNotFound`] or [`ComplyScanError::Provider`]
    ///   when the manifest cannot be located; the audit is marked `failed`.
    /// - [`ComplyScanError::Persistence`] when the repository or audit record
    ///   cannot be created or completed.
    pub async fn run(&self, target: &AuditTarget) -> Result<AuditReport, ComplyScanError> {
        let span = info_span!("audit", repository = %target.full_name());
        self.run_inner(target).instrument(span).await
    }

    async fn run_inner(&self, target: &AuditTarget) -> Result<AuditReport, ComplyScanError> {
        let repository = self
            .store
            .upsert_repository(&target.owner, &target.name, &target.url)
            .await?;
        let audit = self.store.create_audit(&repository.id).await?;
        info!(audit = %audit.id, "Audit started");

        let manifest = match locate_manifest(
            self.provider.as_ref(),
            &target.owner,
            &target.name,
            &self.options.manifest_filenames,
            &self.options.branches,
        )
        .await
        {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(error = %e, "Manifest unavailable, failing audit");
                if let Err(fail_err) = self.store.fail_audit(&audit.id, &e.to_string()).await {
                    error!(audit = %audit.id, error = %fail_err, "Could not mark audit failed");
                }
                return Err(e);
            }
        };
        let policy = manifest.policy();

        let walker = TreeWalker::new(
            self.provider.as_ref(),
            &target.owner,
            &target.name,
            self.options.walk.clone(),
        );
        let walk = walker.walk_roots(&self.options.source_roots).await;

        let total_files = walk.files.len();
        let cap = self.options.max_files.min(total_files);
        let (selected, beyond_cap) = walk.files.split_at(cap);
        if !beyond_cap.is_empty() {
            info!(
                analyzed = selected.len(),
                skipped = beyond_cap.len(),
                "Candidate list capped"
            );
        }

        let scanner = ViolationScanner::from_config(&self.config).with_local_modules(walk.module_names());
        debug!(detectors = ?scanner.detector_keys(), "Scanner ready");

        let mut analyzed_files = Vec::new();
        let mut failed_files = Vec::new();
        let mut violations = Vec::new();
        let mut compliant_files = 0;

        let provider = self.provider.as_ref();
        let branches = &self.options.branches;
        let mut fetches = stream::iter(selected.iter().map(|path| async move {
            let result =
                fetch_with_fallback(provider, &target.owner, &target.name, path, branches).await;
            (path, result)
        }))
        .buffered(self.options.concurrency);

        while let Some((path, result)) = fetches.next().await {
            let content = match result {
                Ok(Some(content)) => content,
                Ok(None) => {
                    debug!(file = %path, "File not found on any branch, skipping");
                    failed_files.push(path.clone());
                    continue;
                }
                Err(e) => {
                    warn!(file = %path, error = %e, "Failed to fetch file, skipping");
                    failed_files.push(path.clone());
                    continue;
                }
            };

            let hits = scanner.scan(&content, &policy);
            debug!(file = %path, hits = hits.len(), "File scanned");
            if hits.is_empty() {
                compliant_files += 1;
            }
            for hit in &hits {
                match self
                    .store
                    .log_violation(NewViolation::from_hit(&audit, path, hit))
                    .await
                {
                    Ok(violation) => violations.push(violation),
                    Err(e) => {
                        warn!(file = %path, line = hit.line_number, error = %e, "Failed to record violation");
                    }
                }
            }
            analyzed_files.push(path.clone());
        }

        let audit = self
            .store
            .complete_audit(&audit.id, total_files, violations.len(), compliant_files)
            .await?;
        info!(
            total_files,
            analyzed = analyzed_files.len(),
            compliant_files,
            violations = violations.len(),
            "Audit completed"
        );

        Ok(AuditReport {
            repository,
            audit,
            manifest: manifest.path,
            policy,
            violations,
            analyzed_files,
            failed_files,
            skipped_files: beyond_cap.to_vec(),
            truncated: !beyond_cap.is_empty(),
            unreadable_dirs: walk.unreadable_dirs.clone(),
        })
    }
}
