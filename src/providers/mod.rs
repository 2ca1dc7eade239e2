//! # Providers Module
//!
//! Repository content providers: the narrow read interface the audit engine
//! consumes to list directories and fetch file bodies.
//!
//! - [`github`] - GitHub REST contents API
//! - [`local`] - A checkout on the local filesystem
//!
//! ## Examples
//!
//! ```rust,no_run
//! use complyscan::providers::{fetch_with_fallback, local::LocalProvider};
//!
//! # async fn run() -> Result<(), complyscan::error::ProviderError> {
//! let provider = LocalProvider::new(".");
//! let branches = vec!["main".to_string(), "master".to_string()];
//! let readme = fetch_with_fallback(&provider, "local", "repo", "README.md", &branches).await?;
//! println!("README present: {}", readme.is_some());
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod local;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::ProviderError;

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (last path segment)
    pub name: String,
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self::with_kind(path.into(), EntryKind::File)
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self::with_kind(path.into(), EntryKind::Dir)
    }

    fn with_kind(path: String, kind: EntryKind) -> Self {
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Self { name, path, kind }
    }
}

/// Read access to repository content.
#[async_trait::async_trait]
pub trait ContentProvider: Send + Sync {
    /// Fetch a file body at `branch`. `Ok(None)` means the file does not exist.
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>, ProviderError>;

    /// List one directory level. `path` is `""` for the repository root.
    async fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, ProviderError>;
}

/// Fetch a file trying each branch in order; the first hit wins.
///
/// A transport error on one branch does not stop the next one from being
/// tried. When no branch has the file and at least one failed, the last
/// error is returned so callers can tell "absent" from "unreachable".
pub async fn fetch_with_fallback(
    provider: &dyn ContentProvider,
    owner: &str,
    repo: &str,
    path: &str,
    branches: &[String],
) -> Result<Option<String>, ProviderError> {
    let mut last_error = None;

    for branch in branches {
        match provider.get_file_content(owner, repo, path, branch).await {
            Ok(Some(content)) => return Ok(Some(content)),
            Ok(None) => debug!(path, branch = %branch, "Not found on branch"),
            Err(e) => {
                debug!(path, branch = %branch, error = %e, "Fetch failed on branch");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

/// A remote repository reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse `owner/name`, `github.com/owner/name` or a full GitHub URL.
    pub fn parse(input: &str) -> Result<Self, ProviderError> {
        let invalid = || ProviderError::InvalidRepository {
            name: input.to_string(),
        };
        let trimmed = input.trim();

        let path = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|_| invalid())?;
            url.path().to_string()
        } else {
            trimmed
                .strip_prefix("github.com/")
                .unwrap_or(trimmed)
                .to_string()
        };

        let mut parts = path.trim_matches('/').split('/');
        let owner = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let name = parts
            .next()
            .map(|s| s.trim_end_matches(".git"))
            .filter(|s| !s.is_empty())
            .ok_or_else(invalid)?;

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Canonical web URL of the repository
    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}
