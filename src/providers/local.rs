//! Local filesystem provider - audits a checkout on disk

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentProvider, DirEntry, EntryKind};
use crate::error::ProviderError;

/// Serves repository content from a directory. Branches are ignored.
pub struct LocalProvider {
    root: PathBuf,
}

impl LocalProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Join a repository-relative path onto the root, refusing escapes.
    fn resolve(&self, path: &str) -> Result<PathBuf, ProviderError> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(ProviderError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl ContentProvider for LocalProvider {
    async fn get_file_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _branch: &str,
    ) -> Result<Option<String>, ProviderError> {
        let full_path = self.resolve(path)?;
        if full_path.is_dir() {
            return Ok(None);
        }
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ProviderError::Io {
                path: path.to_string(),
                source: e,
            }),
        }
    }

    async fn list_directory(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
    ) -> Result<Vec<DirEntry>, ProviderError> {
        let dir = self.resolve(path)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| ProviderError::Io {
                path: path.to_string(),
                source: e.into(),
            })?;
            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                // Symlinks are not followed
                continue;
            };

            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            let entry_path = if path.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", path.trim_end_matches('/'), name)
            };

            entries.push(DirEntry {
                name: name.to_string(),
                path: entry_path,
                kind,
            });
        }

        Ok(entries)
    }
}
