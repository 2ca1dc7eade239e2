//! # Manifest Module
//!
//! Turns a requirements-style manifest into a [`DependencyPolicy`]: the set of
//! packages a repository declares (allowed) and the set it explicitly denies
//! (lines starting with `no ` or `forbidden `).
//!
//! ```rust
//! use complyscan::manifest::DependencyPolicy;
//!
//! let policy = DependencyPolicy::parse("flask\nnumpy==1.21.0\n# comment\nno tensorflow\n");
//! assert!(policy.is_allowed("flask"));
//! assert!(policy.is_allowed("numpy"));
//! assert!(policy.is_forbidden("tensorflow"));
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::ComplyScanError;
use crate::providers::{fetch_with_fallback, ContentProvider};

/// Case-insensitive keywords that turn a manifest line into a denial
const NEGATION_KEYWORDS: [&str; 2] = ["no ", "forbidden "];

lazy_static! {
    static ref PACKAGE_NAME: Regex = Regex::new(r"^[A-Za-z0-9._-]+").unwrap();
}

/// Import names whose distribution is published under a different name.
const IMPORT_ALIASES: &[(&str, &str)] = &[
    ("sklearn", "scikit-learn"),
    ("skimage", "scikit-image"),
    ("cv2", "opencv-python"),
    ("yaml", "pyyaml"),
    ("pil", "pillow"),
    ("bs4", "beautifulsoup4"),
    ("dateutil", "python-dateutil"),
    ("dotenv", "python-dotenv"),
    ("jwt", "pyjwt"),
    ("attr", "attrs"),
    ("magic", "python-magic"),
    ("serial", "pyserial"),
    ("usb", "pyusb"),
    ("crypto", "pycryptodome"),
    ("google", "google-api-python-client"),
    ("psycopg2", "psycopg2-binary"),
    ("mysqldb", "mysqlclient"),
    ("zmq", "pyzmq"),
];

/// Allow/deny dependency sets derived from one manifest snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyPolicy {
    /// Declared package names (normalized)
    pub allowed: BTreeSet<String>,
    /// Explicitly denied package names (normalized)
    pub forbidden: BTreeSet<String>,
}

impl DependencyPolicy {
    /// Parse manifest text.
    pub fn parse(content: &str) -> Self {
        let mut policy = Self::default();

        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = strip_negation(line) {
                let name = strip_inline_comment(rest).trim();
                if !name.is_empty() {
                    policy.forbidden.insert(normalize_name(name));
                }
                continue;
            }

            // Options such as `-r base.txt` or `--index-url ...`
            if line.starts_with('-') {
                continue;
            }

            if let Some(m) = PACKAGE_NAME.find(line) {
                policy.allowed.insert(normalize_name(m.as_str()));
            }
        }

        debug!(
            allowed = policy.allowed.len(),
            forbidden = policy.forbidden.len(),
            "Parsed dependency manifest"
        );
        policy
    }

    /// Whether the package is declared in the manifest
    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed.contains(&normalize_name(name))
    }

    /// Whether the package is explicitly denied
    pub fn is_forbidden(&self, name: &str) -> bool {
        self.forbidden.contains(&normalize_name(name))
    }

    /// Whether an import's top-level module maps to a declared package,
    /// either directly or through a well-known distribution alias.
    pub fn is_declared(&self, module: &str) -> bool {
        if self.is_allowed(module) {
            return true;
        }
        let key = normalize_name(module);
        IMPORT_ALIASES
            .iter()
            .filter(|(import, _)| *import == key)
            .any(|(_, dist)| self.allowed.contains(*dist))
    }

    /// Whether an import's top-level module is denied, directly or by alias
    pub fn denies(&self, module: &str) -> bool {
        if self.is_forbidden(module) {
            return true;
        }
        let key = normalize_name(module);
        IMPORT_ALIASES
            .iter()
            .filter(|(import, _)| *import == key)
            .any(|(_, dist)| self.forbidden.contains(*dist))
    }
}

/// Normalize a package or module name: lowercase, `_` and `.` folded to `-`.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(['_', '.'], "-")
}

fn strip_negation(line: &str) -> Option<&str> {
    let lower = line.to_lowercase();
    NEGATION_KEYWORDS
        .iter()
        .find(|kw| lower.starts_with(*kw))
        .and_then(|kw| line.get(kw.len()..))
        .map(str::trim)
}

fn strip_inline_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or(line)
}

/// Manifest content located in a repository
#[derive(Debug, Clone)]
pub struct ManifestSource {
    /// Filename that matched
    pub path: String,
    /// Raw manifest text
    pub content: String,
}

impl ManifestSource {
    pub fn policy(&self) -> DependencyPolicy {
        DependencyPolicy::parse(&self.content)
    }
}

/// Locate the manifest at the repository root.
///
/// Each candidate filename is tried in order, each on the branch fallback
/// order; the first hit wins.
///
/// # Errors
///
/// Returns [`ComplyScanError::ManifestNotFound`] when no candidate exists and
/// [`ComplyScanError::Provider`] when a lookup failed at the transport level
/// and no later candidate succeeded.
pub async fn locate_manifest(
    provider: &dyn ContentProvider,
    owner: &str,
    repo: &str,
    filenames: &[String],
    branches: &[String],
) -> Result<ManifestSource, ComplyScanError> {
    let mut last_error = None;

    for name in filenames {
        match fetch_with_fallback(provider, owner, repo, name, branches).await {
            Ok(Some(content)) => {
                debug!(manifest = %name, "Manifest located");
                return Ok(ManifestSource {
                    path: name.clone(),
                    content,
                });
            }
            Ok(None) => continue,
            Err(e) => {
                debug!(manifest = %name, error = %e, "Manifest lookup failed");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(e.into()),
        None => Err(ComplyScanError::ManifestNotFound {
            tried: filenames.to_vec(),
        }),
    }
}
