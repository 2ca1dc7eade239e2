//! Configuration module

pub mod loader;

pub use loader::Config;

use serde::{Deserialize, Serialize};

/// Per-detector configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RuleConfig {
    /// Whether the detector is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Severity override (low, medium, high, critical)
    pub severity: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Tree walking and analysis bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum recursion depth per source root
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Number of candidate files actually fetched and scanned per audit
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Upper bound on candidates collected by the walker
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Concurrent file fetches within one audit (1 = sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Conventional source roots, walked in order ("" is the repository root)
    #[serde(default = "default_source_roots")]
    pub source_roots: Vec<String>,

    /// File extensions eligible for scanning (without the dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never descended into
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    /// Glob patterns of candidate paths to drop
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Lines inspected after a network call when looking for error handling
    #[serde(default = "default_error_lookahead")]
    pub error_lookahead: usize,
}

fn default_max_depth() -> usize {
    3
}

fn default_max_files() -> usize {
    15
}

fn default_max_candidates() -> usize {
    500
}

fn default_concurrency() -> usize {
    4
}

fn default_source_roots() -> Vec<String> {
    ["", "src", "app", "lib"].map(String::from).to_vec()
}

fn default_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

fn default_ignore_dirs() -> Vec<String> {
    [
        "node_modules",
        "__pycache__",
        "venv",
        "env",
        "build",
        "dist",
        "target",
        "site-packages",
        "coverage",
        "htmlcov",
    ]
    .map(String::from)
    .to_vec()
}

fn default_error_lookahead() -> usize {
    5
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_files: default_max_files(),
            max_candidates: default_max_candidates(),
            concurrency: default_concurrency(),
            source_roots: default_source_roots(),
            extensions: default_extensions(),
            ignore_dirs: default_ignore_dirs(),
            exclude: Vec::new(),
            error_lookahead: default_error_lookahead(),
        }
    }
}

/// Manifest lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Candidate manifest filenames at the repository root, tried in order
    #[serde(default = "default_manifest_filenames")]
    pub filenames: Vec<String>,

    /// Branches tried in order when fetching content
    #[serde(default = "default_branches")]
    pub branches: Vec<String>,
}

fn default_manifest_filenames() -> Vec<String> {
    ["requirements.txt", "Requirements.txt", "REQUIREMENTS.txt"]
        .map(String::from)
        .to_vec()
}

fn default_branches() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            filenames: default_manifest_filenames(),
            branches: default_branches(),
        }
    }
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Base URL of the REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Environment variable holding the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Audit store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON store (relative to the working directory, absolute, or `~/...`)
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    ".complyscan/store.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}
