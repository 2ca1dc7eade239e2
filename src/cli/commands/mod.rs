//! CLI commands module

pub mod audit;
pub mod history;
pub mod init;
pub mod policy;

use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::audit::AuditTarget;
use crate::config::Config;
use crate::error::ComplyScanError;
use crate::providers::github::GitHubProvider;
use crate::providers::local::LocalProvider;
use crate::providers::{ContentProvider, RepoRef};
use crate::store::{JsonFileStore, MemoryStore, PersistenceGateway};

/// Which repository a command works on
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// GitHub repository (owner/name or URL)
    #[arg(value_name = "REPOSITORY", conflicts_with = "path")]
    pub repository: Option<String>,

    /// Local checkout to read instead of GitHub (defaults to the working directory)
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,
}

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Include file lists in Markdown reports
    #[arg(long)]
    pub detailed: bool,

    /// Maximum number of files to analyze
    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Maximum directory depth per source root
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Concurrent file fetches
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Branches to try in order (repeatable)
    #[arg(short, long = "branch", value_name = "BRANCH")]
    pub branches: Vec<String>,

    /// Custom store file path
    #[arg(long, value_name = "FILE", conflicts_with = "no_store")]
    pub store: Option<PathBuf>,

    /// Keep results in memory only
    #[arg(long)]
    pub no_store: bool,
}

impl AuditArgs {
    /// Fold command-line overrides into the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(max_files) = self.max_files {
            config.analysis.max_files = max_files;
        }
        if let Some(max_depth) = self.max_depth {
            config.analysis.max_depth = max_depth;
        }
        if let Some(concurrency) = self.concurrency {
            config.analysis.concurrency = concurrency;
        }
        if !self.branches.is_empty() {
            config.manifest.branches = self.branches.clone();
        }
        if let Some(store) = &self.store {
            config.store.path = store.display().to_string();
        }
    }
}

/// Arguments for the policy command
#[derive(Args, Debug)]
pub struct PolicyArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format (terminal or json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Show the violations of one audit (full id or unique prefix)
    #[arg(long, value_name = "AUDIT_ID", conflicts_with = "delete")]
    pub show: Option<String>,

    /// Delete one audit and its violations (full id or unique prefix)
    #[arg(long, value_name = "AUDIT_ID")]
    pub delete: Option<String>,

    /// Number of audits to list
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,

    /// Output format (terminal or json)
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Custom store file path
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write the configuration to this path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
    Markdown,
}

/// Resolve the repository identity a source refers to
pub fn resolve_target(source: &SourceArgs) -> Result<AuditTarget, ComplyScanError> {
    match (&source.repository, &source.path) {
        (Some(repository), _) => Ok(AuditTarget::from(&RepoRef::parse(repository)?)),
        (None, Some(path)) => Ok(AuditTarget::local(path)?),
        (None, None) => Ok(AuditTarget::local(Path::new("."))?),
    }
}

/// Build the content provider and the audit target for a source
pub fn resolve_source(
    source: &SourceArgs,
    config: &Config,
) -> Result<(Arc<dyn ContentProvider>, AuditTarget), ComplyScanError> {
    let target = resolve_target(source)?;
    let provider: Arc<dyn ContentProvider> = match &source.repository {
        Some(_) => Arc::new(GitHubProvider::from_config(config)?),
        None => {
            let root = source.path.clone().unwrap_or_else(|| PathBuf::from("."));
            Arc::new(LocalProvider::new(root))
        }
    };
    Ok((provider, target))
}

/// Open the configured JSON store
pub async fn open_store(config: &Config) -> Result<Arc<JsonFileStore>, ComplyScanError> {
    Ok(Arc::new(JsonFileStore::open(config.store_path()).await?))
}

/// Open the configured store, or a throwaway in-memory one
pub async fn open_gateway(
    config: &Config,
    in_memory: bool,
) -> Result<Arc<dyn PersistenceGateway>, ComplyScanError> {
    let store: Arc<dyn PersistenceGateway> = if in_memory {
        Arc::new(MemoryStore::new())
    } else {
        open_store(config).await?
    };
    Ok(store)
}

/// Write rendered output to a file, or print it to stdout
pub fn emit(rendered: &str, output: Option<&Path>) -> Result<(), ComplyScanError> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| ComplyScanError::Output {
                path: path.display().to_string(),
                source: e,
            })?;
            eprintln!(
                "{} Report written to: {}",
                "Success:".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
