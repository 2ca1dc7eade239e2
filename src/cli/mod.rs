//! # CLI Module
//!
//! This module defines the command-line interface for complyscan using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `audit` | Audit a repository against its dependency manifest |
//! | `policy` | Show the allow/deny policy parsed from the manifest |
//! | `history` | List past audits and their violations |
//! | `init` | Write a default configuration file |
//!
//! ## Submodules
//!
//! - [`commands`] - Command implementations
//! - [`exit_codes`] - Standardized exit codes
//! - [`output`] - Report output formatters (JSON, Markdown, Terminal)
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//! - `--log-format <text|json>` - Log line format on stderr
//!
//! ## Examples
//!
//! ```bash
//! # Audit a GitHub repository
//! complyscan audit octocat/hello-world
//!
//! # Audit a local checkout and write a Markdown report
//! complyscan audit --path ./service --format markdown -o audit.md
//!
//! # Show recent audits
//! complyscan history octocat/hello-world --limit 5
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use commands::{AuditArgs, HistoryArgs, InitArgs, PolicyArgs};
use crate::config::Config;
use crate::error::ConfigError;

/// complyscan - Audit repository code against its declared dependency manifest
#[derive(Parser, Debug)]
#[command(name = "complyscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load the configuration named by `-c`, or the default file, or defaults
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        match &self.config {
            Some(path) => Config::load_from_file(path),
            None => Config::load_or_default(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit a repository against its dependency manifest
    Audit(AuditArgs),

    /// Show the dependency policy parsed from a repository's manifest
    Policy(PolicyArgs),

    /// List past audits of a repository
    History(HistoryArgs),

    /// Write a default configuration file
    Init(InitArgs),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
