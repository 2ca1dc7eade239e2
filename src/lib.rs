//! complyscan Library
//!
//! This crate provides the core functionality for auditing a repository's
//! source code against the dependencies its manifest declares and a fixed
//! catalogue of code policy rules.
//!
//! - [`manifest`] - Locate and parse the dependency manifest
//! - [`walker`] - Bounded discovery of candidate source files
//! - [`rules`] - Line-oriented violation detectors
//! - [`store`] - Persistence of repositories, audits and violations
//! - [`audit`] - The orchestrator tying one audit run together

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod providers;
pub mod rules;
pub mod store;
pub mod walker;

pub use cli::exit_codes;
pub use error::ComplyScanError;
