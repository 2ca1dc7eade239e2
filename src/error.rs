//! Error types for complyscan
//!
//! This module defines custom error types using `thiserror` for better error handling
//! and more descriptive error messages throughout the application.

use thiserror::Error;

/// Main error type for complyscan
#[derive(Error, Debug)]
pub enum ComplyScanError {
    /// No recognized manifest file at the repository root
    #[error("No manifest found (tried: {})", tried.join(", "))]
    ManifestNotFound {
        /// Candidate filenames that were looked up, in order
        tried: Vec<String>,
    },

    /// Content provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Persistence gateway errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Audit id prefix matched zero or several audits
    #[error("Audit id '{prefix}' matches {matches} audits")]
    AmbiguousAuditId {
        /// The prefix given on the command line
        prefix: String,
        /// Number of matching audits
        matches: usize,
    },

    /// Failed to write report output
    #[error("Failed to write '{path}': {source}")]
    Output {
        /// Destination path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Errors raised by a content provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (connection, TLS, timeout)
    #[error("Network error while requesting '{url}': {message}")]
    Network {
        /// Requested URL or path
        url: String,
        /// Transport error description
        message: String,
    },

    /// Remote API rate limit exhausted
    #[error("Rate limited by remote API{}", reset.map(|r| format!(" (resets at {r})")).unwrap_or_default())]
    RateLimited {
        /// Unix timestamp at which the limit resets, when advertised
        reset: Option<i64>,
    },

    /// Unexpected HTTP status
    #[error("HTTP {status} for '{url}'")]
    Http {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Path rejected before any request was made
    #[error("Invalid path '{path}'")]
    InvalidPath {
        /// The offending path
        path: String,
    },

    /// Repository reference could not be parsed
    #[error("Invalid repository reference '{name}' (expected owner/name)")]
    InvalidRepository {
        /// The offending reference
        name: String,
    },

    /// Response body could not be decoded
    #[error("Failed to decode response for '{url}': {message}")]
    Decode {
        /// Requested URL or path
        url: String,
        /// Decoder error description
        message: String,
    },

    /// Local filesystem read failure
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path that failed to read
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Input rejected before reaching the persistence backend
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty
    #[error("Field '{field}' must not be empty")]
    Empty {
        /// Field name
        field: &'static str,
    },

    /// Field exceeds its length bound
    #[error("Field '{field}' is {len} characters long (max {max})")]
    TooLong {
        /// Field name
        field: &'static str,
        /// Maximum allowed length
        max: usize,
        /// Actual length
        len: usize,
    },

    /// Field contains control characters
    #[error("Field '{field}' contains control characters")]
    ControlCharacters {
        /// Field name
        field: &'static str,
    },

    /// Field contains characters outside its allowed charset
    #[error("Field '{field}' contains invalid characters: '{value}'")]
    InvalidCharacters {
        /// Field name
        field: &'static str,
        /// Offending value
        value: String,
    },

    /// Identifier is not a well-formed token
    #[error("Malformed identifier for '{field}': '{value}'")]
    InvalidIdentifier {
        /// Field name
        field: &'static str,
        /// Offending value
        value: String,
    },
}

/// Errors raised by the persistence gateway
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Input failed validation, nothing was written
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced record does not exist
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Record kind (repository, audit)
        kind: &'static str,
        /// Requested id
        id: String,
    },

    /// Audit is already in a terminal state
    #[error("Audit '{id}' is {status}, expected pending")]
    AuditNotPending {
        /// Audit id
        id: String,
        /// Current status
        status: String,
    },

    /// Backing file could not be read or written
    #[error("Failed to access store '{path}': {source}")]
    Io {
        /// Store file path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Store snapshot could not be (de)serialized
    #[error("Store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the config file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize configuration
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid glob pattern in `exclude`
    #[error("Invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Parser error description
        message: String,
    },
}

impl From<toml::de::Error> for ComplyScanError {
    fn from(err: toml::de::Error) -> Self {
        ComplyScanError::Config(ConfigError::Parse(err))
    }
}

impl From<ValidationError> for ComplyScanError {
    fn from(err: ValidationError) -> Self {
        ComplyScanError::Persistence(PersistenceError::Validation(err))
    }
}
