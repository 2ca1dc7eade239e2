//! Exit codes for the CLI
//!
//! Standard exit codes used by complyscan for CI/CD integration.
//!
//! # Exit Code Reference
//!
//! | Code | Constant | Meaning | Example |
//! |------|----------|---------|---------|
//! | 0 | `SUCCESS` | Success | Audit completed, no violations |
//! | 1 | `CRITICAL_ISSUES` | Blocking violations | Unsafe eval, forbidden import |
//! | 2 | `WARNINGS` | Non-blocking violations | Magic numbers, debug logging |
//! | 3 | `ERROR` | Runtime error | No manifest, network error |
//! | 4 | `INVALID_ARGS` | Invalid arguments | Malformed repository reference |

use crate::error::{ComplyScanError, ProviderError};
use crate::rules::Severity;

/// Success - audit completed without violations.
pub const SUCCESS: i32 = 0;

/// At least one high or critical violation.
pub const CRITICAL_ISSUES: i32 = 1;

/// Only low or medium violations.
pub const WARNINGS: i32 = 2;

/// Runtime error (no manifest, network failure, unreadable store, etc.).
pub const ERROR: i32 = 3;

/// Invalid arguments (malformed repository reference, bad path).
pub const INVALID_ARGS: i32 = 4;

/// Exit code for an audit whose worst violation has `max_severity`
pub fn for_severity(max_severity: Option<Severity>) -> i32 {
    match max_severity {
        None => SUCCESS,
        Some(s) if s >= Severity::High => CRITICAL_ISSUES,
        Some(_) => WARNINGS,
    }
}

/// Exit code for a command that failed
pub fn for_error(err: &ComplyScanError) -> i32 {
    match err {
        ComplyScanError::Provider(ProviderError::InvalidRepository { .. })
        | ComplyScanError::Provider(ProviderError::InvalidPath { .. })
        | ComplyScanError::AmbiguousAuditId { .. } => INVALID_ARGS,
        _ => ERROR,
    }
}
