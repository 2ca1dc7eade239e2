//! Violation scanner
//!
//! Runs the detector battery over one file's text and returns the hits in
//! line order. Scanning is pure: no I/O, no shared state between files.

use std::collections::BTreeSet;
use tracing::{debug, trace};

use super::detectors::all_detectors;
use super::results::{ScanHit, Severity};
use crate::config::Config;
use crate::manifest::DependencyPolicy;

/// Default number of lines searched after a network call for error handling
pub const DEFAULT_ERROR_LOOKAHEAD: usize = 5;

/// File text split into lines once, shared by every detector
pub struct SourceFile<'a> {
    pub content: &'a str,
    pub lines: Vec<&'a str>,
}

impl<'a> SourceFile<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            lines: content.lines().collect(),
        }
    }

    /// Lines following `index`, at most `count` of them
    pub fn following(&self, index: usize, count: usize) -> &[&'a str] {
        let start = (index + 1).min(self.lines.len());
        let end = (start + count).min(self.lines.len());
        &self.lines[start..end]
    }
}

/// Per-scan inputs shared by every detector
pub struct ScanContext<'a> {
    pub policy: &'a DependencyPolicy,
    /// Top-level module names that belong to the repository itself
    pub local_modules: &'a BTreeSet<String>,
    pub error_lookahead: usize,
}

/// A single violation detector.
///
/// Line-oriented detectors implement [`Detector::check_line`] and keep the
/// default [`Detector::scan`]. Detectors that need per-file state override
/// `scan` instead.
pub trait Detector: Send + Sync {
    /// Configuration key (e.g. "imports/forbidden")
    fn key(&self) -> &'static str;

    /// Check one line; `index` is 0-based
    fn check_line(
        &self,
        _index: usize,
        _source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        None
    }

    /// Scan a whole file
    fn scan(&self, source: &SourceFile<'_>, ctx: &ScanContext<'_>) -> Vec<ScanHit> {
        (0..source.lines.len())
            .filter(|&index| !looks_binary(source.lines[index]))
            .filter_map(|index| self.check_line(index, source, ctx))
            .collect()
    }
}

/// Lines carrying NUL or replacement characters never match anything
pub fn looks_binary(line: &str) -> bool {
    line.contains('\0') || line.contains('\u{FFFD}')
}

struct Registered {
    detector: Box<dyn Detector>,
    severity: Option<Severity>,
}

/// Runs the registered detectors over file content
pub struct ViolationScanner {
    detectors: Vec<Registered>,
    local_modules: BTreeSet<String>,
    error_lookahead: usize,
}

impl Default for ViolationScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ViolationScanner {
    /// Scanner with every detector enabled at its default severity
    pub fn new() -> Self {
        Self {
            detectors: all_detectors()
                .into_iter()
                .map(|detector| Registered {
                    detector,
                    severity: None,
                })
                .collect(),
            local_modules: BTreeSet::new(),
            error_lookahead: DEFAULT_ERROR_LOOKAHEAD,
        }
    }

    /// Scanner honoring the `[rules]` and `[analysis]` configuration
    pub fn from_config(config: &Config) -> Self {
        let detectors = all_detectors()
            .into_iter()
            .filter(|d| {
                let enabled = config.is_rule_enabled(d.key());
                if !enabled {
                    debug!(detector = d.key(), "Detector disabled by configuration");
                }
                enabled
            })
            .map(|detector| Registered {
                severity: config.rule_severity(detector.key()),
                detector,
            })
            .collect();

        Self {
            detectors,
            local_modules: BTreeSet::new(),
            error_lookahead: config.analysis.error_lookahead,
        }
    }

    /// Module names that resolve inside the repository
    pub fn with_local_modules(mut self, modules: impl IntoIterator<Item = String>) -> Self {
        self.local_modules = modules.into_iter().collect();
        self
    }

    /// Keys of the active detectors, in registration order
    pub fn detector_keys(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|r| r.detector.key()).collect()
    }

    /// Scan file content against a dependency policy.
    ///
    /// Hits are sorted by line number; hits on the same line keep detector
    /// registration order.
    pub fn scan(&self, content: &str, policy: &DependencyPolicy) -> Vec<ScanHit> {
        let source = SourceFile::new(content);
        let ctx = ScanContext {
            policy,
            local_modules: &self.local_modules,
            error_lookahead: self.error_lookahead,
        };

        let mut hits = Vec::new();
        for registered in &self.detectors {
            let found = registered.detector.scan(&source, &ctx);
            trace!(
                detector = registered.detector.key(),
                hits = found.len(),
                "Detector finished"
            );
            hits.extend(found.into_iter().map(|mut hit| {
                if let Some(severity) = registered.severity {
                    hit.severity = severity;
                }
                hit
            }));
        }

        // Stable: same-line hits stay in detector order
        hits.sort_by_key(|hit| hit.line_number);
        hits
    }
}
