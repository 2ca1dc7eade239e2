//! Hardcoded sensitive value detection

use crate::rules::engine::{Detector, ScanContext, SourceFile};
use crate::rules::patterns::{is_comment_line, DEFERRED_MARKER, HARDCODED_PATTERNS};
use crate::rules::{Category, ScanHit, Severity};

/// Secrets, environment-bound addresses and literals written into source.
///
/// Lines annotated with TODO or FIXME are skipped: the author already marked
/// the value for replacement.
pub struct HardcodedValue;

impl Detector for HardcodedValue {
    fn key(&self) -> &'static str {
        "hardcoded/values"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let line = source.lines[index];
        if is_comment_line(line) || DEFERRED_MARKER.is_match(line) {
            return None;
        }

        let pattern = HARDCODED_PATTERNS.iter().find(|p| p.find(line).is_some())?;
        Some(ScanHit::new(
            "HCV001",
            index + 1,
            Category::HardcodedValues,
            Severity::Medium,
            format!("Hardcoded {}: {}", pattern.name.to_lowercase(), pattern.description),
        ))
    }
}
