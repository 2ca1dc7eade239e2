//! Network calls without nearby error handling

use lazy_static::lazy_static;
use regex::Regex;

use crate::rules::engine::{Detector, ScanContext, SourceFile};
use crate::rules::patterns::is_comment_line;
use crate::rules::{Category, ScanHit, Severity};

lazy_static! {
    static ref NETWORK_CALL: Regex = Regex::new(
        r"(?i)(\b(requests|httpx|aiohttp|urllib3|session|client|http|axios)\.(get|post|put|patch|delete|head|request|urlopen|fetch)\s*\(|\burlopen\s*\(|\bfetch\s*\()"
    ).unwrap();

    static ref ERROR_HANDLING: Regex = Regex::new(r"(?i)(catch|try|error|except)").unwrap();

    static ref DEFINITION: Regex =
        Regex::new(r"^\s*(?:async\s+)?(?:def|function)\s").unwrap();
}

/// A network or API call with no catch/try/error/except on the same line or
/// within the lookahead window after it.
pub struct MissingErrorHandling;

impl Detector for MissingErrorHandling {
    fn key(&self) -> &'static str {
        "errors/network-call"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let line = source.lines[index];
        if is_comment_line(line) || DEFINITION.is_match(line) {
            return None;
        }
        let call = NETWORK_CALL.find(line)?;

        let handled = ERROR_HANDLING.is_match(line)
            || source
                .following(index, ctx.error_lookahead)
                .iter()
                .any(|next| ERROR_HANDLING.is_match(next));
        if handled {
            return None;
        }

        let call = call.as_str().trim_end_matches(|c: char| c == '(' || c.is_whitespace());
        Some(ScanHit::new(
            "ERR001",
            index + 1,
            Category::ErrorHandling,
            Severity::Medium,
            format!("Network call '{call}' has no error handling"),
        ))
    }
}
