//! Unsafe dynamic evaluation

use lazy_static::lazy_static;
use regex::Regex;

use crate::rules::engine::{Detector, ScanContext, SourceFile};
use crate::rules::patterns::split_line;
use crate::rules::{Category, ScanHit, Severity};

lazy_static! {
    static ref UNSAFE_CONSTRUCTS: Vec<(Regex, &'static str)> = vec![
        // Method calls such as cursor.execute() or regex.exec() are not evaluation
        (Regex::new(r"(?:^|[^.\w])eval\s*\(").unwrap(), "eval()"),
        (Regex::new(r"(?:^|[^.\w])exec\s*\(").unwrap(), "exec()"),
        (Regex::new(r"\bnew\s+Function\s*\(").unwrap(), "new Function()"),
        (Regex::new(r"\.(?:inner|outer)HTML\s*=(?:[^=]|$)").unwrap(), "innerHTML assignment"),
        (Regex::new(r"\bdangerouslySetInnerHTML\b").unwrap(), "dangerouslySetInnerHTML"),
        (Regex::new(r"\bdocument\.write(?:ln)?\s*\(").unwrap(), "document.write()"),
    ];
}

/// eval/exec and HTML injection sinks
pub struct DynamicEvaluation;

impl Detector for DynamicEvaluation {
    fn key(&self) -> &'static str {
        "security/dynamic-eval"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let code = split_line(source.lines[index]).code;
        let (_, construct) = UNSAFE_CONSTRUCTS.iter().find(|(re, _)| re.is_match(&code))?;
        Some(ScanHit::new(
            "SEC001",
            index + 1,
            Category::Security,
            Severity::Critical,
            format!("Unsafe dynamic evaluation: {construct}"),
        ))
    }
}
