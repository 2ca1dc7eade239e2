//! Code quality detectors

use lazy_static::lazy_static;
use regex::Regex;

use crate::rules::engine::{Detector, ScanContext, SourceFile};
use crate::rules::patterns::{is_comment_line, parse_import, split_line};
use crate::rules::{Category, ScanHit, Severity};

lazy_static! {
    static ref EMPTY_EXPORTS: Vec<Regex> = vec![
        // def handler(request): pass
        Regex::new(r"^\s*(?:async\s+)?def\s+\w+\s*\([^)]*\)\s*(?:->\s*[^:]+)?:\s*(?:pass|\.\.\.)\s*(?:#.*)?$").unwrap(),
        // export default function Page() {}
        Regex::new(r"^\s*(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s*\w*\s*\([^)]*\)\s*\{\s*\}\s*;?\s*$").unwrap(),
        // export const Widget = () => null;
        Regex::new(r"^\s*export\s+(?:default\s+)?(?:const|let|var)\s+\w+\s*=\s*\([^)]*\)\s*=>\s*(?:null|\{\s*\}|<>\s*</>)\s*;?\s*$").unwrap(),
        // export default () => null;
        Regex::new(r"^\s*export\s+default\s+(?:null|\{\s*\}|\([^)]*\)\s*=>\s*(?:null|\{\s*\}))\s*;?\s*$").unwrap(),
    ];

    static ref DEBUG_STATEMENTS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?:^|[^.\w])print\s*\(").unwrap(), "print()"),
        (Regex::new(r"\bconsole\.(?:log|debug|trace|dir|table)\s*\(").unwrap(), "console.log()"),
        (Regex::new(r"\bi?pdb\.set_trace\s*\(").unwrap(), "pdb.set_trace()"),
        (Regex::new(r"^\s*import\s+i?pdb\b").unwrap(), "pdb import"),
        (Regex::new(r"(?:^|[^.\w])breakpoint\s*\(\s*\)").unwrap(), "breakpoint()"),
        (Regex::new(r"^\s*debugger\s*;?\s*$").unwrap(), "debugger statement"),
    ];

    static ref CONSTANT_DEFINITION: Regex = Regex::new(
        r"^\s*(?:(?:export\s+)?(?:const|final|static)\s+|[A-Z][A-Z0-9_]*\s*(?::[^=]+)?=[^=])"
    ).unwrap();

    static ref NUMERIC_LITERAL: Regex = Regex::new(r"(?:^|[^\w.])(\d+(?:\.\d+)?)\b").unwrap();
}

/// Literals common enough to need no name
const TRIVIAL_NUMBERS: &[&str] = &["0", "1", "2", "0.0", "1.0", "0.5"];

/// A function or component that does nothing
pub struct EmptyExport;

impl Detector for EmptyExport {
    fn key(&self) -> &'static str {
        "quality/empty-export"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let line = source.lines[index];
        if !EMPTY_EXPORTS.iter().any(|re| re.is_match(line)) {
            return None;
        }
        Some(ScanHit::new(
            "QUAL001",
            index + 1,
            Category::CodeQuality,
            Severity::Low,
            "Empty function or component has no effect",
        ))
    }
}

/// Diagnostic output left in source
pub struct DebugLogging;

impl Detector for DebugLogging {
    fn key(&self) -> &'static str {
        "quality/debug-logging"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let code = split_line(source.lines[index]).code;
        let (_, statement) = DEBUG_STATEMENTS.iter().find(|(re, _)| re.is_match(&code))?;
        Some(ScanHit::new(
            "QUAL002",
            index + 1,
            Category::DebugCode,
            Severity::Low,
            format!("Debug statement left in code: {statement}"),
        ))
    }
}

/// Numeric literal with no name and no explanation
pub struct MagicNumber;

impl Detector for MagicNumber {
    fn key(&self) -> &'static str {
        "quality/magic-numbers"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let line = source.lines[index];
        if is_comment_line(line) || CONSTANT_DEFINITION.is_match(line) || parse_import(line).is_some()
        {
            return None;
        }
        let split = split_line(line);
        if split.comment.is_some() {
            return None;
        }

        let number = NUMERIC_LITERAL
            .captures_iter(&split.code)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|n| !TRIVIAL_NUMBERS.contains(n))?;

        Some(ScanHit::new(
            "QUAL003",
            index + 1,
            Category::MagicNumbers,
            Severity::Low,
            format!("Magic number {number} should be a named constant"),
        ))
    }
}
