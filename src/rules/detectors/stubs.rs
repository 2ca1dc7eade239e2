//! Stubbed implementations left in place of real logic

use lazy_static::lazy_static;
use regex::Regex;

use crate::rules::engine::{Detector, ScanContext, SourceFile};
use crate::rules::patterns::has_stub_marker;
use crate::rules::{Category, ScanHit, Severity};

lazy_static! {
    static ref AUTH_VOCABULARY: Regex = Regex::new(
        r"(?i)(log_?in|log_?out|sign_?in|sign_?out|sign_?up|authenticat|authoriz|session|verify_?password|check_?password|current_?user|access_?token|auth_?token)"
    ).unwrap();

    static ref DATA_CALL: Regex = Regex::new(
        r"(?i)(\.(query|execute|executemany|fetch(one|all|many)?|find(_one|one)?|insert(_one|_many)?|update(_one|_many)?|delete(_one|_many)?|save|commit|aggregate|select|from_)\s*\(|\bfetch\s*\(|\baxios\.\w+\s*\()"
    ).unwrap();

    static ref BROKEN_NAV: Regex = Regex::new(
        r#"(?i)(\bhref|\bto|\bredirect(?:_to)?|\bnavigate|\blocation(?:\.href)?)\s*(?:=|\(|:)\s*\{?\s*['"](#|javascript:\s*void\(0\);?|todo|tbd|placeholder|)['"]"#
    ).unwrap();
}

/// Session or sign-in logic carrying a stub marker
pub struct StubbedAuthentication;

impl Detector for StubbedAuthentication {
    fn key(&self) -> &'static str {
        "stubs/authentication"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let line = source.lines[index];
        let term = AUTH_VOCABULARY.find(line)?;
        if !has_stub_marker(line) {
            return None;
        }
        Some(ScanHit::new(
            "AUTH001",
            index + 1,
            Category::Authentication,
            Severity::High,
            format!(
                "Authentication logic ('{}') is stubbed out",
                term.as_str().to_lowercase()
            ),
        ))
    }
}

/// Data-access call carrying a stub marker
pub struct StubbedDataCall;

impl Detector for StubbedDataCall {
    fn key(&self) -> &'static str {
        "stubs/data-layer"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let line = source.lines[index];
        if !DATA_CALL.is_match(line) || !has_stub_marker(line) {
            return None;
        }
        Some(ScanHit::new(
            "DATA001",
            index + 1,
            Category::General,
            Severity::Medium,
            "Data-layer call is stubbed or returns placeholder data",
        ))
    }
}

/// Link or redirect to nowhere
pub struct BrokenNavigation;

impl Detector for BrokenNavigation {
    fn key(&self) -> &'static str {
        "stubs/navigation"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let caps = BROKEN_NAV.captures(source.lines[index])?;
        let target = caps[2].split_whitespace().collect::<Vec<_>>().join(" ");
        Some(ScanHit::new(
            "NAV001",
            index + 1,
            Category::General,
            Severity::Low,
            format!("Broken navigation target: {} \"{target}\"", &caps[1]),
        ))
    }
}
