//! Formatting and naming detectors

use lazy_static::lazy_static;
use regex::Regex;

use crate::rules::engine::{looks_binary, Detector, ScanContext, SourceFile};
use crate::rules::patterns::split_line;
use crate::rules::{Category, ScanHit, Severity};

lazy_static! {
    static ref EMPTY_CONTROL_BLOCK: Regex = Regex::new(
        r"^\s*(?:\}\s*)?(?:(?:else\s+)?(?:if|for|while|switch|catch)\s*\(.*\)|else|try|finally|do)\s*\{\s*\}\s*;?\s*$"
    ).unwrap();

    static ref CATCH_ALL_EXCEPT: Regex = Regex::new(
        r"^(\s*)except\s*(?:\(?\s*(?:Exception|BaseException)\s*\)?(?:\s+as\s+\w+)?)?\s*:\s*(pass)?\s*$"
    ).unwrap();

    static ref CAMEL_CASE_DEF: Regex = Regex::new(r"^\s*(?:async\s+)?def\s+([a-z][a-z0-9]*[A-Z]\w*)\s*\(").unwrap();
    static ref CAMEL_CASE_ASSIGN: Regex = Regex::new(r"^\s*([a-z][a-z0-9]*[A-Z][A-Za-z0-9]*)\s*=[^=]").unwrap();
    static ref LOWERCASE_CLASS: Regex = Regex::new(r"^\s*class\s+([a-z]\w*)\s*[(:{]").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndentStyle {
    Tabs,
    Spaces,
}

impl IndentStyle {
    fn name(self) -> &'static str {
        match self {
            Self::Tabs => "tabs",
            Self::Spaces => "spaces",
        }
    }
}

/// Tabs and spaces mixed on a line, or against the file's first indentation
pub struct MixedIndentation;

impl Detector for MixedIndentation {
    fn key(&self) -> &'static str {
        "style/indentation"
    }

    fn scan(&self, source: &SourceFile<'_>, _ctx: &ScanContext<'_>) -> Vec<ScanHit> {
        let mut established: Option<IndentStyle> = None;
        let mut hits = Vec::new();

        for (index, line) in source.lines.iter().enumerate() {
            if line.trim().is_empty() || looks_binary(line) {
                continue;
            }
            let indent: &str = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
            if indent.is_empty() {
                continue;
            }

            let has_tabs = indent.contains('\t');
            let has_spaces = indent.contains(' ');
            let description = if has_tabs && has_spaces {
                Some("Indentation mixes tabs and spaces".to_string())
            } else {
                let style = if has_tabs {
                    IndentStyle::Tabs
                } else {
                    IndentStyle::Spaces
                };
                match established {
                    None => {
                        established = Some(style);
                        None
                    }
                    Some(file_style) if file_style != style => Some(format!(
                        "Indentation uses {} but the file uses {}",
                        style.name(),
                        file_style.name()
                    )),
                    Some(_) => None,
                }
            };

            if let Some(description) = description {
                hits.push(ScanHit::new(
                    "STY001",
                    index + 1,
                    Category::Indentation,
                    Severity::Low,
                    description,
                ));
            }
        }

        hits
    }
}

/// Doubled terminators, empty control blocks and swallowed exceptions
pub struct StatementTerminators;

impl StatementTerminators {
    /// Whether the body of the `except` header at `index` is a lone `pass`
    fn swallows_exception(source: &SourceFile<'_>, index: usize, header_indent: usize) -> bool {
        let mut body = source
            .following(index, source.lines.len())
            .iter()
            .filter(|l| {
                let trimmed = l.trim();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            });

        match body.next() {
            Some(first) if first.trim() == "pass" => match body.next() {
                Some(after) => indent_width(after) <= header_indent,
                None => true,
            },
            _ => false,
        }
    }
}

impl Detector for StatementTerminators {
    fn key(&self) -> &'static str {
        "style/terminators"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let code = split_line(source.lines[index]).code;

        let description = if has_double_terminator(&code) {
            "Double statement terminator ';;'"
        } else if EMPTY_CONTROL_BLOCK.is_match(&code) {
            "Empty block after control statement"
        } else if let Some(caps) = CATCH_ALL_EXCEPT.captures(&code) {
            let same_line_pass = caps.get(2).is_some();
            let indent = caps.get(1).map_or(0, |m| indent_width(m.as_str()));
            if same_line_pass || Self::swallows_exception(source, index, indent) {
                "Exception silently swallowed: 'except' block only contains 'pass'"
            } else {
                return None;
            }
        } else {
            return None;
        };

        Some(ScanHit::new(
            "STY002",
            index + 1,
            Category::Syntax,
            Severity::Medium,
            description,
        ))
    }
}

fn has_double_terminator(code: &str) -> bool {
    // for (;;) is a loop header, not a doubled terminator
    let without_loops = code.replace("(;;)", "");
    let compact: String = without_loops.chars().filter(|c| !c.is_whitespace()).collect();
    compact.contains(";;")
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// camelCase functions and variables, lowercase classes
pub struct NamingConvention;

impl Detector for NamingConvention {
    fn key(&self) -> &'static str {
        "style/naming"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        _ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let line = source.lines[index];

        let description = if let Some(caps) = CAMEL_CASE_DEF.captures(line) {
            format!("Function '{}' uses camelCase; use snake_case", &caps[1])
        } else if let Some(caps) = LOWERCASE_CLASS.captures(line) {
            format!("Class '{}' should use PascalCase", &caps[1])
        } else if let Some(caps) = CAMEL_CASE_ASSIGN.captures(line) {
            format!("Variable '{}' uses camelCase; use snake_case", &caps[1])
        } else {
            return None;
        };

        Some(ScanHit::new(
            "STY003",
            index + 1,
            Category::NamingConventions,
            Severity::Low,
            description,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::detectors::testing::{lines, run};

    #[test]
    fn test_mixed_indentation_on_line() {
        let content = "def f():\n\t    return 1\n";
        let hits = run(&MixedIndentation, content, "");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].description, "Indentation mixes tabs and spaces");
    }

    #[test]
    fn test_indentation_against_file_style() {
        let content = "def f():\n    a = 1\n\tb = 2\n    return a\n";
        let hits = run(&MixedIndentation, content, "");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line_number, 3);
        assert_eq!(
            hits[0].description,
            "Indentation uses tabs but the file uses spaces"
        );
    }

    #[test]
    fn test_consistent_indentation() {
        assert!(lines(&MixedIndentation, "if x:\n\ty()\n\t\tz()\n").is_empty());
    }

    #[test]
    fn test_double_terminator() {
        let content = "\
let a = 1;;
for (;;) { tick(); }
const s = ';;';
x = 1; ;
";
        assert_eq!(lines(&StatementTerminators, content), vec![1, 4]);
    }

    #[test]
    fn test_empty_control_block() {
        let content = "\
if (ready) {}
} else {}
while (poll()) { }
if x == {}:
options = {}
";
        assert_eq!(lines(&StatementTerminators, content), vec![1, 2, 3]);
    }

    #[test]
    fn test_except_pass() {
        let content = "\
try:
    risky()
except:
    pass
try:
    other()
except Exception as exc:
    pass
    log(exc)
try:
    third()
except ValueError:
    pass
try:
    fourth()
except Exception: pass
";
        assert_eq!(lines(&StatementTerminators, content), vec![3, 16]);
    }

    #[test]
    fn test_naming_conventions() {
        let content = "\
def getData(url):
def get_data(url):
class userProfile:
class UserProfile(Base):
userName = 'x'
user_name = 'x'
MAX_SIZE = 10
if userName == other:
";
        assert_eq!(lines(&NamingConvention, content), vec![1, 3, 5]);
    }
}
