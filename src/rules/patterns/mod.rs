//! Shared detection patterns

pub mod hardcoded;
pub mod imports;
pub mod stdlib;

pub use hardcoded::HARDCODED_PATTERNS;
pub use imports::{parse_import, ImportStatement, ImportSyntax};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Stub vocabulary, matched against comment text only
    static ref STUB_COMMENT: Regex = Regex::new(
        r"(?i)\b(todo|fixme|stub(bed)?|mock(ed)?|placeholder|not implemented|hack|xxx|dummy|fake)\b"
    ).unwrap();

    /// Explicit not-implemented raise, matched against code with strings blanked
    static ref NOT_IMPLEMENTED: Regex =
        Regex::new(r"\braise\s+NotImplementedError\b").unwrap();

    static ref THROW_ERROR: Regex = Regex::new(r"\bthrow\s+new\s+Error\(").unwrap();

    static ref NOT_IMPLEMENTED_MESSAGE: Regex = Regex::new(
        r"(?i)\bthrow\s+new\s+Error\(\s*['\x22`]not implemented"
    ).unwrap();

    /// Deferred-work annotation that suppresses hardcoded value reports
    pub static ref DEFERRED_MARKER: Regex = Regex::new(r"\b(TODO|FIXME)\b").unwrap();
}

/// A line split into its code and trailing comment, with string literal
/// contents blanked out of the code part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLine {
    pub code: String,
    pub comment: Option<String>,
}

/// Split a line into code and comment. Quote characters are kept and the
/// characters between them dropped, so `x = "a#b"  # note` yields code
/// `x = ""  ` and comment `# note`.
pub fn split_line(line: &str) -> SplitLine {
    let mut code = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut chars = line.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    code.push(c);
                    quote = None;
                }
            }
            None => {
                let starts_comment =
                    c == '#' || (c == '/' && matches!(chars.peek(), Some((_, '/' | '*'))));
                if starts_comment {
                    return SplitLine {
                        code,
                        comment: Some(line[idx..].to_string()),
                    };
                }
                if c == '"' || c == '\'' || c == '`' {
                    quote = Some(c);
                }
                code.push(c);
            }
        }
    }

    SplitLine {
        code,
        comment: None,
    }
}

/// Whether the line carries a stub marker comment or raises a
/// not-implemented error. String literal contents never count.
pub fn has_stub_marker(line: &str) -> bool {
    let split = split_line(line);
    if split
        .comment
        .as_deref()
        .is_some_and(|comment| STUB_COMMENT.is_match(comment))
    {
        return true;
    }
    NOT_IMPLEMENTED.is_match(&split.code)
        || (THROW_ERROR.is_match(&split.code) && NOT_IMPLEMENTED_MESSAGE.is_match(line))
}

/// Whether the trimmed line is nothing but a comment
pub fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_blanks_strings() {
        let split = split_line(r#"x = "a#b"  # note"#);
        assert_eq!(split.code, r#"x = ""  "#);
        assert_eq!(split.comment.as_deref(), Some("# note"));
    }

    #[test]
    fn test_split_line_handles_escapes_and_slashes() {
        let split = split_line(r#"url = 'http://x\'y' // trailing"#);
        assert_eq!(split.code, "url = '' ");
        assert_eq!(split.comment.as_deref(), Some("// trailing"));
    }

    #[test]
    fn test_split_line_without_comment() {
        let split = split_line("total = price * 1.2");
        assert_eq!(split.code, "total = price * 1.2");
        assert!(split.comment.is_none());
    }

    #[test]
    fn test_split_line_block_comment() {
        let split = split_line("const user = null; /* stub */");
        assert_eq!(split.code, "const user = null; ");
        assert_eq!(split.comment.as_deref(), Some("/* stub */"));
    }

    #[test]
    fn test_stub_marker() {
        assert!(has_stub_marker("def login(): pass  # TODO: real auth"));
        assert!(has_stub_marker("return db.query(sql) // mock data"));
        assert!(has_stub_marker("return db.query(sql) /* placeholder */"));
        assert!(has_stub_marker("    raise NotImplementedError"));
        assert!(has_stub_marker("  throw new Error('Not implemented yet');"));
        assert!(!has_stub_marker("stub = make_stub()"));
        assert!(!has_stub_marker("session.commit()"));
    }

    #[test]
    fn test_stub_marker_ignores_string_contents() {
        assert!(!has_stub_marker("rows = db.query('https://api.example.com/todo/list')"));
        assert!(!has_stub_marker("LOGIN_URL = 'https://sso.example.com/login/mock-free'"));
        assert!(!has_stub_marker(r#"msg = "raise NotImplementedError""#));
        assert!(!has_stub_marker(r#"throw new Error("lookup failed: todo list missing")"#));
    }

    #[test]
    fn test_is_comment_line() {
        assert!(is_comment_line("   # comment"));
        assert!(is_comment_line("// comment"));
        assert!(!is_comment_line("x = 1  # comment"));
    }
}
