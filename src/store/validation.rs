//! Input validation applied before any store write

use url::Url;

use super::models::NewViolation;
use crate::error::ValidationError;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PATH_LEN: usize = 1024;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_URL_LEN: usize = 2048;
/// Hex digits in a SHA-256 id
pub const ID_LEN: usize = 64;

/// Non-empty, bounded, free of control characters
pub fn validate_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, max, len });
    }
    if value.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacters { field });
    }
    Ok(())
}

/// Repository owner or name: GitHub's charset, at most 100 characters
pub fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    validate_text(field, value, MAX_NAME_LEN)?;
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid || value == "." || value == ".." {
        return Err(ValidationError::InvalidCharacters {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Absolute http(s) or file URL
pub fn validate_url(value: &str) -> Result<(), ValidationError> {
    validate_text("url", value, MAX_URL_LEN)?;
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https" | "file") => Ok(()),
        _ => Err(ValidationError::InvalidCharacters {
            field: "url",
            value: value.to_string(),
        }),
    }
}

pub fn validate_path(value: &str) -> Result<(), ValidationError> {
    validate_text("file_path", value, MAX_PATH_LEN)
}

pub fn validate_description(field: &'static str, value: &str) -> Result<(), ValidationError> {
    validate_text(field, value, MAX_DESCRIPTION_LEN)
}

/// Lowercase hex token of the expected length
pub fn validate_id(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let well_formed = value.len() == ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
    if !well_formed {
        return Err(ValidationError::InvalidIdentifier {
            field,
            value: value.chars().take(ID_LEN + 8).collect(),
        });
    }
    Ok(())
}

pub fn validate_new_violation(violation: &NewViolation) -> Result<(), ValidationError> {
    validate_id("audit_id", &violation.audit_id)?;
    validate_id("repository_id", &violation.repository_id)?;
    validate_path(&violation.file_path)?;
    validate_text("rule_id", &violation.rule_id, MAX_NAME_LEN)?;
    validate_description("description", &violation.description)?;
    if violation.line_number == Some(0) {
        return Err(ValidationError::InvalidIdentifier {
            field: "line_number",
            value: "0".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Category, Severity};

    const ID: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_validate_name() {
        assert!(validate_name("owner", "octo-cat_1.x").is_ok());
        assert_eq!(
            validate_name("owner", ""),
            Err(ValidationError::Empty { field: "owner" })
        );
        assert!(matches!(
            validate_name("name", &"a".repeat(101)),
            Err(ValidationError::TooLong { max: 100, len: 101, .. })
        ));
        assert!(matches!(
            validate_name("name", "repo name"),
            Err(ValidationError::InvalidCharacters { .. })
        ));
        assert!(matches!(
            validate_name("name", ".."),
            Err(ValidationError::InvalidCharacters { .. })
        ));
    }

    #[test]
    fn test_control_characters_rejected() {
        assert_eq!(
            validate_path("src/app.py\u{0007}"),
            Err(ValidationError::ControlCharacters { field: "file_path" })
        );
        assert_eq!(
            validate_description("description", "line one\nline two"),
            Err(ValidationError::ControlCharacters {
                field: "description"
            })
        );
    }

    #[test]
    fn test_length_bounds() {
        assert!(validate_path(&"p".repeat(1024)).is_ok());
        assert!(validate_path(&"p".repeat(1025)).is_err());
        assert!(validate_description("description", &"d".repeat(2000)).is_ok());
        assert!(validate_description("description", &"d".repeat(2001)).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://github.com/octocat/hello").is_ok());
        assert!(validate_url("file:///tmp/checkout").is_ok());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("ftp://example.com/x").is_err());
        let long = format!("https://example.com/{}", "a".repeat(2048));
        assert!(matches!(
            validate_url(&long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("audit_id", ID).is_ok());
        assert!(validate_id("audit_id", &ID.to_uppercase()).is_err());
        assert!(validate_id("audit_id", &ID[..63]).is_err());
        assert!(validate_id("audit_id", "../../etc/passwd").is_err());
    }

    #[test]
    fn test_validate_new_violation() {
        let mut violation = NewViolation {
            audit_id: ID.to_string(),
            repository_id: ID.to_string(),
            file_path: "src/app.py".to_string(),
            line_number: Some(3),
            rule_id: "IMP002".to_string(),
            category: Category::ForbiddenImports,
            severity: Severity::High,
            description: "Import of 'tensorflow'".to_string(),
        };
        assert!(validate_new_violation(&violation).is_ok());

        violation.line_number = Some(0);
        assert!(validate_new_violation(&violation).is_err());

        violation.line_number = None;
        violation.audit_id = "nope".to_string();
        assert!(validate_new_violation(&violation).is_err());
    }
}
