//! # Scan Result Structures
//!
//! This module defines the closed taxonomy used by the violation scanner.
//!
//! ## Overview
//!
//! - [`Severity`] - Violation severity levels (Low, Medium, High, Critical)
//! - [`Category`] - Fixed violation categories
//! - [`ScanHit`] - A single detector hit at a line of a file
//!
//! ## Examples
//!
//! ```rust
//! use complyscan::rules::{Category, ScanHit, Severity};
//!
//! let hit = ScanHit::new(
//!     "IMP001",
//!     12,
//!     Category::ForbiddenImports,
//!     Severity::High,
//!     "Import of forbidden package 'tensorflow'",
//! );
//! assert_eq!(hit.category.as_str(), "forbidden_imports");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity levels for violations.
///
/// Ordered from least to most urgent, so `Severity::Critical > Severity::Low`.
///
/// # Examples
///
/// ```rust
/// use complyscan::rules::Severity;
///
/// assert_eq!(Severity::from_string("HIGH"), Some(Severity::High));
/// assert!(Severity::Critical > Severity::Medium);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style and hygiene issues.
    Low,
    /// Issues that should be addressed before release.
    Medium,
    /// Policy breaches such as undeclared dependencies.
    High,
    /// Exploitable issues such as dynamic code evaluation.
    Critical,
}

impl Severity {
    /// All severities, most urgent first
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed violation taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ForbiddenImports,
    HardcodedValues,
    Authentication,
    General,
    ErrorHandling,
    Security,
    CodeQuality,
    Indentation,
    Syntax,
    DebugCode,
    MagicNumbers,
    NamingConventions,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::ForbiddenImports,
        Category::HardcodedValues,
        Category::Authentication,
        Category::General,
        Category::ErrorHandling,
        Category::Security,
        Category::CodeQuality,
        Category::Indentation,
        Category::Syntax,
        Category::DebugCode,
        Category::MagicNumbers,
        Category::NamingConventions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForbiddenImports => "forbidden_imports",
            Self::HardcodedValues => "hardcoded_values",
            Self::Authentication => "authentication",
            Self::General => "general",
            Self::ErrorHandling => "error_handling",
            Self::Security => "security",
            Self::CodeQuality => "code_quality",
            Self::Indentation => "indentation",
            Self::Syntax => "syntax",
            Self::DebugCode => "debug_code",
            Self::MagicNumbers => "magic_numbers",
            Self::NamingConventions => "naming_conventions",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detector hit produced by the scanner.
///
/// Hits carry no file or audit identity; the orchestrator attaches those
/// when persisting them as violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanHit {
    /// Identifier of the detector rule (e.g. "IMP001")
    pub rule_id: &'static str,

    /// 1-based line number
    pub line_number: usize,

    pub category: Category,

    pub severity: Severity,

    /// Human-readable description of the hit
    pub description: String,
}

impl ScanHit {
    pub fn new(
        rule_id: &'static str,
        line_number: usize,
        category: Category,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            rule_id,
            line_number,
            category,
            severity,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_string() {
        assert_eq!(Severity::from_string("low"), Some(Severity::Low));
        assert_eq!(Severity::from_string("Medium"), Some(Severity::Medium));
        assert_eq!(Severity::from_string(" high "), Some(Severity::High));
        assert_eq!(Severity::from_string("CRITICAL"), Some(Severity::Critical));

        assert_eq!(Severity::from_string("warning"), None);
        assert_eq!(Severity::from_string(""), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_string(category.as_str()), Some(category));
        }
        assert_eq!(Category::from_string("unknown"), None);
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&Category::ForbiddenImports).unwrap();
        assert_eq!(json, "\"forbidden_imports\"");
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }
}
