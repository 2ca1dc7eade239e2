//! Hardcoded value detection patterns

use lazy_static::lazy_static;
use regex::Regex;

/// A pattern for detecting a hardcoded value
pub struct HardcodedPattern {
    pub name: &'static str,
    pub description: &'static str,
    pub regex: Regex,
    /// Extra check on the matched text, for patterns that over-match
    pub validate: Option<fn(&str) -> bool>,
}

impl HardcodedPattern {
    /// First match in `line` that passes validation
    pub fn find<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex
            .find_iter(line)
            .map(|m| m.as_str())
            .find(|text| self.validate.map_or(true, |check| check(text)))
    }
}

/// Minimum Shannon entropy (bits per char) for a quoted token to count as a secret
const TOKEN_ENTROPY_THRESHOLD: f64 = 3.5;

/// Shannon entropy of a string in bits per character
pub fn shannon_entropy(text: &str) -> f64 {
    let len = text.chars().count();
    if len == 0 {
        return 0.0;
    }
    let mut counts = std::collections::HashMap::new();
    for c in text.chars() {
        *counts.entry(c).or_insert(0usize) += 1;
    }
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / len as f64;
            -p * p.log2()
        })
        .sum()
}

fn is_high_entropy_token(quoted: &str) -> bool {
    let token = quoted.trim_matches(|c| c == '"' || c == '\'');
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    let has_alpha = token.chars().any(|c| c.is_ascii_alphabetic());
    has_digit && has_alpha && shannon_entropy(token) >= TOKEN_ENTROPY_THRESHOLD
}

lazy_static! {
    /// Hardcoded value patterns, most specific first. The first match names the hit.
    pub static ref HARDCODED_PATTERNS: Vec<HardcodedPattern> = vec![
        HardcodedPattern {
            name: "Private key",
            description: "PEM encoded private key material",
            regex: Regex::new(r"-----BEGIN (RSA |DSA |EC |OPENSSH )?PRIVATE KEY-----").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "GitHub token",
            description: "GitHub tokens start with 'ghp_', 'gho_', 'ghu_', 'ghs_' or 'ghr_'",
            regex: Regex::new(r"gh[pousr]_[A-Za-z0-9]{36}").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "AWS access key ID",
            description: "AWS access keys start with 'AKIA'",
            regex: Regex::new(r"AKIA[0-9A-Z]{16}").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Stripe secret key",
            description: "Stripe secret keys start with 'sk_live_' or 'sk_test_'",
            regex: Regex::new(r"[sr]k_(live|test)_[0-9a-zA-Z]{24,}").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "API secret key",
            description: "Secret keys of the form 'sk-...'",
            regex: Regex::new(r"\bsk-[A-Za-z0-9]{20,}").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Slack token",
            description: "Slack tokens start with 'xox'",
            regex: Regex::new(r"xox[baprs]-[0-9a-zA-Z-]{10,48}").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Google API key",
            description: "Google API keys start with 'AIza'",
            regex: Regex::new(r"AIza[0-9A-Za-z\-_]{35}").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Bearer token",
            description: "Authorization header value embedded in source",
            regex: Regex::new(r"(?i)\bbearer\s+[A-Za-z0-9\-_.=]{16,}").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "JWT",
            description: "JSON Web Token embedded in source",
            regex: Regex::new(r"eyJ[A-Za-z0-9_=-]{10,}\.eyJ[A-Za-z0-9_=-]+\.[A-Za-z0-9_.+/=-]*").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Database connection string",
            description: "Connection URL for a database or broker",
            regex: Regex::new(r"(?i)\b(postgres(ql)?|mysql|mariadb|mongodb(\+srv)?|redis|amqp|mssql)://[^\s'\x22]+").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Credential assignment",
            description: "Password, secret, key or token assigned a literal value",
            regex: Regex::new(r#"(?i)\w*(password|passwd|pwd|secret|api[_-]?key|apikey|access[_-]?key|auth[_-]?token|token)\w*['"]?\s*[:=]\s*[fbr]?['"][^'"\s]{4,}['"]"#).unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Loopback or private IP address",
            description: "Network address literal tied to one environment",
            regex: Regex::new(r"\b(127\.0\.0\.1|0\.0\.0\.0|10\.\d{1,3}\.\d{1,3}\.\d{1,3}|192\.168\.\d{1,3}\.\d{1,3}|172\.(1[6-9]|2\d|3[01])\.\d{1,3}\.\d{1,3})\b").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Localhost hostname",
            description: "Loopback hostname literal",
            regex: Regex::new(r#"['"/@]localhost\b"#).unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Embedded URL",
            description: "Service endpoint written into source",
            regex: Regex::new(r#"\bhttps?://[^\s'"<>)]+"#).unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Absolute file path",
            description: "Filesystem location tied to one machine layout",
            regex: Regex::new(r#"['"](/(var|etc|usr|home|opt|tmp|srv|root|mnt|data|backup|Users)(/[^'"\s]*)?|[A-Za-z]:\\[^'"]*)['"]"#).unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "Long numeric literal",
            description: "Account, phone or size value written inline",
            regex: Regex::new(r"\b\d{6,}\b").unwrap(),
            validate: None,
        },
        HardcodedPattern {
            name: "High-entropy token",
            description: "Quoted string that looks like a generated credential",
            regex: Regex::new(r#"['"][A-Za-z0-9+/_\-]{32,}={0,2}['"]"#).unwrap(),
            validate: Some(is_high_entropy_token),
        },
    ];
}
