//! Import statement recognition for Python and JavaScript sources

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PY_IMPORT: Regex = Regex::new(r"^\s*import\s+([\w.]+(?:\s+as\s+\w+)?(?:\s*,\s*[\w.]+(?:\s+as\s+\w+)?)*)\s*(?:#.*)?$").unwrap();
    static ref PY_FROM_IMPORT: Regex = Regex::new(r"^\s*from\s+(\.*)([\w.]*)\s+import\s+(.+)$").unwrap();
    static ref JS_IMPORT: Regex = Regex::new(r#"^\s*import\s+(?:[\w*{}\s,$]+\s+from\s+)?['"]([^'"]+)['"]"#).unwrap();
    static ref JS_REQUIRE: Regex = Regex::new(r#"\brequire\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap();
}

/// Source syntax an import was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSyntax {
    Python,
    JavaScript,
}

/// A recognized import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement {
    pub syntax: ImportSyntax,
    /// Full module paths as written (`os.path`, `@scope/pkg/sub`)
    pub modules: Vec<String>,
    /// Names pulled from the module by `from x import a, b`
    pub names: Vec<String>,
    /// Relative import (`from . import x`, `./util`)
    pub relative: bool,
}

impl ImportStatement {
    /// Top-level package of each module (`os.path` → `os`, `@scope/pkg/x` → `@scope/pkg`)
    pub fn top_level_modules(&self) -> Vec<String> {
        let mut tops: Vec<String> = Vec::new();
        for module in &self.modules {
            let top = top_level(module, self.syntax);
            if !top.is_empty() && !tops.contains(&top) {
                tops.push(top);
            }
        }
        tops
    }
}

fn top_level(module: &str, syntax: ImportSyntax) -> String {
    match syntax {
        ImportSyntax::Python => module.split('.').next().unwrap_or(module).to_string(),
        ImportSyntax::JavaScript => {
            let mut parts = module.split('/');
            match (parts.next(), parts.next()) {
                (Some(scope), Some(name)) if scope.starts_with('@') => format!("{scope}/{name}"),
                (Some(first), _) => first.to_string(),
                _ => module.to_string(),
            }
        }
    }
}

/// Recognize an import statement on a single line.
pub fn parse_import(line: &str) -> Option<ImportStatement> {
    if let Some(caps) = JS_IMPORT.captures(line) {
        let module = caps[1].to_string();
        let relative = module.starts_with('.') || module.starts_with('/');
        return Some(ImportStatement {
            syntax: ImportSyntax::JavaScript,
            modules: vec![module],
            names: Vec::new(),
            relative,
        });
    }

    if let Some(caps) = PY_FROM_IMPORT.captures(line) {
        let dots = &caps[1];
        let module = caps[2].to_string();
        let names = caps[3]
            .split('#')
            .next()
            .unwrap_or_default()
            .split(',')
            .map(|n| {
                n.trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace())
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
            .filter(|n| !n.is_empty())
            .collect();
        return Some(ImportStatement {
            syntax: ImportSyntax::Python,
            modules: if module.is_empty() {
                Vec::new()
            } else {
                vec![module]
            },
            names,
            relative: !dots.is_empty(),
        });
    }

    if let Some(caps) = PY_IMPORT.captures(line) {
        let modules = caps[1]
            .split(',')
            .filter_map(|part| part.split_whitespace().next())
            .map(str::to_string)
            .collect();
        return Some(ImportStatement {
            syntax: ImportSyntax::Python,
            modules,
            names: Vec::new(),
            relative: false,
        });
    }

    if let Some(caps) = JS_REQUIRE.captures(line) {
        let module = caps[1].to_string();
        let relative = module.starts_with('.') || module.starts_with('/');
        return Some(ImportStatement {
            syntax: ImportSyntax::JavaScript,
            modules: vec![module],
            names: Vec::new(),
            relative,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_python_plain_import() {
        let stmt = parse_import("import os, sys as system, os.path").unwrap();
        assert_eq!(stmt.syntax, ImportSyntax::Python);
        assert_eq!(stmt.modules, vec!["os", "sys", "os.path"]);
        assert_eq!(stmt.top_level_modules(), vec!["os", "sys"]);
        assert!(!stmt.relative);
    }

    #[test]
    fn test_python_import_alias() {
        let stmt = parse_import("import tensorflow as tf  # model").unwrap();
        assert_eq!(stmt.top_level_modules(), vec!["tensorflow"]);
    }

    #[test]
    fn test_python_from_import() {
        let stmt = parse_import("from sklearn.model_selection import (train_test_split, KFold)").unwrap();
        assert_eq!(stmt.modules, vec!["sklearn.model_selection"]);
        assert_eq!(stmt.names, vec!["train_test_split", "KFold"]);
        assert_eq!(stmt.top_level_modules(), vec!["sklearn"]);
    }

    #[test]
    fn test_python_relative_import() {
        let stmt = parse_import("from . import views").unwrap();
        assert!(stmt.relative);
        assert!(stmt.modules.is_empty());
        assert_eq!(stmt.names, vec!["views"]);

        let stmt = parse_import("from ..models import User as U").unwrap();
        assert!(stmt.relative);
        assert_eq!(stmt.names, vec!["User"]);
    }

    #[test]
    fn test_javascript_imports() {
        let stmt = parse_import("import React, { useState } from 'react';").unwrap();
        assert_eq!(stmt.syntax, ImportSyntax::JavaScript);
        assert_eq!(stmt.top_level_modules(), vec!["react"]);

        let stmt = parse_import("import '@scope/widgets/button.css';").unwrap();
        assert_eq!(stmt.top_level_modules(), vec!["@scope/widgets"]);

        let stmt = parse_import("const fs = require('fs');").unwrap();
        assert_eq!(stmt.top_level_modules(), vec!["fs"]);

        let stmt = parse_import("import { helper } from './helper';").unwrap();
        assert!(stmt.relative);
    }

    #[test]
    fn test_non_imports() {
        assert!(parse_import("# import os").is_none());
        assert!(parse_import("important = True").is_none());
        assert!(parse_import("x = 'import os'").is_none());
        assert!(parse_import("").is_none());
    }
}
