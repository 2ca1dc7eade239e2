//! Import policy detectors

use std::collections::HashMap;

use crate::rules::engine::{looks_binary, Detector, ScanContext, SourceFile};
use crate::rules::patterns::stdlib::is_python_stdlib;
use crate::rules::patterns::{parse_import, ImportStatement, ImportSyntax};
use crate::rules::{Category, ScanHit, Severity};

/// Import of a package the manifest explicitly denies
pub struct ForbiddenImport;

impl Detector for ForbiddenImport {
    fn key(&self) -> &'static str {
        "imports/forbidden"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let stmt = parse_import(source.lines[index])?;
        if stmt.relative {
            return None;
        }
        let denied: Vec<String> = stmt
            .top_level_modules()
            .into_iter()
            .filter(|m| ctx.policy.denies(m))
            .collect();
        if denied.is_empty() {
            return None;
        }

        Some(ScanHit::new(
            "IMP001",
            index + 1,
            Category::ForbiddenImports,
            Severity::High,
            format!("Import of forbidden package {}", quoted_list(&denied)),
        ))
    }
}

/// Python import of a third-party package the manifest never declares
pub struct UnauthorizedImport;

impl UnauthorizedImport {
    fn is_unauthorized(module: &str, ctx: &ScanContext<'_>) -> bool {
        !is_python_stdlib(module)
            && !ctx.local_modules.contains(module)
            && !ctx.policy.is_declared(module)
            // Reported by the forbidden detector instead
            && !ctx.policy.denies(module)
    }
}

impl Detector for UnauthorizedImport {
    fn key(&self) -> &'static str {
        "imports/unauthorized"
    }

    fn check_line(
        &self,
        index: usize,
        source: &SourceFile<'_>,
        ctx: &ScanContext<'_>,
    ) -> Option<ScanHit> {
        let stmt = parse_import(source.lines[index])?;
        if stmt.relative || stmt.syntax != ImportSyntax::Python {
            return None;
        }
        let undeclared: Vec<String> = stmt
            .top_level_modules()
            .into_iter()
            .filter(|m| Self::is_unauthorized(m, ctx))
            .collect();
        if undeclared.is_empty() {
            return None;
        }

        Some(ScanHit::new(
            "IMP002",
            index + 1,
            Category::ForbiddenImports,
            Severity::High,
            format!(
                "Import of {} which is not declared in the manifest",
                quoted_list(&undeclared)
            ),
        ))
    }
}

/// Same module imported more than once in a file
pub struct DuplicateImport;

impl DuplicateImport {
    /// What an import statement brings into scope, one key per binding
    fn binding_keys(stmt: &ImportStatement) -> Vec<String> {
        let prefix = if stmt.relative { "." } else { "" };
        if stmt.names.is_empty() {
            stmt.modules
                .iter()
                .map(|m| format!("{prefix}{m}"))
                .collect()
        } else {
            let module = stmt.modules.first().map(String::as_str).unwrap_or_default();
            stmt.names
                .iter()
                .map(|n| format!("{prefix}{module}:{n}"))
                .collect()
        }
    }
}

impl Detector for DuplicateImport {
    fn key(&self) -> &'static str {
        "imports/duplicate"
    }

    fn scan(&self, source: &SourceFile<'_>, _ctx: &ScanContext<'_>) -> Vec<ScanHit> {
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut hits = Vec::new();

        for (index, line) in source.lines.iter().enumerate() {
            if looks_binary(line) {
                continue;
            }
            let Some(stmt) = parse_import(line) else {
                continue;
            };

            let mut duplicate: Option<(String, usize)> = None;
            for key in Self::binding_keys(&stmt) {
                match first_seen.get(&key) {
                    Some(&first) if duplicate.is_none() => duplicate = Some((key, first)),
                    Some(_) => {}
                    None => {
                        first_seen.insert(key, index + 1);
                    }
                }
            }

            if let Some((key, first)) = duplicate {
                let shown = key.replace(':', ".");
                hits.push(ScanHit::new(
                    "IMP003",
                    index + 1,
                    Category::CodeQuality,
                    Severity::Low,
                    format!("Duplicate import of '{shown}' (first imported on line {first})"),
                ));
            }
        }

        hits
    }
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::detectors::testing::run;
    use crate::rules::engine::{ScanContext, DEFAULT_ERROR_LOOKAHEAD};
    use crate::manifest::DependencyPolicy;
    use std::collections::BTreeSet;

    #[test]
    fn test_forbidden_import() {
        let hits = run(&ForbiddenImport, "import os\nimport tensorflow as tf\n", "no tensorflow");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line_number, 2);
        assert_eq!(hits[0].rule_id, "IMP001");
        assert!(hits[0].description.contains("'tensorflow'"));
    }

    #[test]
    fn test_forbidden_import_normalized_and_aliased() {
        let hits = run(&ForbiddenImport, "from sklearn import svm\n", "forbidden scikit_learn");
        assert_eq!(hits.len(), 1);

        let hits = run(&ForbiddenImport, "import Flask_Login\n", "no flask-login");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_forbidden_applies_to_javascript() {
        let hits = run(&ForbiddenImport, "const _ = require('lodash');\n", "no lodash");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_unauthorized_import() {
        let content = "import os\nimport requests\nimport tensorflow\nfrom . import views\n";
        let hits = run(&UnauthorizedImport, content, "requests\n");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line_number, 3);
        assert_eq!(hits[0].rule_id, "IMP002");
    }

    #[test]
    fn test_unauthorized_skips_denied_and_aliases() {
        assert!(run(&UnauthorizedImport, "import tensorflow\n", "no tensorflow").is_empty());
        assert!(run(&UnauthorizedImport, "import yaml\nimport cv2\n", "PyYAML\nopencv-python").is_empty());
        assert!(run(&UnauthorizedImport, "import React from 'react';\n", "").is_empty());
    }

    #[test]
    fn test_unauthorized_skips_local_modules() {
        let policy = DependencyPolicy::parse("");
        let local: BTreeSet<String> = ["utils".to_string()].into_iter().collect();
        let ctx = ScanContext {
            policy: &policy,
            local_modules: &local,
            error_lookahead: DEFAULT_ERROR_LOOKAHEAD,
        };
        let source = SourceFile::new("from utils.helpers import slugify\n");
        assert!(UnauthorizedImport.scan(&source, &ctx).is_empty());
    }

    #[test]
    fn test_duplicate_import() {
        let content = "\
import os
from typing import List
import json
import os
from typing import Dict
from typing import List
";
        let hits = run(&DuplicateImport, content, "");
        let lines: Vec<usize> = hits.iter().map(|h| h.line_number).collect();
        assert_eq!(lines, vec![4, 6]);
        assert!(hits[0].description.contains("'os'"));
        assert!(hits[0].description.contains("line 1"));
        assert!(hits[1].description.contains("'typing.List'"));
    }

    #[test]
    fn test_duplicate_reported_once_per_line() {
        let hits = run(&DuplicateImport, "import os, sys\nimport os, sys\n", "");
        assert_eq!(hits.len(), 1);
    }
}
