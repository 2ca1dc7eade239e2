//! Detector battery

pub mod error_handling;
pub mod hardcoded;
pub mod imports;
pub mod quality;
pub mod security;
pub mod stubs;
pub mod style;

use super::engine::Detector;

/// Every detector, in registration order
pub fn all_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(imports::ForbiddenImport),
        Box::new(imports::UnauthorizedImport),
        Box::new(hardcoded::HardcodedValue),
        Box::new(stubs::StubbedAuthentication),
        Box::new(stubs::StubbedDataCall),
        Box::new(error_handling::MissingErrorHandling),
        Box::new(security::DynamicEvaluation),
        Box::new(quality::EmptyExport),
        Box::new(stubs::BrokenNavigation),
        Box::new(imports::DuplicateImport),
        Box::new(style::MixedIndentation),
        Box::new(style::StatementTerminators),
        Box::new(quality::DebugLogging),
        Box::new(quality::MagicNumber),
        Box::new(style::NamingConvention),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::BTreeSet;

    use crate::manifest::DependencyPolicy;
    use crate::rules::engine::{Detector, ScanContext, SourceFile, DEFAULT_ERROR_LOOKAHEAD};
    use crate::rules::ScanHit;

    /// Run one detector over `content` with the given manifest
    pub fn run(detector: &dyn Detector, content: &str, manifest: &str) -> Vec<ScanHit> {
        let policy = DependencyPolicy::parse(manifest);
        let local = BTreeSet::new();
        let ctx = ScanContext {
            policy: &policy,
            local_modules: &local,
            error_lookahead: DEFAULT_ERROR_LOOKAHEAD,
        };
        detector.scan(&SourceFile::new(content), &ctx)
    }

    /// Line numbers hit by one detector
    pub fn lines(detector: &dyn Detector, content: &str) -> Vec<usize> {
        run(detector, content, "")
            .into_iter()
            .map(|h| h.line_number)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_detector_keys_unique() {
        let detectors = all_detectors();
        let keys: HashSet<&str> = detectors.iter().map(|d| d.key()).collect();
        assert_eq!(keys.len(), detectors.len());
        assert_eq!(detectors.len(), 15);
    }

    #[test]
    fn test_descriptions_are_storable() {
        use crate::store::validation::validate_description;

        let content = "import\tos\nimport tensorflow\nimport os\n\
<a href=\t\"#\">Home</a>\n\
<a to=\t'javascript:\tvoid(0);'>x</a>\n\
def login(): pass\t# TODO\tstub\n\
rows = db.query(sql)\t// mock\n\
resp = requests.get(url)\n\
HOST = \"10.0.0.12\"\n\
result = eval(\tpayload)\n\
print(\"x\")\n\
timeout = retries * 3600\n\
def fetchData():\n\
\tindented = 1;\n";

        for detector in all_detectors() {
            for hit in testing::run(detector.as_ref(), content, "requests\nno tensorflow\n") {
                assert!(
                    validate_description("description", &hit.description).is_ok(),
                    "{} produced {:?}",
                    hit.rule_id,
                    hit.description
                );
            }
        }
    }
}
