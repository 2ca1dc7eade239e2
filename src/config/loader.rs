//! Configuration loader

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::rules::Severity;

use super::{AnalysisConfig, GitHubConfig, ManifestConfig, RuleConfig, StoreConfig};

pub const CONFIG_FILENAME: &str = ".complyscan.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Walk and analysis bounds
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Manifest lookup
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// GitHub provider settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Audit store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Detector overrides keyed by detector key (e.g. "style/naming")
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Load the first config file found in the working directory, then the
    /// home directory, or defaults
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let mut candidates = vec![PathBuf::from(CONFIG_FILENAME)];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(CONFIG_FILENAME));
        }
        Self::load_first(&candidates)
    }

    fn load_first(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content)?;
        // Surface bad globs at load time rather than mid-audit
        config.exclude_matcher()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(Into::into)
    }

    /// Check if a detector is enabled
    pub fn is_rule_enabled(&self, key: &str) -> bool {
        self.rules.get(key).map(|r| r.enabled).unwrap_or(true)
    }

    /// Get the severity override for a detector, ignoring unparseable values
    pub fn rule_severity(&self, key: &str) -> Option<Severity> {
        self.rules
            .get(key)
            .and_then(|r| r.severity.as_deref())
            .and_then(Severity::from_string)
    }

    /// Compile the `analysis.exclude` globs
    pub fn exclude_matcher(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.analysis.exclude {
            let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| ConfigError::InvalidPattern {
            pattern: self.analysis.exclude.join(", "),
            message: e.to_string(),
        })
    }

    /// Resolve the store path against the working directory
    pub fn store_path(&self) -> PathBuf {
        resolve_path(&self.store.path)
    }
}

fn resolve_path(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.max_depth, 3);
        assert_eq!(config.analysis.max_files, 15);
        assert_eq!(config.manifest.branches, vec!["main", "master"]);
        assert_eq!(config.manifest.filenames[0], "requirements.txt");
        assert!(config.is_rule_enabled("hardcoded/values"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml_content = r#"
[analysis]
max_files = 40
extensions = ["py", "pyi"]

[rules."style/naming"]
enabled = false

[rules."security/dynamic-eval"]
severity = "high"
"#;
        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.analysis.max_files, 40);
        assert_eq!(config.analysis.max_depth, 3);
        assert_eq!(config.analysis.extensions, vec!["py", "pyi"]);
        assert!(!config.is_rule_enabled("style/naming"));
        assert!(config.is_rule_enabled("security/dynamic-eval"));
        assert_eq!(
            config.rule_severity("security/dynamic-eval"),
            Some(Severity::High)
        );
        assert_eq!(config.rule_severity("style/naming"), None);
    }

    #[test]
    fn test_exclude_matcher() {
        let mut config = Config::default();
        config.analysis.exclude = vec!["**/tests/**".to_string(), "*_pb2.py".to_string()];
        let matcher = config.exclude_matcher().unwrap();
        assert!(matcher.is_match("src/tests/test_app.py"));
        assert!(matcher.is_match("api_pb2.py"));
        assert!(!matcher.is_match("src/app.py"));
    }

    #[test]
    fn test_invalid_exclude_pattern_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[analysis]\nexclude = [\"src/[unclosed\"]\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.analysis.source_roots, config.analysis.source_roots);
        assert_eq!(parsed.github.api_url, "https://api.github.com");
    }

    #[test]
    fn test_load_first_prefers_earlier_candidates() {
        let work = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        let local = work.path().join(CONFIG_FILENAME);
        let global = home.path().join(CONFIG_FILENAME);
        fs::write(&global, "[analysis]\nmax_files = 40\n").unwrap();

        let config = Config::load_first(&[local.clone(), global.clone()]).unwrap();
        assert_eq!(config.analysis.max_files, 40);

        fs::write(&local, "[analysis]\nmax_files = 7\n").unwrap();
        let config = Config::load_first(&[local, global]).unwrap();
        assert_eq!(config.analysis.max_files, 7);

        let config = Config::load_first(&[work.path().join("absent.toml")]).unwrap();
        assert_eq!(config.analysis.max_files, 15);
    }

    #[test]
    fn test_store_path_expands_home() {
        let mut config = Config::default();
        config.store.path = "~/audits/store.json".to_string();
        let resolved = config.store_path();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolved, home.join("audits/store.json"));
        }
    }
}
