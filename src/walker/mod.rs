//! # Tree Walker
//!
//! Breadth-first, depth- and count-bounded traversal over a
//! [`ContentProvider`], collecting candidate source files by extension.
//!
//! Depth counts directory levels: `max_depth = 0` yields nothing and
//! `max_depth = 1` yields only the files directly inside the start path.
//! A directory that cannot be listed is logged, recorded in
//! [`WalkResult::unreadable_dirs`] and treated as empty.

use globset::GlobSet;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::Path;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::providers::{ContentProvider, EntryKind};

/// Traversal bounds and filters
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub max_depth: usize,
    pub max_candidates: usize,
    /// Extensions without the leading dot, compared case-insensitively
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub ignore_dirs: HashSet<String>,
    /// Candidate paths matching these globs are dropped
    pub exclude: GlobSet,
}

impl WalkOptions {
    pub fn from_config(analysis: &AnalysisConfig, exclude: GlobSet) -> Self {
        Self {
            max_depth: analysis.max_depth,
            max_candidates: analysis.max_candidates,
            extensions: analysis.extensions.clone(),
            ignore_dirs: analysis.ignore_dirs.iter().cloned().collect(),
            exclude,
        }
    }

    fn should_descend(&self, name: &str) -> bool {
        !name.starts_with('.') && !self.ignore_dirs.contains(name)
    }

    fn is_candidate(&self, path: &str) -> bool {
        let matches_extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);
        matches_extension && !self.exclude.is_match(path)
    }
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default(), GlobSet::empty())
    }
}

/// Candidates found by a walk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkResult {
    /// Deduplicated candidate paths in discovery order
    pub files: Vec<String>,
    /// Directories whose listing failed
    pub unreadable_dirs: Vec<String>,
    /// Whether collection stopped at `max_candidates`
    pub capped: bool,
}

impl WalkResult {
    /// Module names the repository defines itself: every directory segment
    /// and file stem along the candidate paths.
    pub fn module_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for file in &self.files {
            let mut segments: Vec<&str> = file.split('/').collect();
            if let Some(last) = segments.pop() {
                let stem = last.rsplit_once('.').map_or(last, |(stem, _)| stem);
                if stem != "__init__" && !stem.is_empty() {
                    names.insert(stem.to_string());
                }
            }
            names.extend(
                segments
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }
        names
    }
}

/// Walks one repository through a content provider
pub struct TreeWalker<'a> {
    provider: &'a dyn ContentProvider,
    owner: &'a str,
    repo: &'a str,
    options: WalkOptions,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        provider: &'a dyn ContentProvider,
        owner: &'a str,
        repo: &'a str,
        options: WalkOptions,
    ) -> Self {
        Self {
            provider,
            owner,
            repo,
            options,
        }
    }

    /// Walk a single start path
    pub async fn walk(&self, start: &str) -> WalkResult {
        let mut result = WalkResult::default();
        let mut seen = HashSet::new();
        self.walk_into(start, &mut result, &mut seen).await;
        result
    }

    /// Walk each root in order, concatenating and deduplicating the candidates
    pub async fn walk_roots(&self, roots: &[String]) -> WalkResult {
        let mut result = WalkResult::default();
        let mut seen = HashSet::new();
        for root in roots {
            if result.capped {
                break;
            }
            self.walk_into(root, &mut result, &mut seen).await;
        }
        debug!(
            candidates = result.files.len(),
            unreadable = result.unreadable_dirs.len(),
            capped = result.capped,
            "Tree walk complete"
        );
        result
    }

    async fn walk_into(&self, start: &str, result: &mut WalkResult, seen: &mut HashSet<String>) {
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        queue.push_back((start.trim_matches('/').to_string(), self.options.max_depth));

        while let Some((dir, remaining)) = queue.pop_front() {
            if remaining == 0 {
                continue;
            }

            let entries = match self.provider.list_directory(self.owner, self.repo, &dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(directory = %dir, error = %e, "Failed to list directory, skipping subtree");
                    if !result.unreadable_dirs.contains(&dir) {
                        result.unreadable_dirs.push(dir);
                    }
                    continue;
                }
            };

            for entry in entries {
                match entry.kind {
                    EntryKind::Dir => {
                        if remaining > 1 && self.options.should_descend(&entry.name) {
                            queue.push_back((entry.path, remaining - 1));
                        }
                    }
                    EntryKind::File => {
                        if !self.options.is_candidate(&entry.path) || seen.contains(&entry.path) {
                            continue;
                        }
                        if result.files.len() >= self.options.max_candidates {
                            result.capped = true;
                            return;
                        }
                        seen.insert(entry.path.clone());
                        result.files.push(entry.path);
                    }
                }
            }
        }
    }
}
