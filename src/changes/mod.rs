//! Changed-path intake and classification

pub mod classifier;

pub use classifier::{ChangeClassifier, ChangeKind};

use std::collections::HashSet;

/// The changed file paths of one invocation, in diff order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: Vec<String>,
}

impl ChangeSet {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    /// Parse a newline-separated path list, as printed by `git diff --name-only`
    pub fn from_lines(text: &str) -> Self {
        let paths = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { paths }
    }

    /// Drop repeated paths, keeping the first occurrence
    pub fn dedup(mut self) -> Self {
        let mut seen = HashSet::new();
        self.paths.retain(|path| seen.insert(path.clone()));
        self
    }

    pub fn extend(&mut self, paths: impl IntoIterator<Item = String>) {
        self.paths.extend(paths);
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl From<Vec<String>> for ChangeSet {
    fn from(paths: Vec<String>) -> Self {
        Self::new(paths)
    }
}

impl<'a> From<&[&'a str]> for ChangeSet {
    fn from(paths: &[&'a str]) -> Self {
        Self::new(paths.iter().map(|p| p.to_string()).collect())
    }
}
