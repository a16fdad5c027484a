//! Matching package references against requested package names

use crate::core::GraphResult;
use regex::Regex;

/// Matches the references that belong to one package
///
/// A package can ship several artifacts: `jaeger` builds `jaeger-agent` and
/// `jaeger-all-in-one`, so a reference matches when it is the package name
/// itself or the name followed by `-<suffix>`. With a repository filter only
/// `name@repo` references are eligible.
#[derive(Debug, Clone)]
pub struct PackageMatcher {
    package: String,
    pattern: Regex,
}

impl PackageMatcher {
    pub fn new(package: &str, repo: &str) -> GraphResult<Self> {
        let name = regex::escape(package);
        let pattern = if repo.is_empty() {
            format!(r"^{}(?:-[a-z0-9-]+)?$", name)
        } else {
            format!(r"^{}(?:-[a-z0-9-]+)?@{}$", name, regex::escape(repo))
        };

        Ok(Self {
            package: package.to_string(),
            pattern: Regex::new(&pattern)?,
        })
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn matches(&self, reference: &str) -> bool {
        self.pattern.is_match(reference)
    }

    /// Whether any of `references` matches
    pub fn matches_any<S: AsRef<str>>(&self, references: &[S]) -> bool {
        references.iter().any(|r| self.matches(r.as_ref()))
    }
}
