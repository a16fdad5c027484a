//! Test utility functions for wolfi-ci

#![allow(dead_code)]

use std::path::Path;
use tempfile::TempDir;
use wolfi_ci::core::Pipeline;

/// A throwaway repository with package and image manifest directories
pub struct FixtureRepo {
    dir: TempDir,
}

impl FixtureRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::create_dir(dir.path().join("wolfi-packages")).expect("create packages dir");
        std::fs::create_dir(dir.path().join("wolfi-images")).expect("create images dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a package manifest
    pub fn with_package(self, name: &str) -> Self {
        let yaml = format!(
            "package:\n  name: {}\n  version: 1.0.0\n  epoch: 0\npipeline:\n  - uses: fetch\n",
            name
        );
        self.with_file(&format!("wolfi-packages/{}.yaml", name), &yaml)
    }

    /// Write a base image manifest declaring `packages`
    pub fn with_image(self, name: &str, packages: &[&str]) -> Self {
        let mut yaml = String::from(
            "contents:\n  keyring:\n    - https://packages.wolfi.dev/os/wolfi-signing.rsa.pub\n  repositories:\n    - https://packages.wolfi.dev/os\n  packages:\n",
        );
        for package in packages {
            yaml.push_str(&format!("    - {}\n", package));
        }
        yaml.push_str("accounts:\n  run-as: sourcegraph\n");
        self.with_file(&format!("wolfi-images/{}.yaml", name), &yaml)
    }

    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, content).expect("write fixture file");
        self
    }
}

/// Step keys of `pipeline` in emission order
pub fn step_keys(pipeline: &Pipeline) -> Vec<String> {
    pipeline.keys().into_iter().map(str::to_string).collect()
}

/// Assert that step `key` depends on exactly `deps`
pub fn assert_depends_on(pipeline: &Pipeline, key: &str, deps: &[&str]) {
    let step = pipeline
        .step(key)
        .unwrap_or_else(|| panic!("Step '{}' not found", key));
    assert_eq!(
        step.depends_on, deps,
        "Step '{}' has unexpected dependencies",
        key
    );
}

/// Assert that every dependency edge points to an earlier step
pub fn assert_forward_only(pipeline: &Pipeline) {
    let keys = pipeline.keys();
    for (dependency, dependent) in pipeline.edges() {
        let from = keys.iter().position(|k| *k == dependency);
        let to = keys.iter().position(|k| *k == dependent);
        match (from, to) {
            (Some(from), Some(to)) => assert!(
                from < to,
                "'{}' depends on later step '{}'",
                dependent,
                dependency
            ),
            _ => panic!("edge {} -> {} names a missing step", dependency, dependent),
        }
    }
}
