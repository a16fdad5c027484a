//! Generator configuration from YAML

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// File name looked up under the repository root when no config is given
pub const DEFAULT_CONFIG_FILE: &str = "wolfi-ci.yaml";

/// Top-level generator configuration loaded from YAML
///
/// Every field has a default, so an empty document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory holding one manifest per package
    pub packages_dir: String,

    /// Directory holding one manifest per base image
    pub images_dir: String,

    /// Extension shared by package and image manifests
    pub manifest_extension: String,

    /// Agent queue every generated step runs on
    pub queue: String,

    /// Branch whose package repository index is rebuilt
    pub default_branch: String,

    /// Build scripts invoked by the generated steps
    pub scripts: ScriptsConfig,

    /// Environment set on every base image build step
    pub image_env: BTreeMap<String, String>,
}

/// Paths of the build scripts run by each tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    pub build_package: String,
    pub build_repo_index: String,
    pub build_base_image: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            build_package: "./enterprise/dev/ci/scripts/wolfi/build-package.sh".to_string(),
            build_repo_index: "./enterprise/dev/ci/scripts/wolfi/build-repo-index.sh".to_string(),
            build_base_image: "./enterprise/dev/ci/scripts/wolfi/build-base-image.sh".to_string(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let mut image_env = BTreeMap::new();
        image_env.insert("DOCKER_BAZEL".to_string(), "true".to_string());

        Self {
            packages_dir: "wolfi-packages".to_string(),
            images_dir: "wolfi-images".to_string(),
            manifest_extension: ".yaml".to_string(),
            queue: "bazel".to_string(),
            default_branch: "main".to_string(),
            scripts: ScriptsConfig::default(),
            image_env,
        }
    }
}

impl GeneratorConfig {
    /// Load generator configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse generator configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: GeneratorConfig = if yaml.trim().is_empty() {
            GeneratorConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the generator configuration
    pub fn validate(&self) -> Result<()> {
        for (field, dir) in [("packages_dir", &self.packages_dir), ("images_dir", &self.images_dir)] {
            if dir.is_empty() || dir.contains('/') || dir == "." || dir == ".." {
                anyhow::bail!("{} must be a single directory name, got '{}'", field, dir);
            }
        }

        if self.packages_dir == self.images_dir {
            anyhow::bail!(
                "packages_dir and images_dir must differ, both are '{}'",
                self.packages_dir
            );
        }

        if self.manifest_extension.len() < 2 || !self.manifest_extension.starts_with('.') {
            anyhow::bail!(
                "manifest_extension must start with '.', got '{}'",
                self.manifest_extension
            );
        }

        if self.queue.trim().is_empty() {
            anyhow::bail!("queue must not be empty");
        }

        if self.default_branch.trim().is_empty() {
            anyhow::bail!("default_branch must not be empty");
        }

        for (name, script) in [
            ("build_package", &self.scripts.build_package),
            ("build_repo_index", &self.scripts.build_repo_index),
            ("build_base_image", &self.scripts.build_base_image),
        ] {
            if script.trim().is_empty() {
                anyhow::bail!("scripts.{} must not be empty", name);
            }
        }

        Ok(())
    }
}
