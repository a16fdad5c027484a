//! Classify changed paths into packages and base images

use crate::core::{config::GeneratorConfig, error::GraphError, key::is_key_char, GraphResult};
use tracing::debug;

/// What a changed path refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// A package manifest, `<packages_dir>/<name><ext>`
    Package(String),
    /// A base image manifest, `<images_dir>/<name><ext>`
    Image(String),
    /// Anything else
    Unrecognized,
}

/// Path parser for the package and image manifest trees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeClassifier {
    packages_dir: String,
    images_dir: String,
    extension: String,
}

impl Default for ChangeClassifier {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl ChangeClassifier {
    pub fn new(
        packages_dir: impl Into<String>,
        images_dir: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            packages_dir: packages_dir.into(),
            images_dir: images_dir.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            &config.packages_dir,
            &config.images_dir,
            &config.manifest_extension,
        )
    }

    /// Classify a single changed path
    pub fn classify(&self, path: &str) -> ChangeKind {
        let segments = segments(path);
        let [.., parent, file] = segments.as_slice() else {
            return ChangeKind::Unrecognized;
        };

        let Some(name) = self.manifest_name(file) else {
            return ChangeKind::Unrecognized;
        };

        if *parent == self.packages_dir {
            ChangeKind::Package(name.to_string())
        } else if *parent == self.images_dir {
            ChangeKind::Image(name.to_string())
        } else {
            ChangeKind::Unrecognized
        }
    }

    /// Names of changed packages, in path order
    ///
    /// Paths that are not package manifests are skipped: diffs routinely
    /// contain unrelated files, including stray files in the packages tree.
    pub fn classify_package_changes<S: AsRef<str>>(&self, paths: &[S]) -> Vec<String> {
        let mut packages = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match self.classify(path) {
                ChangeKind::Package(name) => {
                    debug!("Changed package '{}' from {}", name, path);
                    packages.push(name);
                }
                _ => debug!("Skipping {} when collecting packages", path),
            }
        }
        packages
    }

    /// Names of changed base images, in path order
    ///
    /// Fails on the first path under the images tree that does not follow the
    /// `<name><ext>` convention. Paths outside the images tree are skipped.
    pub fn classify_image_changes<S: AsRef<str>>(&self, paths: &[S]) -> GraphResult<Vec<String>> {
        let mut images = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match self.classify(path) {
                ChangeKind::Image(name) => {
                    debug!("Changed base image '{}' from {}", name, path);
                    images.push(name);
                }
                _ if self.is_under_images(path) => {
                    return Err(GraphError::Classification {
                        path: path.to_string(),
                        reason: self.explain(path),
                    });
                }
                _ => debug!("Skipping {} when collecting base images", path),
            }
        }
        Ok(images)
    }

    /// Whether `path` lies anywhere below a directory named like the images tree
    pub fn is_under_images(&self, path: &str) -> bool {
        let segments = segments(path);
        segments
            .split_last()
            .is_some_and(|(_, dirs)| dirs.contains(&self.images_dir.as_str()))
    }

    fn manifest_name<'p>(&self, file: &'p str) -> Option<&'p str> {
        file.strip_suffix(self.extension.as_str())
            .filter(|name| !name.is_empty() && name.chars().all(is_key_char))
    }

    fn explain(&self, path: &str) -> String {
        let segments = segments(path);
        let Some((file, dirs)) = segments.split_last() else {
            return "empty path".to_string();
        };

        if dirs.last() != Some(&self.images_dir.as_str()) {
            return format!("manifests must sit directly inside '{}'", self.images_dir);
        }

        match file.strip_suffix(self.extension.as_str()) {
            None => format!("expected a '<name>{}' file", self.extension),
            Some("") => "image name is empty".to_string(),
            Some(name) => match name.chars().find(|c| !is_key_char(*c)) {
                Some(c) => format!("invalid character {:?} in image name", c),
                None => "unrecognized image manifest".to_string(),
            },
        }
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}
