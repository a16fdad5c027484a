//! Base image manifests and the sources they are loaded from

use crate::core::{error::GraphError, GraphResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::debug;

/// Package references declared by each image, keyed by image name
pub type PackagesByImage = BTreeMap<String, Vec<String>>;

/// The subset of a base image manifest this crate reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseImageManifest {
    #[serde(default)]
    pub contents: Option<Contents>,
}

/// The `contents` section of a base image manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contents {
    /// Package references, either `name` or `name@repo`
    #[serde(default)]
    pub packages: Option<Vec<String>>,
}

impl BaseImageManifest {
    /// Parse a manifest document. Missing sections mean no packages.
    pub fn from_yaml(path: &Path, yaml: &str) -> GraphResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let manifest: Option<BaseImageManifest> =
            serde_yaml::from_str(yaml).map_err(|source| GraphError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(manifest.unwrap_or_default())
    }

    /// Declared package references in document order
    pub fn packages(&self) -> &[String] {
        self.contents
            .as_ref()
            .and_then(|c| c.packages.as_deref())
            .unwrap_or_default()
    }

    pub fn into_packages(self) -> Vec<String> {
        self.contents
            .and_then(|c| c.packages)
            .unwrap_or_default()
    }
}

/// Where base image manifests come from
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Load every manifest. Any unreadable or malformed document fails the
    /// whole load.
    async fn load_manifests(&self) -> GraphResult<PackagesByImage>;
}

/// Manifests stored as files in one directory, named `<image><ext>`
#[derive(Debug, Clone)]
pub struct DirectoryManifests {
    dir: PathBuf,
    extension: String,
}

impl DirectoryManifests {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ManifestSource for DirectoryManifests {
    async fn load_manifests(&self) -> GraphResult<PackagesByImage> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| GraphError::io(&self.dir, e))?;

        // Documents are read and parsed concurrently; the map orders them.
        let mut tasks = JoinSet::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| GraphError::io(&self.dir, e))?
        {
            let file_name = entry.file_name();
            let Some(image) = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(self.extension.as_str()))
                .filter(|image| !image.is_empty())
            else {
                continue;
            };

            let path = entry.path();
            // Follows symlinks, so a link to a directory is skipped too
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|e| GraphError::io(&path, e))?;
            if metadata.is_dir() {
                continue;
            }

            let image = image.to_string();
            tasks.spawn(async move {
                let content = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| GraphError::io(&path, e))?;
                let manifest = BaseImageManifest::from_yaml(&path, &content)?;
                Ok::<_, GraphError>((image, manifest.into_packages()))
            });
        }

        let mut packages_by_image = PackagesByImage::new();
        while let Some(joined) = tasks.join_next().await {
            let (image, packages) =
                joined.map_err(|e| GraphError::io(&self.dir, std::io::Error::other(e)))??;
            debug!("Image {} declares {} package(s)", image, packages.len());
            packages_by_image.insert(image, packages);
        }

        Ok(packages_by_image)
    }
}

#[derive(Debug, Clone)]
enum InMemoryEntry {
    Document(String),
    Packages(Vec<String>),
}

/// Manifests held in memory, either as YAML documents or package lists
#[derive(Debug, Clone, Default)]
pub struct InMemoryManifests {
    entries: Vec<(String, InMemoryEntry)>,
}

impl InMemoryManifests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, image: impl Into<String>, yaml: impl Into<String>) -> Self {
        self.entries
            .push((image.into(), InMemoryEntry::Document(yaml.into())));
        self
    }

    /// Add an image declaring `packages`
    pub fn with_packages<I, S>(mut self, image: impl Into<String>, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let packages = packages.into_iter().map(Into::into).collect();
        self.entries
            .push((image.into(), InMemoryEntry::Packages(packages)));
        self
    }
}

#[async_trait]
impl ManifestSource for InMemoryManifests {
    async fn load_manifests(&self) -> GraphResult<PackagesByImage> {
        let mut packages_by_image = PackagesByImage::new();
        for (image, entry) in &self.entries {
            let packages = match entry {
                InMemoryEntry::Document(yaml) => {
                    BaseImageManifest::from_yaml(Path::new(image), yaml)?.into_packages()
                }
                InMemoryEntry::Packages(packages) => packages.clone(),
            };
            packages_by_image.insert(image.clone(), packages);
        }
        Ok(packages_by_image)
    }
}
