//! Reverse-dependency index from packages to the base images using them

pub mod lookup;
pub mod manifest;

pub use lookup::PackageMatcher;
pub use manifest::{
    BaseImageManifest, DirectoryManifests, InMemoryManifests, ManifestSource, PackagesByImage,
};

use crate::core::{config::GeneratorConfig, GraphResult};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Images that depend on one requested package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDependents {
    pub package: String,
    pub images: Vec<String>,
}

/// Immutable snapshot of the package references declared by every image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyIndex {
    packages_by_image: PackagesByImage,
}

impl DependencyIndex {
    pub fn new(packages_by_image: PackagesByImage) -> Self {
        Self { packages_by_image }
    }

    /// Load every `*.yaml` manifest in `config_dir`
    pub async fn load_all(config_dir: impl AsRef<Path>) -> GraphResult<Self> {
        let extension = GeneratorConfig::default().manifest_extension;
        Self::load_from(&DirectoryManifests::new(config_dir.as_ref(), extension)).await
    }

    /// Load the index from any manifest source
    pub async fn load_from<S: ManifestSource + ?Sized>(source: &S) -> GraphResult<Self> {
        let packages_by_image = source.load_manifests().await?;
        info!("Loaded {} base image manifest(s)", packages_by_image.len());
        Ok(Self::new(packages_by_image))
    }

    /// Declared package references of `image`
    pub fn packages_of(&self, image: &str) -> Option<&[String]> {
        self.packages_by_image.get(image).map(Vec::as_slice)
    }

    /// Image names in ascending order
    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.packages_by_image.keys().map(String::as_str)
    }

    pub fn packages_by_image(&self) -> &PackagesByImage {
        &self.packages_by_image
    }

    pub fn len(&self) -> usize {
        self.packages_by_image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages_by_image.is_empty()
    }

    /// Images depending on any of `packages`, deduplicated and sorted
    ///
    /// An empty `repo` matches unqualified references; otherwise only
    /// references qualified with `@repo` are considered.
    pub fn reverse_lookup<S: AsRef<str>>(&self, packages: &[S], repo: &str) -> GraphResult<Vec<String>> {
        let mut images = BTreeSet::new();
        for package in packages {
            images.extend(self.dependents_of(package.as_ref(), repo)?);
        }
        Ok(images.into_iter().collect())
    }

    /// Images depending on a single package, sorted
    pub fn dependents_of(&self, package: &str, repo: &str) -> GraphResult<Vec<String>> {
        let matcher = PackageMatcher::new(package, repo)?;
        // BTreeMap keys are already sorted and unique
        Ok(self
            .packages_by_image
            .iter()
            .filter(|(_, references)| matcher.matches_any(references.as_slice()))
            .map(|(image, _)| image.clone())
            .collect())
    }

    /// Per-package breakdown of dependents, in request order
    pub fn dependents_by_package<S: AsRef<str>>(
        &self,
        packages: &[S],
        repo: &str,
    ) -> GraphResult<Vec<PackageDependents>> {
        packages
            .iter()
            .map(|package| {
                let package = package.as_ref();
                let images = self.dependents_of(package, repo)?;
                info!("Base images which depend on package {}: {:?}", package, images);
                Ok(PackageDependents {
                    package: package.to_string(),
                    images,
                })
            })
            .collect()
    }
}

/// Load the index of every image manifest under `root`
pub async fn get_all_image_dependencies(
    root: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> GraphResult<DependencyIndex> {
    let source = DirectoryManifests::new(
        root.as_ref().join(&config.images_dir),
        &config.manifest_extension,
    );
    DependencyIndex::load_from(&source).await
}

/// Base images under `root` that depend on any of `packages`
pub async fn get_dependencies_of_packages<S: AsRef<str>>(
    root: impl AsRef<Path>,
    config: &GeneratorConfig,
    packages: &[S],
    repo: &str,
) -> GraphResult<Vec<String>> {
    let index = get_all_image_dependencies(root, config).await?;
    let images: BTreeSet<String> = index
        .dependents_by_package(packages, repo)?
        .into_iter()
        .flat_map(|dependents| dependents.images)
        .collect();
    Ok(images.into_iter().collect())
}
