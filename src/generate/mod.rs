//! Pipeline generation from a set of changed paths

pub mod builder;

pub use builder::{StepGraphBuilder, BARRIER_STEP_KEY, INDEX_STEP_KEY};

use crate::changes::{ChangeClassifier, ChangeSet};
use crate::core::{config::GeneratorConfig, GraphResult, Pipeline, StepSet};
use std::collections::HashSet;
use tracing::info;

/// Steps rebuilding changed packages and the repository index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOperations {
    pub set: StepSet,
    /// Number of package build steps
    pub count: usize,
    pub changed_packages: Vec<String>,
}

/// Steps rebuilding changed base images and the barrier after them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOperations {
    pub set: StepSet,
    /// Number of image build steps
    pub count: usize,
}

/// Inputs of a full generation run besides the changed paths
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Branch whose package index is rebuilt
    pub branch: String,
    /// Tag applied to built base images
    pub tag: String,
    /// Images to rebuild on top of the ones changed directly
    pub extra_images: Vec<String>,
}

impl GenerateOptions {
    pub fn new(branch: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            tag: tag.into(),
            extra_images: Vec::new(),
        }
    }

    pub fn with_extra_images(mut self, images: Vec<String>) -> Self {
        self.extra_images = images;
        self
    }
}

/// Result of a full generation run
#[derive(Debug, Clone)]
pub struct Generation {
    pub pipeline: Pipeline,
    pub package_count: usize,
    pub image_count: usize,
    pub changed_packages: Vec<String>,
}

impl Generation {
    /// Whether anything needs building at all
    pub fn has_work(&self) -> bool {
        self.package_count > 0 || self.image_count > 0
    }
}

/// Generates pipelines for one repository layout
#[derive(Debug, Clone, Default)]
pub struct PipelineGenerator {
    config: GeneratorConfig,
    classifier: ChangeClassifier,
}

impl PipelineGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let classifier = ChangeClassifier::from_config(&config);
        Self { config, classifier }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn classifier(&self) -> &ChangeClassifier {
        &self.classifier
    }

    fn builder(&self) -> StepGraphBuilder<'_> {
        StepGraphBuilder::new(&self.config)
    }

    /// Rebuild every changed package, then the repository index
    pub fn package_operations<S: AsRef<str>>(&self, paths: &[S], branch: &str) -> PackageOperations {
        let changed_packages = first_occurrences(self.classifier.classify_package_changes(paths));
        let builder = self.builder();

        let (steps, keys) = builder.package_steps(&changed_packages);
        let mut set = StepSet::new("Dependency packages");
        set.extend(steps);
        set.push(builder.index_step(branch, &keys));

        info!("{} package(s) changed: {:?}", keys.len(), changed_packages);
        PackageOperations {
            set,
            count: keys.len(),
            changed_packages,
        }
    }

    /// Rebuild every changed base image, then the barrier step
    pub fn base_image_operations<S: AsRef<str>>(
        &self,
        paths: &[S],
        tag: &str,
        packages_changed: bool,
    ) -> GraphResult<ImageOperations> {
        let images = first_occurrences(self.classifier.classify_image_changes(paths)?);
        Ok(self.image_operations(&images, tag, packages_changed))
    }

    fn image_operations<S: AsRef<str>>(&self, images: &[S], tag: &str, packages_changed: bool) -> ImageOperations {
        let builder = self.builder();

        let (steps, keys) = builder.image_steps(images, tag, packages_changed);
        let mut set = StepSet::new("Base image builds");
        set.extend(steps);
        set.push(builder.barrier_step(&keys));

        info!("{} base image(s) to build", keys.len());
        ImageOperations {
            set,
            count: keys.len(),
        }
    }

    /// Build the whole pipeline: packages, index, images, barrier
    ///
    /// Fails without producing anything if a path under the images tree does
    /// not follow the naming convention.
    pub fn generate(&self, changes: &ChangeSet, options: &GenerateOptions) -> GraphResult<Generation> {
        let paths = changes.paths();

        // Classify images first so a bad path fails before any work is done.
        let mut images = first_occurrences(self.classifier.classify_image_changes(paths)?);
        for image in &options.extra_images {
            if !images.contains(image) {
                images.push(image.clone());
            }
        }

        let packages = self.package_operations(paths, &options.branch);
        let packages_changed = packages.count > 0;
        let images = self.image_operations(&images, &options.tag, packages_changed);

        let mut pipeline = Pipeline::new();
        pipeline.push_set(packages.set);
        pipeline.push_set(images.set);

        Ok(Generation {
            pipeline,
            package_count: packages.count,
            image_count: images.count,
            changed_packages: packages.changed_packages,
        })
    }
}

/// Drop repeated names, keeping the first of each
///
/// Different spellings of one manifest path classify to the same name, and
/// each name must yield exactly one step key.
fn first_occurrences(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
