//! Step construction for each tier of the build graph
//!
//! Dependency tree between steps:
//!
//! ```text
//! (package[1], package[2], ...) <-- buildRepoIndex <-- (image[1], image[2], ...) <-- buildAllBaseImages
//! ```
//!
//! Every step only names steps from an earlier tier, so the graph cannot
//! contain a cycle.

use crate::core::{config::GeneratorConfig, key::sanitize_key, step::Step};

/// Key of the step that rebuilds and signs the package repository index
pub const INDEX_STEP_KEY: &str = "buildRepoIndex";

/// Key of the no-op step that waits for every base image
pub const BARRIER_STEP_KEY: &str = "buildAllBaseImages";

/// Builds step descriptors from the generator configuration
#[derive(Debug, Clone, Copy)]
pub struct StepGraphBuilder<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> StepGraphBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn package_key(name: &str) -> String {
        sanitize_key(&format!("package-dependency-{}", name))
    }

    pub fn image_key(name: &str) -> String {
        sanitize_key(&format!("build-base-image-{}", name))
    }

    /// One step per changed package, plus their keys in the same order
    pub fn package_steps<S: AsRef<str>>(&self, packages: &[S]) -> (Vec<Step>, Vec<String>) {
        packages
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let key = Self::package_key(name);
                let step = Step::new(
                    key.clone(),
                    format!(":package: Package dependency '{}'", name),
                    format!("{} {}", self.config.scripts.build_package, name),
                )
                .with_agent("queue", &self.config.queue);
                (step, key)
            })
            .unzip()
    }

    /// The repository index step, waiting on every package step
    ///
    /// Emitted even when no package changed, so the index is re-signed.
    pub fn index_step<S: AsRef<str>>(&self, branch: &str, package_keys: &[S]) -> Step {
        Step::new(
            INDEX_STEP_KEY,
            format!(
                ":card_index_dividers: Build and sign repository index for branch '{}'",
                branch
            ),
            format!("{} {}", self.config.scripts.build_repo_index, branch),
        )
        .with_agent("queue", &self.config.queue)
        .with_dependencies(package_keys.iter().map(AsRef::<str>::as_ref))
    }

    /// One step per changed image, plus their keys in the same order
    ///
    /// When packages changed, images wait for the index so they never pull
    /// packages the index does not list yet.
    pub fn image_steps<S: AsRef<str>>(
        &self,
        images: &[S],
        tag: &str,
        packages_changed: bool,
    ) -> (Vec<Step>, Vec<String>) {
        images
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let key = Self::image_key(name);
                let mut step = Step::new(
                    key.clone(),
                    format!(":octopus: Build Wolfi base image '{}'", name),
                    format!("{} {} {}", self.config.scripts.build_base_image, name, tag),
                )
                .with_agent("queue", &self.config.queue);

                for (var, value) in &self.config.image_env {
                    step = step.with_env(var, value);
                }
                if packages_changed {
                    step = step.with_dependencies([INDEX_STEP_KEY]);
                }
                (step, key)
            })
            .unzip()
    }

    /// No-op step that completes once every image step has
    pub fn barrier_step<S: AsRef<str>>(&self, image_keys: &[S]) -> Step {
        Step::new(
            BARRIER_STEP_KEY,
            ":octopus: All base images built",
            "echo 'All base images built'",
        )
        .with_agent("queue", &self.config.queue)
        .with_dependencies(image_keys.iter().map(AsRef::<str>::as_ref))
    }
}
