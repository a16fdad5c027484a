//! wolfi-ci - Dependency-ordered CI steps for Wolfi packages and base images

pub mod changes;
pub mod cli;
pub mod core;
pub mod generate;
pub mod index;

// Re-export commonly used types
pub use crate::changes::{ChangeClassifier, ChangeKind, ChangeSet};
pub use crate::core::{sanitize_key, GeneratorConfig, GraphError, GraphResult, Pipeline, Step, StepSet};
pub use crate::generate::{GenerateOptions, Generation, PipelineGenerator, StepGraphBuilder};
pub use crate::index::{get_all_image_dependencies, get_dependencies_of_packages, DependencyIndex};
