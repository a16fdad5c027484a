//! Core domain models
//!
//! This module defines the data structures shared by the classifier, the
//! dependency index and the step graph builder: steps, pipelines, the
//! generator configuration and the error type.

pub mod config;
pub mod error;
pub mod key;
pub mod pipeline;
pub mod step;

pub use config::GeneratorConfig;
pub use error::{GraphError, GraphResult};
pub use key::sanitize_key;
pub use pipeline::*;
pub use step::*;
