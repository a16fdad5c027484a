//! Error types for change classification and manifest loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while classifying changes or loading the dependency index
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unable to extract base image name from '{path}': {reason}")]
    Classification { path: String, reason: String },

    #[error("invalid package pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl GraphError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GraphError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error must stop pipeline generation outright
    pub fn is_classification(&self) -> bool {
        matches!(self, GraphError::Classification { .. })
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
