//! Error types for atlas construction and loading

use std::path::PathBuf;
use thiserror::Error;

use crate::volume::LabelId;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid atlas manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid label table {}: {source}", .path.display())]
    LabelTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid atlas manifest: {0}")]
    InvalidManifest(String),

    #[error("Volume size mismatch: expected {expected} bytes, got {actual}")]
    VolumeSizeMismatch { expected: usize, actual: usize },

    #[error("Invalid volume shape: {0}")]
    InvalidShape(String),

    #[error("Invalid affine: {0}")]
    InvalidAffine(String),

    #[error("Affine is singular and cannot be inverted")]
    SingularAffine,

    #[error("Duplicate label id {id} in label table")]
    DuplicateLabel { id: LabelId },

    #[error("Empty region name for label id {id}")]
    EmptyRegionName { id: LabelId },

    #[error("Atlas already registered: {0}")]
    DuplicateAtlas(String),
}

/// Result type for atlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;
