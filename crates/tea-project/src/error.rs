//! Error types for scenario file handling.

use crate::validate::ValidationError;
use thiserror::Error;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported scenario file extension: {path}")]
    UnsupportedExtension { path: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
