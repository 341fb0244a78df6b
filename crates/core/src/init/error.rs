//! Error types for project scaffolding.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for initialization operations.
pub type InitResult<T> = Result<T, InitError>;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
    /// A manifest already exists and the force flag was not set.
    #[error("A project already exists at {0:?}. Use --force to overwrite.")]
    ProjectExists(PathBuf),

    /// A required template file was not found in embedded assets.
    #[error("Template file not found: {0}")]
    TemplateNotFound(String),

    /// An embedded manifest template could not be parsed.
    #[error("Invalid manifest template {name}: {source}")]
    InvalidTemplate {
        name: String,
        source: serde_json::Error,
    },

    /// Failed to serialize the generated manifest.
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to create a directory.
    #[error("Failed to create directory {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file {path:?}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to remove a file left by an earlier project.
    #[error("Failed to remove file {path:?}: {source}")]
    FileRemove {
        path: PathBuf,
        source: std::io::Error,
    },
}
