//! Error types for project loading.
//!
//! This module defines all errors that can occur while reading a project
//! directory: the manifest, the graph export and the player settings.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during project loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a project file from disk.
    #[error("Failed to read project file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the JSON manifest.
    #[error("Failed to parse JSON file at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to parse the YAML graph export.
    #[error("Failed to parse YAML file at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Failed to parse TOML player settings.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to walk the project directory for audio files.
    #[error("Failed to traverse directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// The project is structurally unusable (missing manifest, unsupported schema).
    #[error("Invalid project at {path}: {reason}")]
    InvalidProject { path: PathBuf, reason: String },
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
