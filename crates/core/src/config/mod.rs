//! Project loading.
//!
//! This module reads a project directory: `manifest.json`, the graph export
//! it points at, the optional `player.toml`, and any narration audio files.

pub mod error;
pub mod loader;
pub mod models;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_project;
pub use models::Project;
