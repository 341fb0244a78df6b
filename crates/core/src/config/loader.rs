//! Project loader.
//!
//! A project directory contains:
//! - `manifest.json`: Step list and metadata (required)
//! - the graph export named by `graphPath`, `graph.yaml` by default (required)
//! - `player.toml`: Playback settings (optional)
//! - narration audio files referenced by `audioFile` (optional)

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::Project;
use pdb_protocol::config_models::PlayerConfig;
use pdb_protocol::graph_models::ProcessGraph;
use pdb_protocol::manifest_models::{ProjectManifest, MANIFEST_SCHEMA_VERSION};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const PLAYER_CONFIG_FILE: &str = "player.toml";

const AUDIO_EXTENSIONS: &[&str] = &["webm", "ogg", "opus", "mp3", "wav", "m4a", "flac"];

/// Loads a project from its directory.
///
/// # Arguments
///
/// * `root` - Project directory containing `manifest.json`
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - `manifest.json` is missing or declares an unsupported schema version
/// - the manifest or graph export cannot be read or parsed
/// - `player.toml` exists but is invalid
/// - the project directory cannot be traversed
///
/// # Example
///
/// ```rust,no_run
/// use pdb_core::config::loader::load_project;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let project = load_project(Path::new(".")).await?;
/// println!("Loaded {} steps", project.manifest.steps.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_project(root: &Path) -> ConfigResult<Project> {
    let manifest = load_manifest(root)?;
    let graph = load_graph(&root.join(&manifest.graph_path))?;
    let player = load_player_config(root)?;
    let audio_files = index_audio_files(root)?;

    debug!(
        project = %manifest.name,
        steps = manifest.steps.len(),
        nodes = graph.nodes.len(),
        flows = graph.flows.len(),
        audio_files = audio_files.len(),
        "project loaded"
    );

    Ok(Project {
        root: root.to_path_buf(),
        manifest,
        graph,
        player,
        audio_files,
    })
}

/// Loads and validates `manifest.json`.
pub fn load_manifest(root: &Path) -> ConfigResult<ProjectManifest> {
    let path = root.join(MANIFEST_FILE);

    if !path.exists() {
        return Err(ConfigError::InvalidProject {
            path: root.to_path_buf(),
            reason: format!("{} not found", MANIFEST_FILE),
        });
    }

    let content = read(&path)?;
    let manifest: ProjectManifest =
        serde_json::from_str(&content).map_err(|source| ConfigError::JsonParse {
            path: path.clone(),
            source,
        })?;

    if manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(ConfigError::InvalidProject {
            path,
            reason: format!(
                "unsupported schema version {} (expected {})",
                manifest.schema_version, MANIFEST_SCHEMA_VERSION
            ),
        });
    }

    Ok(manifest)
}

/// Loads the flattened process graph.
pub fn load_graph(path: &Path) -> ConfigResult<ProcessGraph> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads `player.toml`, falling back to defaults when it is absent.
fn load_player_config(root: &Path) -> ConfigResult<PlayerConfig> {
    let path = root.join(PLAYER_CONFIG_FILE);

    if !path.exists() {
        return Ok(PlayerConfig::default());
    }

    let content = read(&path)?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse { path, source })
}

/// Finds audio files under `root`, keyed by file name.
///
/// When two files share a name the first one found wins.
fn index_audio_files(root: &Path) -> ConfigResult<HashMap<String, PathBuf>> {
    let mut files = HashMap::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_audio = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if !is_audio {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if files.contains_key(name) {
            warn!(file = %path.display(), "duplicate audio file name, ignoring");
            continue;
        }
        files.insert(name.to_string(), path.to_path_buf());
    }

    Ok(files)
}

fn read(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
