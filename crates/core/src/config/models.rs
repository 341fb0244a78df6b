//! The loaded project aggregate.

use pdb_protocol::config_models::PlayerConfig;
use pdb_protocol::graph_models::ProcessGraph;
use pdb_protocol::manifest_models::ProjectManifest;
use std::collections::HashMap;
use std::path::PathBuf;

/// Everything read from one project directory.
///
/// This structure aggregates all project sources:
/// - `manifest.json`: Steps and metadata
/// - the graph export named by the manifest's `graphPath`
/// - `player.toml`: Playback settings (defaults when absent)
/// - audio files found anywhere under the project directory
///
/// # Example
///
/// ```rust,no_run
/// use pdb_core::config::load_project;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let project = load_project(Path::new("docs/expense")).await?;
/// println!("{} steps over {} nodes",
///          project.manifest.steps.len(),
///          project.graph.nodes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Project {
    /// Project directory.
    pub root: PathBuf,

    pub manifest: ProjectManifest,

    pub graph: ProcessGraph,

    /// Settings from `player.toml`.
    pub player: PlayerConfig,

    /// Audio files by file name.
    pub audio_files: HashMap<String, PathBuf>,
}

impl Project {
    pub fn name(&self) -> &str {
        &self.manifest.name
    }
}
