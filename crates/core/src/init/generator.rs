//! Project directory generation.

use super::error::{InitError, InitResult};
use super::templates::get_template;
use crate::config::loader::{MANIFEST_FILE, PLAYER_CONFIG_FILE};
use chrono::Utc;
use pdb_protocol::graph_models::ProcessGraph;
use pdb_protocol::manifest_models::ProjectManifest;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const GRAPH_TEMPLATE: &str = "graph.yaml";

/// Options for scaffolding a project directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory that will hold the project.
    pub target_dir: PathBuf,

    /// Project name. Defaults to the sample name, or the directory name for
    /// minimal projects.
    pub name: Option<String>,

    /// Overwrite an existing project.
    pub force: bool,

    /// Create an empty project instead of the sample.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            name: None,
            force: false,
            minimal: false,
        }
    }
}

/// Generate a project directory.
///
/// The sample project contains:
/// ```text
/// <target_dir>/
/// ├── manifest.json   five narrated steps
/// ├── graph.yaml      expense approval process with one gateway
/// └── player.toml     default playback settings
/// ```
///
/// A minimal project is only an empty `manifest.json` plus an empty
/// `graph.yaml`, ready for an authoring tool to fill in. When it replaces
/// an existing project, the old `player.toml` is removed.
///
/// # Errors
/// Returns an `InitError` if:
/// - `manifest.json` already exists (without force flag)
/// - an embedded template is missing or malformed
/// - file system operations fail
///
/// # Example
/// ```no_run
/// use pdb_core::init::{generate_project, InitOptions};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = InitOptions {
///     target_dir: PathBuf::from("docs/expense"),
///     name: Some("Expense approval".to_string()),
///     force: false,
///     minimal: false,
/// };
///
/// generate_project(options).await?;
/// # Ok(())
/// # }
/// ```
pub async fn generate_project(options: InitOptions) -> InitResult<()> {
    let manifest_path = options.target_dir.join(MANIFEST_FILE);

    if manifest_path.exists() && !options.force {
        return Err(InitError::ProjectExists(options.target_dir));
    }

    fs::create_dir_all(&options.target_dir).map_err(|source| InitError::DirectoryCreate {
        path: options.target_dir.clone(),
        source,
    })?;

    let manifest = if options.minimal {
        let name = options
            .name
            .clone()
            .unwrap_or_else(|| default_name(&options.target_dir));
        ProjectManifest::new(name)
    } else {
        sample_manifest(options.name.as_deref())?
    };

    write_file(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

    if options.minimal {
        let graph = serde_yaml::to_string(&ProcessGraph::default())
            .unwrap_or_else(|_| "nodes: []\nflows: []\n".to_string());
        write_file(&options.target_dir.join(GRAPH_TEMPLATE), graph)?;
        // Settings of a project being replaced must not carry over.
        remove_stale(&options.target_dir.join(PLAYER_CONFIG_FILE))?;
    } else {
        write_template_file(&options.target_dir, GRAPH_TEMPLATE)?;
        write_template_file(&options.target_dir, PLAYER_CONFIG_FILE)?;
    }

    info!(
        project = %manifest.name,
        dir = %options.target_dir.display(),
        minimal = options.minimal,
        "project initialized"
    );
    Ok(())
}

/// The embedded sample manifest, renamed and stamped with the current time.
fn sample_manifest(name: Option<&str>) -> InitResult<ProjectManifest> {
    let content = get_template(MANIFEST_FILE)
        .ok_or_else(|| InitError::TemplateNotFound(MANIFEST_FILE.to_string()))?;
    let mut manifest: ProjectManifest =
        serde_json::from_str(&content).map_err(|source| InitError::InvalidTemplate {
            name: MANIFEST_FILE.to_string(),
            source,
        })?;

    if let Some(name) = name {
        manifest.name = name.to_string();
    }
    let now = Utc::now();
    manifest.created_at = now;
    manifest.updated_at = now;
    Ok(manifest)
}

fn default_name(dir: &Path) -> String {
    dir.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("Untitled process")
        .to_string()
}

fn write_template_file(target_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;
    write_file(&target_dir.join(template_path), content)
}

fn remove_stale(path: &Path) -> InitResult<()> {
    if !path.exists() {
        return Ok(());
    }
    fs::remove_file(path).map_err(|source| InitError::FileRemove {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: String) -> InitResult<()> {
    fs::write(path, content).map_err(|source| InitError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_project;
    use pdb_protocol::config_models::PlayerConfig;
    use tempfile::tempdir;

    fn options(target_dir: PathBuf) -> InitOptions {
        InitOptions {
            target_dir,
            name: None,
            force: false,
            minimal: false,
        }
    }

    #[tokio::test]
    async fn test_generate_sample_project() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("expense");

        let result = generate_project(options(root.clone())).await;
        assert!(result.is_ok(), "Failed: {:?}", result.err());

        assert!(root.join("manifest.json").exists());
        assert!(root.join("graph.yaml").exists());
        assert!(root.join("player.toml").exists());

        let project = load_project(&root).await.expect("sample should load");
        assert_eq!(project.name(), "Expense approval");
        assert_eq!(project.manifest.steps.len(), 5);
        assert_eq!(project.manifest.created_at, project.manifest.updated_at);
    }

    #[tokio::test]
    async fn test_generate_with_custom_name() {
        let dir = tempdir().unwrap();
        let mut opts = options(dir.path().to_path_buf());
        opts.name = Some("Purchase order".to_string());

        generate_project(opts).await.unwrap();

        let project = load_project(dir.path()).await.unwrap();
        assert_eq!(project.name(), "Purchase order");
    }

    #[tokio::test]
    async fn test_generate_minimal_project() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("onboarding");
        let mut opts = options(root.clone());
        opts.minimal = true;

        generate_project(opts).await.unwrap();

        assert!(!root.join("player.toml").exists());
        let project = load_project(&root).await.expect("minimal project should load");
        assert_eq!(project.name(), "onboarding");
        assert!(project.manifest.steps.is_empty());
        assert!(project.graph.nodes.is_empty());
    }

    #[tokio::test]
    async fn test_existing_project_requires_force() {
        let dir = tempdir().unwrap();
        generate_project(options(dir.path().to_path_buf()))
            .await
            .unwrap();

        let result = generate_project(options(dir.path().to_path_buf())).await;
        assert!(matches!(result, Err(InitError::ProjectExists(_))));

        let mut forced = options(dir.path().to_path_buf());
        forced.force = true;
        forced.minimal = true;
        generate_project(forced).await.unwrap();

        let project = load_project(dir.path()).await.unwrap();
        assert!(project.manifest.steps.is_empty());
    }

    #[tokio::test]
    async fn test_forced_minimal_drops_previous_settings() {
        let dir = tempdir().unwrap();
        generate_project(options(dir.path().to_path_buf()))
            .await
            .unwrap();
        fs::write(dir.path().join(PLAYER_CONFIG_FILE), "wrap_around = true\n").unwrap();

        let mut forced = options(dir.path().to_path_buf());
        forced.force = true;
        forced.minimal = true;
        generate_project(forced).await.unwrap();

        assert!(!dir.path().join(PLAYER_CONFIG_FILE).exists());
        let project = load_project(dir.path()).await.unwrap();
        assert_eq!(project.player, PlayerConfig::default());
        assert!(!project.player.wrap_around);
    }
}
