//! Embedded project templates.
//!
//! This module uses `rust-embed` to embed the sample project from the
//! workspace root `templates/` directory into the binary at compile time, so
//! `init` works without any files next to the executable.

use rust_embed::RustEmbed;

/// Embedded template files from the `templates/` directory.
///
/// The path is relative to the crate root:
/// - `CARGO_MANIFEST_DIR` = `crates/core`
/// - `../../templates` = workspace root `templates/`
///
/// With the `debug-embed` feature, debug builds embed the files as well, so
/// tests see exactly what a release binary ships.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path.
///
/// # Example
/// ```
/// use pdb_core::init::templates::get_template;
///
/// let graph = get_template("graph.yaml").expect("graph.yaml should exist");
/// assert!(graph.contains("nodes:"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List all embedded template paths.
pub fn list_templates() -> Vec<String> {
    let mut paths: Vec<String> = TemplateAssets::iter().map(|path| path.to_string()).collect();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdb_protocol::config_models::PlayerConfig;
    use pdb_protocol::graph_models::ProcessGraph;
    use pdb_protocol::manifest_models::ProjectManifest;

    #[test]
    fn test_templates_are_embedded() {
        assert_eq!(
            list_templates(),
            vec!["graph.yaml", "manifest.json", "player.toml"]
        );
    }

    #[test]
    fn test_manifest_template_parses() {
        let content = get_template("manifest.json").expect("manifest.json should be embedded");
        let manifest: ProjectManifest = serde_json::from_str(&content).unwrap();
        assert_eq!(manifest.steps.len(), 5);
        assert_eq!(manifest.graph_path, "graph.yaml");
    }

    #[test]
    fn test_graph_template_covers_manifest_steps() {
        let graph: ProcessGraph =
            serde_yaml::from_str(&get_template("graph.yaml").unwrap()).unwrap();
        let manifest: ProjectManifest =
            serde_json::from_str(&get_template("manifest.json").unwrap()).unwrap();

        for step in &manifest.steps {
            assert!(
                graph.nodes.iter().any(|n| n.id == step.bpmn_element_id),
                "step {} should be anchored to a graph node",
                step.id
            );
        }
    }

    #[test]
    fn test_player_template_matches_defaults() {
        let config: PlayerConfig = toml::from_str(&get_template("player.toml").unwrap()).unwrap();
        assert_eq!(config, PlayerConfig::default());
    }

    #[test]
    fn test_get_nonexistent_template() {
        assert!(get_template("nonexistent.txt").is_none());
    }
}
