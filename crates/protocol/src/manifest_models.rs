//! Project manifest models for `manifest.json`.
//!
//! The manifest is written by the authoring surface and read by the player.
//! It lists the narrated steps in authoring order, each anchored to one
//! element of the process graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The only manifest schema version this player understands.
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

fn default_bpmn_path() -> String {
    "diagram.bpmn".to_string()
}

fn default_graph_path() -> String {
    "graph.yaml".to_string()
}

/// Metadata for one narrated step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct StepMeta {
    /// Unique step identifier.
    pub id: String,

    /// Short label shown in step lists.
    pub label: String,

    /// Optional narration text shown while the step plays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Narration length in milliseconds when no audio is attached.
    ///
    /// Zero or a missing value falls back to the player's default duration.
    #[serde(default)]
    pub duration_ms: u64,

    /// Id of the graph element this step is anchored to.
    pub bpmn_element_id: String,

    /// File name of the recorded narration, relative to the project directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
}

/// A process documentation project.
///
/// # Example
///
/// ```json
/// {
///   "schemaVersion": 1,
///   "name": "Expense approval",
///   "createdAt": "2024-05-01T10:00:00Z",
///   "updatedAt": "2024-05-01T10:00:00Z",
///   "bpmnPath": "diagram.bpmn",
///   "steps": [
///     { "id": "s1", "label": "Submit", "durationMs": 2000, "bpmnElementId": "submit" }
///   ]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    pub schema_version: u32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Path of the diagram source, relative to the project directory.
    #[serde(default = "default_bpmn_path")]
    pub bpmn_path: String,

    /// Path of the flattened process graph the player reads.
    #[serde(default = "default_graph_path")]
    pub graph_path: String,

    /// Steps in authoring order. Order is significant.
    #[serde(default)]
    pub steps: Vec<StepMeta>,
}

impl ProjectManifest {
    /// Create an empty manifest with both timestamps set to now.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION,
            name: name.into(),
            created_at: now,
            updated_at: now,
            bpmn_path: default_bpmn_path(),
            graph_path: default_graph_path(),
            steps: Vec::new(),
        }
    }

    /// Refresh `updated_at` after an edit.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_manifest_is_empty() {
        let manifest = ProjectManifest::new("Onboarding");
        assert_eq!(manifest.schema_version, MANIFEST_SCHEMA_VERSION);
        assert_eq!(manifest.name, "Onboarding");
        assert_eq!(manifest.created_at, manifest.updated_at);
        assert_eq!(manifest.bpmn_path, "diagram.bpmn");
        assert_eq!(manifest.graph_path, "graph.yaml");
        assert!(manifest.steps.is_empty());
    }

    #[test]
    fn test_touch_moves_updated_at_forward() {
        let mut manifest = ProjectManifest::new("Onboarding");
        let created = manifest.created_at;
        manifest.touch();
        assert!(manifest.updated_at >= created);
        assert_eq!(manifest.created_at, created);
    }
}
