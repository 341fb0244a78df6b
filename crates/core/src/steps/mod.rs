//! The ordered step sequence.
//!
//! Steps are kept in authoring order; a step's position is its index. The
//! reverse node -> positions map exists for diagnostics only, since the
//! sequencer always reasons from positions it already knows.

use pdb_protocol::config_models::DEFAULT_STEP_DURATION_MS;
use pdb_protocol::manifest_models::StepMeta;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// A narrated waypoint anchored to one graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: String,
    pub position: usize,
    pub node_id: String,
    pub label: String,
    pub duration_ms: u64,
    pub description: Option<String>,
    /// Resolved narration clip, when one is recorded and present on disk.
    pub audio: Option<PathBuf>,
}

impl Step {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Immutable ordered steps plus the node -> positions reverse map.
#[derive(Debug, Clone, Default)]
pub struct StepIndex {
    steps: Vec<Step>,
    by_node: HashMap<String, Vec<usize>>,
}

impl StepIndex {
    /// Build from steps whose `position` fields will be reassigned to their index.
    pub fn new(steps: Vec<Step>) -> Self {
        let mut by_node: HashMap<String, Vec<usize>> = HashMap::new();
        let steps: Vec<Step> = steps
            .into_iter()
            .enumerate()
            .map(|(position, mut step)| {
                step.position = position;
                by_node.entry(step.node_id.clone()).or_default().push(position);
                step
            })
            .collect();

        Self { steps, by_node }
    }

    /// Build from manifest metadata.
    ///
    /// # Arguments
    ///
    /// * `metas` - Steps in authoring order
    /// * `default_duration_ms` - Used when a step's duration is zero
    /// * `audio_files` - Narration files found in the project, by file name
    pub fn from_manifest(
        metas: &[StepMeta],
        default_duration_ms: u64,
        audio_files: &HashMap<String, PathBuf>,
    ) -> Self {
        let fallback = if default_duration_ms > 0 {
            default_duration_ms
        } else {
            DEFAULT_STEP_DURATION_MS
        };

        let steps = metas
            .iter()
            .enumerate()
            .map(|(position, meta)| {
                let audio = meta.audio_file.as_ref().and_then(|name| {
                    let found = audio_files.get(name).cloned();
                    if found.is_none() {
                        warn!(step_id = %meta.id, audio_file = %name, "narration file not found, using timer");
                    }
                    found
                });

                Step {
                    id: meta.id.clone(),
                    position,
                    node_id: meta.bpmn_element_id.clone(),
                    label: meta.label.clone(),
                    duration_ms: if meta.duration_ms > 0 {
                        meta.duration_ms
                    } else {
                        fallback
                    },
                    description: meta.description.clone(),
                    audio,
                }
            })
            .collect();

        Self::new(steps)
    }

    pub fn step_at(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    pub fn node_id_of(&self, position: usize) -> Option<&str> {
        self.steps.get(position).map(|s| s.node_id.as_str())
    }

    /// Positions anchored to `node_id`, ascending.
    pub fn positions_for_node(&self, node_id: &str) -> &[usize] {
        self.by_node.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}
