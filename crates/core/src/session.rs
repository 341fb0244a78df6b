//! Session facade.
//!
//! A [`PlaybackSession`] is one loaded project with its graph and step
//! indexes built. Hosts open a session, then create controllers from it; the
//! indexes are shared, so controllers are cheap.

use crate::config::{load_project, Project};
use crate::diagnostics::{diagnose, Diagnostic};
use crate::graph::GraphIndex;
use crate::narration::{CommandNarrator, Narrator, TimerNarrator};
use crate::playback::{ControllerOptions, PlaybackController, Renderer};
use crate::sequencer::Sequencer;
use crate::steps::StepIndex;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct PlaybackSession {
    project: Project,
    graph: Arc<GraphIndex>,
    steps: Arc<StepIndex>,
}

impl PlaybackSession {
    /// Load the project at `root` and build its indexes.
    pub async fn open(root: &Path) -> Result<Self> {
        let project = load_project(root)
            .await
            .with_context(|| format!("Failed to open project at {}", root.display()))?;
        Ok(Self::from_project(project))
    }

    pub fn from_project(project: Project) -> Self {
        let graph = GraphIndex::build(&project.graph);
        let steps = StepIndex::from_manifest(
            &project.manifest.steps,
            project.player.default_duration_ms,
            &project.audio_files,
        );

        info!(
            project = %project.name(),
            steps = steps.len(),
            nodes = graph.node_count(),
            flows = graph.flow_count(),
            "session opened"
        );

        Self {
            project,
            graph: Arc::new(graph),
            steps: Arc::new(steps),
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn graph(&self) -> &GraphIndex {
        &self.graph
    }

    pub fn steps(&self) -> &StepIndex {
        &self.steps
    }

    pub fn options(&self) -> ControllerOptions {
        ControllerOptions::from(&self.project.player)
    }

    pub fn sequencer(&self) -> Sequencer<'_> {
        Sequencer::new(&self.graph, &self.steps, self.options().policy)
    }

    pub fn controller(
        &self,
        narrator: Arc<dyn Narrator>,
        renderer: Box<dyn Renderer>,
    ) -> PlaybackController {
        PlaybackController::new(
            Arc::clone(&self.graph),
            Arc::clone(&self.steps),
            narrator,
            renderer,
            self.options(),
        )
    }

    /// An external audio player when one is available, otherwise a timer.
    pub fn default_narrator(&self) -> Arc<dyn Narrator> {
        match CommandNarrator::discover(&self.project.player) {
            Some(narrator) => {
                debug!(player = %narrator.program().display(), "narrating with audio player");
                Arc::new(narrator)
            }
            None => {
                debug!("no audio player found, narrating with timer");
                Arc::new(TimerNarrator::new())
            }
        }
    }

    /// Static findings about the project, in step order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut found = diagnose(&self.graph, &self.steps);

        for meta in &self.project.manifest.steps {
            if let Some(audio_file) = &meta.audio_file {
                if !self.project.audio_files.contains_key(audio_file) {
                    found.push(Diagnostic::MissingAudio {
                        step_id: meta.id.clone(),
                        audio_file: audio_file.clone(),
                    });
                }
            }
        }

        found
    }
}
