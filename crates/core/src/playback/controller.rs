//! Playback controller.
//!
//! The controller owns the run state and is the only thing that mutates it.
//! It asks the [`Sequencer`] what comes after each step, drives narration
//! through a [`Narrator`], and reports every visual change to a
//! [`Renderer`].
//!
//! Two ways to drive it:
//! - Manual: call [`PlaybackController::step_once`] and
//!   [`PlaybackController::select_choice`] directly.
//! - Continuous: [`PlaybackController::run`] advances on narration end and
//!   reacts to [`Op`]s from the host.

use super::renderer::Renderer;
use super::state::{PlaybackState, StateEvent};
use super::suspension::{Resolution, Suspension, SuspensionKind};
use crate::graph::GraphIndex;
use crate::narration::{NarrationEnd, NarrationRequest, Narrator};
use crate::sequencer::{Decision, Sequencer, SequencerPolicy, Trail};
use crate::steps::{Step, StepIndex};
use pdb_protocol::config_models::PlayerConfig;
use pdb_protocol::ipc::Op;
use pdb_protocol::playback_models::{Choice, PlaybackPhase, PlaybackSnapshot};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Behaviour switches for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub policy: SequencerPolicy,
    /// Pulse the end event when a run stops there.
    pub pulse_end: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            policy: SequencerPolicy::default(),
            pulse_end: true,
        }
    }
}

impl From<&PlayerConfig> for ControllerOptions {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            policy: SequencerPolicy {
                wrap_around: config.wrap_around,
            },
            pulse_end: config.pulse_end,
        }
    }
}

pub struct PlaybackController {
    graph: Arc<GraphIndex>,
    steps: Arc<StepIndex>,
    narrator: Arc<dyn Narrator>,
    renderer: Box<dyn Renderer>,
    options: ControllerOptions,
    state: PlaybackState,
    suspension: Option<Suspension>,
}

impl PlaybackController {
    pub fn new(
        graph: Arc<GraphIndex>,
        steps: Arc<StepIndex>,
        narrator: Arc<dyn Narrator>,
        renderer: Box<dyn Renderer>,
        options: ControllerOptions,
    ) -> Self {
        Self {
            graph,
            steps,
            narrator,
            renderer,
            options,
            state: PlaybackState::default(),
            suspension: None,
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.snapshot()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.state
            .current_position
            .and_then(|position| self.steps.step_at(position))
    }

    /// Choices on offer while awaiting a selection; empty otherwise.
    pub fn pending_choices(&self) -> &[Choice] {
        self.state
            .pending_choice
            .as_ref()
            .map(|pending| pending.choices.as_slice())
            .unwrap_or(&[])
    }

    /// Begin a new run at step 0, resetting any run in progress.
    pub async fn start(&mut self) -> PlaybackSnapshot {
        if self.state.phase != PlaybackPhase::Idle {
            debug!(phase = ?self.state.phase, "resetting before start");
            self.cancel().await;
        }

        let run_id = Uuid::new_v4();
        self.transition(StateEvent::Started {
            run_id,
            step_count: self.steps.len(),
        });

        if self.state.phase == PlaybackPhase::Idle {
            warn!("no steps to play");
            return self.snapshot();
        }

        info!(%run_id, steps = self.steps.len(), nodes = self.graph.node_count(), "playback started");
        self.begin_step(0);
        self.snapshot()
    }

    /// Perform one completion transition.
    ///
    /// Starts from Idle; stops the narration and completes the current step
    /// from PlayingStep; does nothing otherwise.
    pub async fn step_once(&mut self) -> PlaybackSnapshot {
        match self.state.phase {
            PlaybackPhase::Idle => self.start().await,
            PlaybackPhase::PlayingStep => {
                self.complete_step().await;
                self.snapshot()
            }
            phase => {
                debug!(?phase, "step_once ignored");
                self.snapshot()
            }
        }
    }

    /// Follow the choice at `index`. Returns `false` when no such choice is
    /// on offer.
    pub async fn select_choice(&mut self, index: usize) -> bool {
        if self.state.phase != PlaybackPhase::AwaitingChoice {
            debug!(index, phase = ?self.state.phase, "no choice pending");
            return false;
        }
        let Some(pending) = self.state.pending_choice.clone() else {
            return false;
        };
        let Some(choice) = pending.choices.get(index).cloned() else {
            warn!(index, available = pending.choices.len(), "no such choice");
            return false;
        };

        self.follow_choice(pending.from_position, choice).await;
        true
    }

    /// Close the choice prompt without a selection, ending the run.
    pub async fn dismiss_choices(&mut self) -> PlaybackSnapshot {
        if self.state.phase == PlaybackPhase::AwaitingChoice {
            info!("choices dismissed");
            self.finish().await;
        }
        self.snapshot()
    }

    /// Stop everything and return to Idle with all marks cleared.
    ///
    /// Safe to call from any phase.
    pub async fn cancel(&mut self) -> PlaybackSnapshot {
        self.settle_suspension().await;

        let was = self.state.phase;
        if let Some(node_id) = self.current_node() {
            self.renderer.clear_current(&node_id);
        }
        if self.state.pending_choice.is_some() {
            self.renderer.clear_choices();
        }
        self.renderer.clear_all_visited();
        self.renderer.show_narration_text(None);
        self.transition(StateEvent::Reset);

        if was != PlaybackPhase::Idle {
            info!(from = ?was, "playback cancelled");
        }
        self.notify_phase();
        self.snapshot()
    }

    /// Play continuously until the run finishes or is cancelled.
    ///
    /// Starts a run unless one is already active. Narration endings advance
    /// playback; `ops` delivers host requests. A closed `ops` channel
    /// cancels the run.
    pub async fn run(&mut self, mut ops: mpsc::Receiver<Op>) -> PlaybackSnapshot {
        if !self.state.is_active() {
            self.start().await;
        }

        while self.state.is_active() {
            tokio::select! {
                resolution = wait_for(&mut self.suspension) => {
                    self.suspension = None;
                    self.on_resolution(resolution).await;
                }
                op = ops.recv() => match op {
                    Some(op) => self.handle_op(op).await,
                    None => {
                        debug!("op channel closed");
                        self.cancel().await;
                    }
                },
            }
        }

        self.snapshot()
    }

    async fn handle_op(&mut self, op: Op) {
        debug!(?op, "op received");
        match op {
            Op::StepOnce => {
                if self.state.phase == PlaybackPhase::PlayingStep {
                    if let Some(suspension) = &self.suspension {
                        suspension.cancel();
                    }
                }
            }
            Op::SelectChoice { index } => match self.suspension.as_mut() {
                Some(suspension) if suspension.kind() == SuspensionKind::Choice => {
                    if !suspension.select(index) {
                        warn!(index, "no such choice");
                    }
                }
                _ => debug!(index, "no choice pending"),
            },
            Op::DismissChoices => match &self.suspension {
                Some(suspension) if suspension.kind() == SuspensionKind::Choice => {
                    suspension.cancel();
                }
                _ => debug!("no choice pending"),
            },
            Op::Cancel => {
                self.cancel().await;
            }
        }
    }

    async fn on_resolution(&mut self, resolution: Resolution) {
        match resolution {
            Resolution::Narrated(end) => {
                let step_id = self.current_step().map(|s| s.id.clone()).unwrap_or_default();
                match end {
                    NarrationEnd::Failed(error) => {
                        warn!(%step_id, %error, "narration failed, continuing")
                    }
                    NarrationEnd::Stopped => debug!(%step_id, "narration skipped"),
                    NarrationEnd::Completed => debug!(%step_id, "narration completed"),
                }
                self.complete_step().await;
            }
            Resolution::Selected(index) => {
                self.select_choice(index).await;
            }
            Resolution::NoSelection => {
                self.dismiss_choices().await;
            }
        }
    }

    async fn complete_step(&mut self) {
        if self.state.phase != PlaybackPhase::PlayingStep {
            return;
        }
        let Some(position) = self.state.current_position else {
            return;
        };
        self.settle_suspension().await;

        if let Some(node_id) = self.current_node() {
            self.mark_node(&node_id);
        }

        let decision = self.sequencer().decide(position);
        match decision {
            Decision::Choose(choices) => {
                info!(position, count = choices.len(), "awaiting choice");
                // Hosts see AwaitingChoice before the choices themselves.
                self.suspension = Some(Suspension::choice(choices.len()));
                self.transition(StateEvent::ChoicesOffered {
                    choices: choices.clone(),
                });
                self.notify_phase();
                self.renderer.publish_choices(&choices);
            }
            Decision::Advance(target) => {
                let trail = self.sequencer().resolve_trail(position, target);
                self.move_to(position, target, trail).await;
            }
            Decision::ReachedEnd { end_node } => {
                let trail = self.sequencer().resolve_end_trail(position, &end_node);
                self.mark_trail(&trail);
                if self.options.pulse_end {
                    self.renderer.pulse_end(&end_node);
                }
                info!(position, %end_node, "reached end event");
                self.finish().await;
            }
            Decision::Terminal => {
                info!(position, "nothing further reachable");
                self.finish().await;
            }
        }
    }

    async fn follow_choice(&mut self, from: usize, choice: Choice) {
        self.settle_suspension().await;
        self.renderer.clear_choices();
        info!(from, target = choice.target_position, label = %choice.label, "choice selected");

        let trail = self.sequencer().resolve_choice_trail(from, &choice);
        self.move_to(from, choice.target_position, trail).await;
    }

    /// Leave the step at `from` for the step at `target`. The trail is
    /// marked before the new step is highlighted.
    async fn move_to(&mut self, from: usize, target: usize, trail: Trail) {
        self.settle_suspension().await;
        if let Some(node_id) = self.steps.node_id_of(from) {
            self.renderer.clear_current(node_id);
        }
        self.mark_trail(&trail);
        self.transition(StateEvent::Entered { position: target });
        self.begin_step(target);
    }

    async fn finish(&mut self) {
        self.settle_suspension().await;
        if let Some(node_id) = self.current_node() {
            self.renderer.clear_current(&node_id);
        }
        if self.state.pending_choice.is_some() {
            self.renderer.clear_choices();
        }
        self.renderer.show_narration_text(None);
        self.transition(StateEvent::Finished);

        info!(
            visited_nodes = self.state.visited_nodes.len(),
            visited_flows = self.state.visited_flows.len(),
            "playback finished"
        );
        self.notify_phase();
    }

    /// Highlight the step at `position` and start its narration.
    fn begin_step(&mut self, position: usize) {
        let steps = Arc::clone(&self.steps);
        let Some(step) = steps.step_at(position) else {
            warn!(position, "step out of range");
            return;
        };

        info!(position, step_id = %step.id, node_id = %step.node_id, "entering step");
        self.renderer.highlight_current(&step.node_id);
        self.renderer.show_narration_text(step.description.as_deref());

        let request = NarrationRequest {
            step_id: step.id.clone(),
            position,
            audio: step.audio.clone(),
            duration: step.duration(),
        };
        self.suspension = Some(Suspension::narration(Arc::clone(&self.narrator), request));
        self.notify_phase();
    }

    /// Cancel and drain the active suspension, discarding its resolution.
    async fn settle_suspension(&mut self) {
        if let Some(mut suspension) = self.suspension.take() {
            suspension.cancel();
            let resolution = suspension.wait().await;
            debug!(?resolution, "suspension settled");
        }
    }

    fn sequencer(&self) -> Sequencer<'_> {
        Sequencer::new(&self.graph, &self.steps, self.options.policy)
    }

    fn current_node(&self) -> Option<String> {
        self.state
            .current_position
            .and_then(|position| self.steps.node_id_of(position))
            .map(str::to_string)
    }

    fn mark_node(&mut self, node_id: &str) {
        if self.state.visit_node(node_id) {
            self.renderer.mark_visited(node_id);
        }
    }

    fn mark_trail(&mut self, trail: &Trail) {
        for node_id in &trail.nodes {
            self.mark_node(node_id);
        }
        for flow_id in &trail.flows {
            if self.state.visit_flow(flow_id) {
                self.renderer.mark_visited(flow_id);
            }
        }
    }

    fn transition(&mut self, event: StateEvent) {
        self.state = std::mem::take(&mut self.state).apply(event);
    }

    fn notify_phase(&mut self) {
        let snapshot = self.state.snapshot();
        self.renderer.phase_changed(&snapshot);
    }
}

async fn wait_for(suspension: &mut Option<Suspension>) -> Resolution {
    match suspension {
        Some(suspension) => suspension.wait().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration::MockNarrator;
    use crate::playback::EventRenderer;
    use crate::test_graphs::{graph, steps};
    use pdb_protocol::ipc::Event;

    fn controller(
        graph: GraphIndex,
        steps: StepIndex,
        narrator: MockNarrator,
    ) -> (PlaybackController, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = PlaybackController::new(
            Arc::new(graph),
            Arc::new(steps),
            Arc::new(narrator),
            Box::new(EventRenderer::new(tx)),
            ControllerOptions::default(),
        );
        (controller, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn linear() -> (GraphIndex, StepIndex) {
        (
            graph(
                &[("A", "bpmn:Task"), ("B", "bpmn:Task"), ("End", "bpmn:EndEvent")],
                &[("f1", "A", "B"), ("f2", "B", "End")],
            ),
            steps(&["A", "B"]),
        )
    }

    #[tokio::test]
    async fn test_start_highlights_first_step() {
        let (g, s) = linear();
        let (mut controller, mut rx) = controller(g, s, MockNarrator::until_stopped());

        let snapshot = controller.start().await;
        assert_eq!(snapshot.phase, PlaybackPhase::PlayingStep);
        assert_eq!(snapshot.current_position, Some(0));
        assert!(snapshot.run_id.is_some());

        let events = drain(&mut rx);
        assert_eq!(
            events.first(),
            Some(&Event::CurrentHighlighted {
                node_id: "A".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_start_with_no_steps_stays_idle() {
        let (g, _) = linear();
        let (mut controller, _rx) = controller(g, steps(&[]), MockNarrator::instant());

        let snapshot = controller.start().await;
        assert_eq!(snapshot.phase, PlaybackPhase::Idle);
        assert_eq!(snapshot.current_position, None);
    }

    #[tokio::test]
    async fn test_step_once_marks_trail_before_highlight() {
        let (g, s) = linear();
        let (mut controller, mut rx) = controller(g, s, MockNarrator::until_stopped());
        controller.start().await;
        drain(&mut rx);

        let snapshot = controller.step_once().await;
        assert_eq!(snapshot.current_position, Some(1));

        let events = drain(&mut rx);
        let visited_f1 = events
            .iter()
            .position(|e| matches!(e, Event::ElementVisited { element_id } if element_id == "f1"))
            .unwrap();
        let highlight_b = events
            .iter()
            .position(|e| matches!(e, Event::CurrentHighlighted { node_id } if node_id == "B"))
            .unwrap();
        assert!(visited_f1 < highlight_b);
        assert!(controller.state().visited_nodes.contains("A"));
    }

    #[tokio::test]
    async fn test_step_once_from_idle_starts() {
        let (g, s) = linear();
        let (mut controller, _rx) = controller(g, s, MockNarrator::until_stopped());

        let snapshot = controller.step_once().await;
        assert_eq!(snapshot.phase, PlaybackPhase::PlayingStep);
        assert_eq!(snapshot.current_position, Some(0));
    }

    #[tokio::test]
    async fn test_end_pulse_and_finish() {
        let (g, s) = linear();
        let (mut controller, mut rx) = controller(g, s, MockNarrator::until_stopped());
        controller.start().await;
        controller.step_once().await;
        drain(&mut rx);

        let snapshot = controller.step_once().await;
        assert_eq!(snapshot.phase, PlaybackPhase::Finished);

        let events = drain(&mut rx);
        assert!(events.contains(&Event::EndPulsed {
            node_id: "End".to_string()
        }));
        assert!(controller.state().visited_nodes.contains("End"));
        assert!(controller.state().visited_flows.contains("f2"));

        // Finished ignores further steps.
        assert_eq!(controller.step_once().await.phase, PlaybackPhase::Finished);
    }

    #[tokio::test]
    async fn test_awaiting_choice_reported_before_choices() {
        let g = graph(
            &[
                ("A", "bpmn:Task"),
                ("G", "bpmn:ExclusiveGateway"),
                ("B", "bpmn:Task"),
                ("C", "bpmn:Task"),
            ],
            &[("f1", "A", "G"), ("f2", "G", "B"), ("f3", "G", "C")],
        );
        let (mut controller, mut rx) =
            controller(g, steps(&["A", "G", "B", "C"]), MockNarrator::until_stopped());
        controller.start().await;
        controller.step_once().await;
        drain(&mut rx);

        let snapshot = controller.step_once().await;
        assert_eq!(snapshot.phase, PlaybackPhase::AwaitingChoice);

        let events = drain(&mut rx);
        let awaiting = events
            .iter()
            .position(|e| {
                matches!(e, Event::PhaseChanged { snapshot } if snapshot.phase == PlaybackPhase::AwaitingChoice)
            })
            .unwrap();
        let published = events
            .iter()
            .position(|e| matches!(e, Event::ChoicesPublished { .. }))
            .unwrap();
        assert!(awaiting < published);
        assert_eq!(controller.pending_choices().len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_clears_everything() {
        let (g, s) = linear();
        let (mut controller, mut rx) = controller(g, s, MockNarrator::until_stopped());
        controller.start().await;
        controller.step_once().await;
        drain(&mut rx);

        let snapshot = controller.cancel().await;
        assert_eq!(snapshot.phase, PlaybackPhase::Idle);
        assert_eq!(snapshot.current_position, None);
        assert!(controller.state().visited_nodes.is_empty());
        assert!(controller.state().visited_flows.is_empty());

        let events = drain(&mut rx);
        assert!(events.contains(&Event::VisitedCleared));
        assert!(events.contains(&Event::CurrentCleared {
            node_id: "B".to_string()
        }));

        // Cancel from Idle is harmless.
        assert_eq!(controller.cancel().await.phase, PlaybackPhase::Idle);
    }

    #[tokio::test]
    async fn test_run_plays_to_end() {
        let (g, s) = linear();
        let narrator = MockNarrator::instant();
        let (mut controller, _rx) = controller(g, s, narrator.clone());
        let (_ops_tx, ops_rx) = mpsc::channel(8);

        let snapshot = controller.run(ops_rx).await;

        assert_eq!(snapshot.phase, PlaybackPhase::Finished);
        assert_eq!(narrator.narrated_steps(), vec!["s0", "s1"]);
    }

    #[tokio::test]
    async fn test_run_closed_ops_cancels() {
        let (g, s) = linear();
        let (mut controller, _rx) = controller(g, s, MockNarrator::until_stopped());
        let (ops_tx, ops_rx) = mpsc::channel(8);
        drop(ops_tx);

        let snapshot = controller.run(ops_rx).await;
        assert_eq!(snapshot.phase, PlaybackPhase::Idle);
    }
}
