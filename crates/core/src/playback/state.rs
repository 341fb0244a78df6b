//! Playback state machine.
//!
//! Phase changes go through [`PlaybackState::apply`], a pure
//! `(state, event) -> state` function. Transitions that are not legal from
//! the current phase leave the state untouched.
//!
//! Visited marks are bookkeeping rather than transitions; the `visit_*`
//! methods report whether an id was newly marked so callers only forward
//! fresh marks to the renderer.

use pdb_protocol::playback_models::{Choice, PlaybackPhase, PlaybackSnapshot};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// Choices offered from a gateway step, awaiting the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChoice {
    pub from_position: usize,
    pub choices: Vec<Choice>,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    /// A new run begins at step 0. Ignored when there are no steps.
    Started { run_id: Uuid, step_count: usize },
    /// A step becomes current.
    Entered { position: usize },
    /// The current step is a gateway with choices.
    ChoicesOffered { choices: Vec<Choice> },
    /// Nothing further can be played.
    Finished,
    /// Back to Idle with everything cleared.
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub phase: PlaybackPhase,
    pub current_position: Option<usize>,
    pub visited_nodes: HashSet<String>,
    pub visited_flows: HashSet<String>,
    pub pending_choice: Option<PendingChoice>,
    pub run_id: Option<Uuid>,
}

impl PlaybackState {
    pub fn apply(self, event: StateEvent) -> Self {
        use PlaybackPhase::*;

        match (self.phase, event) {
            (_, StateEvent::Reset) => Self::default(),

            (Idle, StateEvent::Started { step_count: 0, .. }) => self,
            (Idle, StateEvent::Started { run_id, .. }) => Self {
                phase: PlayingStep,
                current_position: Some(0),
                run_id: Some(run_id),
                ..Self::default()
            },

            (PlayingStep | AwaitingChoice, StateEvent::Entered { position }) => Self {
                phase: PlayingStep,
                current_position: Some(position),
                pending_choice: None,
                ..self
            },

            (PlayingStep, StateEvent::ChoicesOffered { choices }) => match self.current_position {
                Some(from_position) => Self {
                    phase: AwaitingChoice,
                    pending_choice: Some(PendingChoice {
                        from_position,
                        choices,
                    }),
                    ..self
                },
                None => self,
            },

            (PlayingStep | AwaitingChoice, StateEvent::Finished) => Self {
                phase: Finished,
                pending_choice: None,
                ..self
            },

            (phase, event) => {
                debug!(?phase, ?event, "ignoring transition");
                self
            }
        }
    }

    /// Mark a node visited. Returns `true` when it was not yet marked.
    ///
    /// Nothing is marked while Idle.
    pub fn visit_node(&mut self, node_id: &str) -> bool {
        self.phase != PlaybackPhase::Idle && self.visited_nodes.insert(node_id.to_string())
    }

    /// Mark a flow visited. Returns `true` when it was not yet marked.
    pub fn visit_flow(&mut self, flow_id: &str) -> bool {
        self.phase != PlaybackPhase::Idle && self.visited_flows.insert(flow_id.to_string())
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            phase: self.phase,
            current_position: self.current_position,
            run_id: self.run_id,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            PlaybackPhase::PlayingStep | PlaybackPhase::AwaitingChoice
        )
    }
}
