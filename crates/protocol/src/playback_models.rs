//! Runtime playback models.
//!
//! These are the read-only views of a playback run that hosts bind their UI
//! to. The run state itself lives in the core crate and is never persisted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle phase of a playback run.
///
/// Normal progression: Idle -> PlayingStep -> (AwaitingChoice | PlayingStep) -> Finished.
/// Every phase returns to Idle on cancel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaybackPhase {
    /// No run is active.
    #[default]
    Idle,

    /// A step is highlighted and its narration is playing.
    PlayingStep,

    /// Playback stopped at a gateway and waits for the user to pick a branch.
    AwaitingChoice,

    /// The run ended; nothing further is reachable.
    Finished,
}

/// One user-facing branch offered at a gateway.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Choice {
    /// Label of the outgoing flow (flow name, else target name, else target id).
    pub label: String,

    /// Step position this branch resolves to.
    pub target_position: usize,

    /// The outgoing flow this choice follows.
    pub flow_id: String,
}

/// Read-only snapshot of the controller for UI binding.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
pub struct PlaybackSnapshot {
    pub phase: PlaybackPhase,

    /// Position of the current step; `None` when no step is current.
    pub current_position: Option<usize>,

    /// Identifier of the active run, assigned on start.
    #[ts(type = "string | null")]
    pub run_id: Option<Uuid>,
}
