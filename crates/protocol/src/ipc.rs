//! Host <-> player communication protocol.
//!
//! This module defines the message types exchanged between the host
//! application (CLI, desktop shell) and a running playback controller.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands sent from the host to the controller
//! - `Event`: Render requests and status updates sent back to the host
//!
//! Communication is asynchronous and channel-based, so the host stays
//! responsive while narration plays.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::playback_models::{Choice, PlaybackSnapshot};

/// Operations sent from the host to a running controller.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "selectChoice",
///   "payload": { "index": 1 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Finish the current step now instead of waiting for its narration.
    StepOnce,

    /// Pick one of the published choices by its index.
    SelectChoice { index: usize },

    /// Close the choice prompt without picking a branch.
    ///
    /// The run ends as Finished.
    DismissChoices,

    /// Stop playback and clear every mark. The controller returns to Idle.
    Cancel,
}

/// Events sent from the controller to the host.
///
/// Each render request mirrors one call on the renderer interface; the host
/// applies them in the order received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// Highlight the node of the step that is now current.
    CurrentHighlighted { node_id: String },

    /// Remove the current-step highlight from a node.
    CurrentCleared { node_id: String },

    /// Mark a node or flow as part of the visited trail.
    ElementVisited { element_id: String },

    /// Remove every visited mark.
    VisitedCleared,

    /// Offer the user a set of branches to choose from.
    ChoicesPublished { choices: Vec<Choice> },

    /// Withdraw the offered branches.
    ChoicesCleared,

    /// Show (or hide, when `None`) the narration text of the current step.
    NarrationText { text: Option<String> },

    /// Briefly emphasise the end event playback stopped at.
    EndPulsed { node_id: String },

    /// The controller moved to a new phase or position.
    PhaseChanged { snapshot: PlaybackSnapshot },
}
