//! Rendering interface between the controller and the host.

use pdb_protocol::ipc::Event;
use pdb_protocol::playback_models::{Choice, PlaybackSnapshot};
use tokio::sync::mpsc::UnboundedSender;

/// Visual side effects requested by the controller.
///
/// Calls arrive in the order the host should apply them. Implementations
/// must not call back into the controller.
pub trait Renderer: Send {
    fn highlight_current(&mut self, node_id: &str);
    fn clear_current(&mut self, node_id: &str);
    fn mark_visited(&mut self, element_id: &str);
    fn clear_all_visited(&mut self);
    fn publish_choices(&mut self, choices: &[Choice]);
    fn clear_choices(&mut self);
    fn show_narration_text(&mut self, text: Option<&str>);

    /// Emphasise the end event playback stopped at.
    fn pulse_end(&mut self, _node_id: &str) {}

    fn phase_changed(&mut self, _snapshot: &PlaybackSnapshot) {}
}

/// Forwards every render call as an [`Event`] over a channel.
#[derive(Debug, Clone)]
pub struct EventRenderer {
    events_tx: UnboundedSender<Event>,
}

impl EventRenderer {
    pub fn new(events_tx: UnboundedSender<Event>) -> Self {
        Self { events_tx }
    }

    fn emit(&self, event: Event) {
        // A closed receiver only means nobody is watching anymore.
        let _ = self.events_tx.send(event);
    }
}

impl Renderer for EventRenderer {
    fn highlight_current(&mut self, node_id: &str) {
        self.emit(Event::CurrentHighlighted {
            node_id: node_id.to_string(),
        });
    }

    fn clear_current(&mut self, node_id: &str) {
        self.emit(Event::CurrentCleared {
            node_id: node_id.to_string(),
        });
    }

    fn mark_visited(&mut self, element_id: &str) {
        self.emit(Event::ElementVisited {
            element_id: element_id.to_string(),
        });
    }

    fn clear_all_visited(&mut self) {
        self.emit(Event::VisitedCleared);
    }

    fn publish_choices(&mut self, choices: &[Choice]) {
        self.emit(Event::ChoicesPublished {
            choices: choices.to_vec(),
        });
    }

    fn clear_choices(&mut self) {
        self.emit(Event::ChoicesCleared);
    }

    fn show_narration_text(&mut self, text: Option<&str>) {
        self.emit(Event::NarrationText {
            text: text.map(str::to_string),
        });
    }

    fn pulse_end(&mut self, node_id: &str) {
        self.emit(Event::EndPulsed {
            node_id: node_id.to_string(),
        });
    }

    fn phase_changed(&mut self, snapshot: &PlaybackSnapshot) {
        self.emit(Event::PhaseChanged {
            snapshot: *snapshot,
        });
    }
}
