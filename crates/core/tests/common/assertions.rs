//! Assertion helpers over render events.

use pdb_protocol::ipc::Event;
use pdb_protocol::playback_models::{Choice, PlaybackPhase};

/// Node ids in the order they were highlighted.
pub fn highlighted(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::CurrentHighlighted { node_id } => Some(node_id.clone()),
            _ => None,
        })
        .collect()
}

/// Element ids in the order they were marked visited.
pub fn visited(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::ElementVisited { element_id } => Some(element_id.clone()),
            _ => None,
        })
        .collect()
}

/// The most recently published choices.
pub fn published_choices(events: &[Event]) -> Option<Vec<Choice>> {
    events.iter().rev().find_map(|e| match e {
        Event::ChoicesPublished { choices } => Some(choices.clone()),
        _ => None,
    })
}

pub fn last_phase(events: &[Event]) -> Option<PlaybackPhase> {
    events.iter().rev().find_map(|e| match e {
        Event::PhaseChanged { snapshot } => Some(snapshot.phase),
        _ => None,
    })
}

pub fn index_of(events: &[Event], wanted: &Event) -> usize {
    events
        .iter()
        .position(|e| e == wanted)
        .unwrap_or_else(|| panic!("{:?} not found in {:?}", wanted, events))
}

/// Replay highlight/clear events and assert at most one node is ever current.
pub fn assert_single_highlight(events: &[Event]) {
    let mut current: Option<&str> = None;
    for event in events {
        match event {
            Event::CurrentHighlighted { node_id } => {
                assert!(
                    current.is_none(),
                    "{} highlighted while {:?} is still current",
                    node_id,
                    current
                );
                current = Some(node_id);
            }
            Event::CurrentCleared { node_id } => {
                assert_eq!(current, Some(node_id.as_str()), "cleared a node that was not current");
                current = None;
            }
            _ => {}
        }
    }
}

/// Assert no element was reported visited twice.
pub fn assert_marks_unique(events: &[Event]) {
    let marks = visited(events);
    let mut seen = std::collections::HashSet::new();
    for mark in &marks {
        assert!(seen.insert(mark), "{} marked twice in {:?}", mark, marks);
    }
}
