//! Test fixtures for graphs, steps and controllers.

use pdb_core::graph::GraphIndex;
use pdb_core::narration::MockNarrator;
use pdb_core::playback::{ControllerOptions, EventRenderer, PlaybackController};
use pdb_core::steps::StepIndex;
use pdb_protocol::graph_models::{GraphFlow, GraphNode, ProcessGraph};
use pdb_protocol::ipc::Event;
use pdb_protocol::manifest_models::StepMeta;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Upper bound for anything a test waits on.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub fn node(id: &str, type_tag: &str) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        type_tag: type_tag.to_string(),
        name: None,
        outgoing: None,
    }
}

pub fn flow(id: &str, source: &str, target: &str) -> GraphFlow {
    GraphFlow {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        name: None,
    }
}

/// `A -> B -> C`, no end event.
pub fn linear_graph() -> ProcessGraph {
    ProcessGraph {
        nodes: vec![
            node("A", "bpmn:Task"),
            node("B", "bpmn:Task"),
            node("C", "bpmn:Task"),
        ],
        flows: vec![flow("f1", "A", "B"), flow("f2", "B", "C")],
    }
}

/// `A -> G -> {B, C}` with G an exclusive gateway.
pub fn gateway_graph() -> ProcessGraph {
    ProcessGraph {
        nodes: vec![
            node("A", "bpmn:Task"),
            node("G", "bpmn:ExclusiveGateway"),
            node("B", "bpmn:Task"),
            node("C", "bpmn:Task"),
        ],
        flows: vec![
            flow("f-ag", "A", "G"),
            flow("f-gb", "G", "B"),
            flow("f-gc", "G", "C"),
        ],
    }
}

/// `A -> G`, G branching to an end event and to D.
pub fn dead_branch_graph() -> ProcessGraph {
    ProcessGraph {
        nodes: vec![
            node("A", "bpmn:Task"),
            node("G", "bpmn:ExclusiveGateway"),
            node("End", "bpmn:EndEvent"),
            node("D", "bpmn:Task"),
        ],
        flows: vec![
            flow("f-ag", "A", "G"),
            flow("f-end", "G", "End"),
            flow("f-gd", "G", "D"),
        ],
    }
}

/// One step per node, ids `s0`, `s1`, ... and 1s durations.
pub fn steps_on(node_ids: &[&str]) -> StepIndex {
    let metas: Vec<StepMeta> = node_ids
        .iter()
        .enumerate()
        .map(|(i, node_id)| StepMeta {
            id: format!("s{}", i),
            label: format!("Step {}", node_id),
            description: Some(format!("Narration for {}", node_id)),
            duration_ms: 1000,
            bpmn_element_id: node_id.to_string(),
            audio_file: None,
        })
        .collect();
    StepIndex::from_manifest(&metas, 1000, &HashMap::new())
}

/// A controller rendering into an event channel.
pub fn controller_for(
    graph: &ProcessGraph,
    steps: StepIndex,
    narrator: MockNarrator,
) -> (PlaybackController, UnboundedReceiver<Event>) {
    controller_with_options(graph, steps, narrator, ControllerOptions::default())
}

pub fn controller_with_options(
    graph: &ProcessGraph,
    steps: StepIndex,
    narrator: MockNarrator,
    options: ControllerOptions,
) -> (PlaybackController, UnboundedReceiver<Event>) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let controller = PlaybackController::new(
        Arc::new(GraphIndex::build(graph)),
        Arc::new(steps),
        Arc::new(narrator),
        Box::new(EventRenderer::new(tx)),
        options,
    );
    (controller, rx)
}

/// Everything emitted so far, without waiting.
pub fn drain(rx: &mut UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Receive until `matches` accepts an event. Returns every event received,
/// the matching one last.
pub async fn wait_for_event(
    rx: &mut UnboundedReceiver<Event>,
    matches: impl Fn(&Event) -> bool,
) -> Vec<Event> {
    let mut seen = Vec::new();
    let result = tokio::time::timeout(TEST_TIMEOUT, async {
        while let Some(event) = rx.recv().await {
            let done = matches(&event);
            seen.push(event);
            if done {
                return true;
            }
        }
        false
    })
    .await;

    assert!(
        matches!(result, Ok(true)),
        "expected event never arrived, saw: {:?}",
        seen
    );
    seen
}
