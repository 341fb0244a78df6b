//! Compact graph and step builders shared by unit tests.

use crate::graph::GraphIndex;
use crate::steps::{Step, StepIndex};
use pdb_protocol::graph_models::{GraphFlow, GraphNode, ProcessGraph};

/// Build an index from `(id, type)` nodes and `(id, source, target)` flows.
pub(crate) fn graph(nodes: &[(&str, &str)], flows: &[(&str, &str, &str)]) -> GraphIndex {
    let graph = ProcessGraph {
        nodes: nodes
            .iter()
            .map(|(id, type_tag)| GraphNode {
                id: id.to_string(),
                type_tag: type_tag.to_string(),
                name: None,
                outgoing: None,
            })
            .collect(),
        flows: flows
            .iter()
            .map(|(id, source, target)| GraphFlow {
                id: id.to_string(),
                source: source.to_string(),
                target: target.to_string(),
                name: None,
            })
            .collect(),
    };
    GraphIndex::build(&graph)
}

/// One step per node id, with ids `s0`, `s1`, ...
pub(crate) fn steps(node_ids: &[&str]) -> StepIndex {
    StepIndex::new(
        node_ids
            .iter()
            .enumerate()
            .map(|(i, node_id)| Step {
                id: format!("s{}", i),
                position: i,
                node_id: node_id.to_string(),
                label: format!("Step at {}", node_id),
                duration_ms: 1000,
                description: None,
                audio: None,
            })
            .collect(),
    )
}
