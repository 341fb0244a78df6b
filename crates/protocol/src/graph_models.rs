//! Process graph export models for `graph.yaml`.
//!
//! The diagram editor owns the real model. The player only consumes this
//! flattened export: a list of nodes tagged with their element type, and a
//! list of directed flows between them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Classification of a graph node, derived from its element type tag.
///
/// Only two policy checks depend on it: gateways (tags ending in `Gateway`)
/// and terminal events (tags ending in `EndEvent`). Everything else is a
/// pass-through node for the sequencer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Task,
    Event,
    GatewayExclusive,
    GatewayParallel,
    GatewayOther,
    EndEvent,
    Other,
}

impl NodeKind {
    /// Derive the kind from an element type tag such as `bpmn:ExclusiveGateway`.
    ///
    /// Any namespace prefix before the last `:` is ignored.
    pub fn from_type_tag(tag: &str) -> Self {
        let local = tag.rsplit(':').next().unwrap_or(tag);

        if local.ends_with("EndEvent") {
            NodeKind::EndEvent
        } else if local == "ExclusiveGateway" {
            NodeKind::GatewayExclusive
        } else if local == "ParallelGateway" {
            NodeKind::GatewayParallel
        } else if local.ends_with("Gateway") {
            NodeKind::GatewayOther
        } else if local.ends_with("Task") {
            NodeKind::Task
        } else if local.ends_with("Event") {
            NodeKind::Event
        } else {
            NodeKind::Other
        }
    }

    /// Gateways are branch points; the player never advances past them on its own.
    pub fn is_gateway(self) -> bool {
        matches!(
            self,
            NodeKind::GatewayExclusive | NodeKind::GatewayParallel | NodeKind::GatewayOther
        )
    }

    pub fn is_end(self) -> bool {
        self == NodeKind::EndEvent
    }
}

/// A single node of the exported process graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct GraphNode {
    /// Element id, shared with the diagram and with `StepMeta::bpmn_element_id`.
    pub id: String,

    /// Element type tag, e.g. `bpmn:Task` or `bpmn:ExclusiveGateway`.
    #[serde(rename = "type")]
    pub type_tag: String,

    /// Display name, if the element carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Explicit ordering of outgoing flow ids.
    ///
    /// When absent, the flows' declaration order in `ProcessGraph::flows`
    /// is used instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outgoing: Option<Vec<String>>,
}

impl GraphNode {
    pub fn kind(&self) -> NodeKind {
        NodeKind::from_type_tag(&self.type_tag)
    }
}

/// A directed edge between two nodes. There is no implicit reverse edge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct GraphFlow {
    pub id: String,
    pub source: String,
    pub target: String,

    /// Optional display label, typically the condition on a gateway branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The flattened process graph consumed by the player.
///
/// # Example
///
/// ```yaml
/// nodes:
///   - { id: start, type: "bpmn:StartEvent" }
///   - { id: review, type: "bpmn:UserTask", name: Review request }
///   - { id: decide, type: "bpmn:ExclusiveGateway" }
///   - { id: done, type: "bpmn:EndEvent" }
/// flows:
///   - { id: f1, source: start, target: review }
///   - { id: f2, source: review, target: decide }
///   - { id: f3, source: decide, target: done, name: Approved }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct ProcessGraph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,

    #[serde(default)]
    pub flows: Vec<GraphFlow>,
}
