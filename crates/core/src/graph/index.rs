//! Read-only adjacency index over an imported process graph.
//!
//! The index is rebuilt from the graph export on every (re)import and is
//! never mutated afterwards. Lookups of unknown ids return nothing; callers
//! treat a missing node as a dead end.

use pdb_protocol::graph_models::{NodeKind, ProcessGraph};
use std::collections::HashMap;
use tracing::warn;

/// A node as seen by the sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessNode {
    pub id: String,
    pub name: Option<String>,
    pub kind: NodeKind,
    /// Outgoing flow ids in the order they should be explored and offered.
    pub outgoing: Vec<String>,
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessFlow {
    pub id: String,
    pub source: String,
    pub target: String,
    pub name: Option<String>,
}

/// Immutable adjacency view with O(1) node, flow and outgoing lookups.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    nodes: HashMap<String, ProcessNode>,
    flows: HashMap<String, ProcessFlow>,
    outgoing: HashMap<String, Vec<ProcessFlow>>,
}

impl GraphIndex {
    /// Build the index from a graph export.
    ///
    /// Malformed input never fails the build:
    /// - a duplicate node or flow id keeps the first declaration
    /// - a flow whose source is unknown is dropped
    /// - a flow whose target is unknown is kept, and leads nowhere
    /// - an explicit `outgoing` list decides the order of a node's flows;
    ///   flows it does not mention follow in declaration order
    pub fn build(graph: &ProcessGraph) -> Self {
        let mut nodes: HashMap<String, ProcessNode> = HashMap::new();
        let mut explicit_order: HashMap<String, Vec<String>> = HashMap::new();

        for node in &graph.nodes {
            if nodes.contains_key(&node.id) {
                warn!(node_id = %node.id, "duplicate node id in graph, keeping the first");
                continue;
            }
            if let Some(order) = &node.outgoing {
                explicit_order.insert(node.id.clone(), order.clone());
            }
            nodes.insert(
                node.id.clone(),
                ProcessNode {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    kind: node.kind(),
                    outgoing: Vec::new(),
                },
            );
        }

        let mut flows: HashMap<String, ProcessFlow> = HashMap::new();
        let mut declared: HashMap<String, Vec<ProcessFlow>> = HashMap::new();

        for flow in &graph.flows {
            if flows.contains_key(&flow.id) {
                warn!(flow_id = %flow.id, "duplicate flow id in graph, keeping the first");
                continue;
            }
            if !nodes.contains_key(&flow.source) {
                warn!(flow_id = %flow.id, source = %flow.source, "flow from unknown node dropped");
                continue;
            }
            let flow = ProcessFlow {
                id: flow.id.clone(),
                source: flow.source.clone(),
                target: flow.target.clone(),
                name: flow.name.clone(),
            };
            declared
                .entry(flow.source.clone())
                .or_default()
                .push(flow.clone());
            flows.insert(flow.id.clone(), flow);
        }

        let mut outgoing: HashMap<String, Vec<ProcessFlow>> = HashMap::new();
        for (node_id, node) in nodes.iter_mut() {
            let mut remaining = declared.remove(node_id).unwrap_or_default();
            let mut ordered = Vec::with_capacity(remaining.len());

            if let Some(order) = explicit_order.get(node_id) {
                for flow_id in order {
                    match remaining.iter().position(|f| &f.id == flow_id) {
                        Some(idx) => ordered.push(remaining.remove(idx)),
                        None => {
                            warn!(node_id = %node_id, flow_id = %flow_id, "outgoing entry does not leave this node")
                        }
                    }
                }
            }
            ordered.append(&mut remaining);

            node.outgoing = ordered.iter().map(|f| f.id.clone()).collect();
            if !ordered.is_empty() {
                outgoing.insert(node_id.clone(), ordered);
            }
        }

        Self {
            nodes,
            flows,
            outgoing,
        }
    }

    pub fn node(&self, id: &str) -> Option<&ProcessNode> {
        self.nodes.get(id)
    }

    pub fn flow(&self, id: &str) -> Option<&ProcessFlow> {
        self.flows.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Outgoing flows of a node in exploration order. Empty for unknown ids.
    pub fn outgoing(&self, id: &str) -> &[ProcessFlow] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kind of a node, if it exists.
    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        self.nodes.get(id).map(|n| n.kind)
    }

    /// Display label of a flow: its own name, else the target's name, else the target id.
    pub fn flow_label(&self, flow: &ProcessFlow) -> String {
        if let Some(name) = flow.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        self.nodes
            .get(&flow.target)
            .and_then(|n| n.name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(flow.target.as_str())
            .to_string()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }
}

impl From<&ProcessGraph> for GraphIndex {
    fn from(graph: &ProcessGraph) -> Self {
        Self::build(graph)
    }
}
