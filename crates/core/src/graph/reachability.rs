//! Breadth-first search utilities over a [`GraphIndex`].
//!
//! Every traversal the sequencer performs goes through this module. Process
//! graphs routinely contain loops, so each search keeps a visited set and
//! runs in O(V+E).

use super::index::{GraphIndex, ProcessFlow};
use std::collections::{HashMap, HashSet, VecDeque};

/// Node ids reached by a search, remembering discovery order.
#[derive(Debug, Clone, Default)]
pub struct ReachableSet<'g> {
    order: Vec<&'g str>,
    seen: HashSet<&'g str>,
}

impl<'g> ReachableSet<'g> {
    fn insert(&mut self, id: &'g str) -> bool {
        if self.seen.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Node ids in BFS discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &'g str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// An ordered walk through the graph.
///
/// `nodes` starts at the origin and ends at the destination; `flows[i]`
/// connects `nodes[i]` to `nodes[i + 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphPath {
    pub nodes: Vec<String>,
    pub flows: Vec<String>,
}

impl GraphPath {
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

/// All nodes reachable from `start`, including `start` itself.
///
/// Returns an empty set when `start` is not in the graph.
pub fn reachable_from<'g>(graph: &'g GraphIndex, start: &str) -> ReachableSet<'g> {
    let mut reached = ReachableSet::default();
    let mut queue = VecDeque::new();

    if let Some(node) = graph.node(start) {
        reached.insert(&node.id);
        queue.push_back(node.id.as_str());
    }

    expand(graph, &mut reached, queue);
    reached
}

/// All nodes reachable through the outgoing flows of `node_id`.
///
/// The node itself is only included when a cycle leads back to it.
pub fn reachable_from_flows<'g>(graph: &'g GraphIndex, node_id: &str) -> ReachableSet<'g> {
    let mut reached = ReachableSet::default();
    let mut queue = VecDeque::new();

    for flow in graph.outgoing(node_id) {
        if let Some(target) = graph.node(&flow.target) {
            if reached.insert(&target.id) {
                queue.push_back(target.id.as_str());
            }
        }
    }

    expand(graph, &mut reached, queue);
    reached
}

fn expand<'g>(graph: &'g GraphIndex, reached: &mut ReachableSet<'g>, mut queue: VecDeque<&'g str>) {
    while let Some(current) = queue.pop_front() {
        for flow in graph.outgoing(current) {
            if let Some(next) = graph.node(&flow.target) {
                if reached.insert(&next.id) {
                    queue.push_back(next.id.as_str());
                }
            }
        }
    }
}

/// Shortest path by edge count from `from` to `to`.
///
/// Ties go to the first-declared flow at each node. The path is empty when
/// `to` is unreachable, when either end is unknown, and when `from == to`
/// unless the node has a self-loop (then the path is that single flow).
pub fn shortest_path(graph: &GraphIndex, from: &str, to: &str) -> GraphPath {
    let (Some(start), Some(goal)) = (graph.node(from), graph.node(to)) else {
        return GraphPath::default();
    };

    if start.id == goal.id {
        return graph
            .outgoing(&start.id)
            .iter()
            .find(|f| f.target == start.id)
            .map(|f| GraphPath {
                nodes: vec![start.id.clone(), start.id.clone()],
                flows: vec![f.id.clone()],
            })
            .unwrap_or_default();
    }

    let mut visited: HashSet<&str> = HashSet::from([start.id.as_str()]);
    let mut via: HashMap<&str, &ProcessFlow> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::from([start.id.as_str()]);

    while let Some(current) = queue.pop_front() {
        for flow in graph.outgoing(current) {
            let Some(next) = graph.node(&flow.target) else {
                continue;
            };
            if !visited.insert(next.id.as_str()) {
                continue;
            }
            via.insert(next.id.as_str(), flow);
            if next.id == goal.id {
                return walk_back(&start.id, &goal.id, &via);
            }
            queue.push_back(next.id.as_str());
        }
    }

    GraphPath::default()
}

fn walk_back(from: &str, to: &str, via: &HashMap<&str, &ProcessFlow>) -> GraphPath {
    let mut flows: Vec<&ProcessFlow> = Vec::new();
    let mut cursor = to;

    while cursor != from {
        let Some(&flow) = via.get(cursor) else {
            return GraphPath::default();
        };
        flows.push(flow);
        cursor = flow.source.as_str();
    }
    flows.reverse();

    let mut nodes = Vec::with_capacity(flows.len() + 1);
    nodes.push(from.to_string());
    nodes.extend(flows.iter().map(|f| f.target.clone()));

    GraphPath {
        nodes,
        flows: flows.iter().map(|f| f.id.clone()).collect(),
    }
}
