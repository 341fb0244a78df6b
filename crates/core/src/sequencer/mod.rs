//! Branching playback decisions.
//!
//! The sequencer is pure: every call takes a step position and answers from
//! the immutable graph and step indexes. It never touches playback state.
//!
//! Continuations are resolved by scanning step positions in ascending
//! authored order and taking the first one whose node is reachable. Authors
//! lay steps out in narrative order, so the first reachable step is the one
//! the story gets to soonest. This is deliberately not a graph-distance
//! metric.

use crate::graph::{reachable_from, reachable_from_flows, shortest_path, GraphIndex, ReachableSet};
use crate::steps::StepIndex;
use pdb_protocol::graph_models::NodeKind;
use pdb_protocol::playback_models::Choice;
use tracing::debug;

/// Tunable resolution policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequencerPolicy {
    /// When nothing ahead is reachable and no end event is reached, look for
    /// a reachable step at or before the current position.
    pub wrap_around: bool,
}

/// How a linear continuation was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextVia {
    /// A later step is reachable through the graph.
    Forward,
    /// An earlier (or the same) step is reachable and wrap-around is enabled.
    WrapAround,
    /// Nothing reachable; the next step in authoring order was taken.
    Sequential,
}

/// Result of linear resolution from a non-gateway step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinearNext {
    pub target: Option<usize>,
    /// An end event is reachable and no later step is.
    pub reaches_end: bool,
    /// First end event found, in BFS order.
    pub end_node: Option<String>,
    pub via: Option<NextVia>,
}

/// Graph elements to mark visited for one transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trail {
    pub nodes: Vec<String>,
    pub flows: Vec<String>,
}

/// What should happen once the step at a position completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The step sits on a gateway; offer these branches.
    Choose(Vec<Choice>),
    /// Continue with the step at this position.
    Advance(usize),
    /// No step follows, but the process ends at this end event.
    ReachedEnd { end_node: String },
    /// Nothing follows.
    Terminal,
}

/// Stateless decision logic over a graph and its steps.
#[derive(Debug, Clone, Copy)]
pub struct Sequencer<'a> {
    graph: &'a GraphIndex,
    steps: &'a StepIndex,
    policy: SequencerPolicy,
}

impl<'a> Sequencer<'a> {
    pub fn new(graph: &'a GraphIndex, steps: &'a StepIndex, policy: SequencerPolicy) -> Self {
        Self {
            graph,
            steps,
            policy,
        }
    }

    /// Decide the continuation after the step at `position`.
    ///
    /// Gateways short-circuit to their choices and are never advanced past.
    /// A gateway whose branches all dead-end finishes the run, at the end
    /// event when one is reachable.
    pub fn decide(&self, position: usize) -> Decision {
        let Some(node_id) = self.steps.node_id_of(position) else {
            return Decision::Terminal;
        };

        if self.graph.kind_of(node_id).is_some_and(NodeKind::is_gateway) {
            let choices = self.compute_choices(position);
            if !choices.is_empty() {
                return Decision::Choose(choices);
            }
            debug!(position, node_id, "every gateway branch dead-ends");
            return match self.first_end_node(&reachable_from_flows(self.graph, node_id)) {
                Some(end_node) => Decision::ReachedEnd { end_node },
                None => Decision::Terminal,
            };
        }

        let next = self.compute_linear_next(position);
        match (next.target, next.end_node) {
            (Some(target), _) => Decision::Advance(target),
            (None, Some(end_node)) if next.reaches_end => Decision::ReachedEnd { end_node },
            _ => Decision::Terminal,
        }
    }

    /// Branches offered at the gateway step at `position`.
    ///
    /// One entry per outgoing flow that leads to some later step, in flow
    /// declaration order. Flows leading nowhere are dropped; flows resolving
    /// to the same step stay separate choices. Non-gateway steps have none.
    pub fn compute_choices(&self, position: usize) -> Vec<Choice> {
        let Some(node_id) = self.steps.node_id_of(position) else {
            return Vec::new();
        };
        if !self.graph.kind_of(node_id).is_some_and(NodeKind::is_gateway) {
            return Vec::new();
        }

        self.graph
            .outgoing(node_id)
            .iter()
            .filter_map(|flow| {
                let reached = reachable_from(self.graph, &flow.target);
                match self.first_reachable_after(position, &reached) {
                    Some(target_position) => Some(Choice {
                        label: self.graph.flow_label(flow),
                        target_position,
                        flow_id: flow.id.clone(),
                    }),
                    None => {
                        debug!(flow_id = %flow.id, "branch reaches no later step, dropped");
                        None
                    }
                }
            })
            .collect()
    }

    /// Linear continuation from the step at `position`.
    ///
    /// Resolution order:
    /// 1. the first later step reachable through the node's outgoing flows
    /// 2. no target, `reaches_end`, when an end event is reachable
    /// 3. with wrap-around enabled, the first reachable step at or before `position`
    /// 4. the next step in authoring order, if its node exists in the graph
    /// 5. no target
    pub fn compute_linear_next(&self, position: usize) -> LinearNext {
        let Some(node_id) = self.steps.node_id_of(position) else {
            return LinearNext::default();
        };
        let reached = reachable_from_flows(self.graph, node_id);

        if let Some(target) = self.first_reachable_after(position, &reached) {
            return LinearNext {
                target: Some(target),
                via: Some(NextVia::Forward),
                ..LinearNext::default()
            };
        }

        if let Some(end_node) = self.first_end_node(&reached) {
            return LinearNext {
                reaches_end: true,
                end_node: Some(end_node),
                ..LinearNext::default()
            };
        }

        if self.policy.wrap_around {
            let wrapped = (0..=position).find(|&p| {
                self.steps
                    .node_id_of(p)
                    .is_some_and(|node| reached.contains(node))
            });
            if let Some(target) = wrapped {
                return LinearNext {
                    target: Some(target),
                    via: Some(NextVia::WrapAround),
                    ..LinearNext::default()
                };
            }
        }

        let sequential = position + 1;
        if self
            .steps
            .node_id_of(sequential)
            .is_some_and(|node| self.graph.contains(node))
        {
            return LinearNext {
                target: Some(sequential),
                via: Some(NextVia::Sequential),
                ..LinearNext::default()
            };
        }

        LinearNext::default()
    }

    /// Elements to mark when moving from the step at `from` to the step at `to`.
    ///
    /// The origin node is always included, followed by the intermediate nodes
    /// and every flow of the shortest path between the two step nodes. The
    /// destination node is left for its own step to mark.
    pub fn resolve_trail(&self, from: usize, to: usize) -> Trail {
        let Some(from_node) = self.steps.node_id_of(from) else {
            return Trail::default();
        };
        match self.steps.node_id_of(to) {
            Some(to_node) => self.trail_between(from_node, to_node),
            None => Trail {
                nodes: vec![from_node.to_string()],
                flows: Vec::new(),
            },
        }
    }

    /// Elements to mark when leaving a gateway step through `choice`.
    ///
    /// The trail follows the chosen flow, then the shortest path from that
    /// flow's target to the chosen step.
    pub fn resolve_choice_trail(&self, from: usize, choice: &Choice) -> Trail {
        let Some(from_node) = self.steps.node_id_of(from) else {
            return Trail::default();
        };
        let mut trail = Trail {
            nodes: vec![from_node.to_string()],
            flows: Vec::new(),
        };
        let Some(flow) = self.graph.flow(&choice.flow_id) else {
            return trail;
        };
        trail.flows.push(flow.id.clone());

        let Some(to_node) = self.steps.node_id_of(choice.target_position) else {
            return trail;
        };
        if flow.target == to_node || !self.graph.contains(&flow.target) {
            return trail;
        }

        let rest = self.trail_between(&flow.target, to_node);
        trail.nodes.extend(rest.nodes);
        trail.flows.extend(rest.flows);
        trail
    }

    /// Elements to mark when running from the step at `from` into an end event.
    ///
    /// Unlike step trails, the end node itself is included.
    pub fn resolve_end_trail(&self, from: usize, end_node: &str) -> Trail {
        let Some(from_node) = self.steps.node_id_of(from) else {
            return Trail::default();
        };
        let mut trail = self.trail_between(from_node, end_node);
        if self.graph.contains(end_node) && !trail.nodes.iter().any(|n| n == end_node) {
            trail.nodes.push(end_node.to_string());
        }
        trail
    }

    fn trail_between(&self, from_node: &str, to_node: &str) -> Trail {
        let path = shortest_path(self.graph, from_node, to_node);
        let mut nodes = vec![from_node.to_string()];
        if path.nodes.len() > 2 {
            nodes.extend(path.nodes[1..path.nodes.len() - 1].iter().cloned());
        }
        Trail {
            nodes,
            flows: path.flows,
        }
    }

    fn first_reachable_after(&self, position: usize, reached: &ReachableSet<'_>) -> Option<usize> {
        (position + 1..self.steps.len()).find(|&p| {
            self.steps
                .node_id_of(p)
                .is_some_and(|node| reached.contains(node))
        })
    }

    fn first_end_node(&self, reached: &ReachableSet<'_>) -> Option<String> {
        reached
            .iter()
            .find(|id| self.graph.kind_of(id).is_some_and(NodeKind::is_end))
            .map(str::to_string)
    }
}
