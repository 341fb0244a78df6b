//! Static checks of a project before playback.
//!
//! Nothing here blocks playback: the sequencer tolerates every problem
//! reported below by treating it as a dead end. The checks exist so authors
//! can find those dead ends before an audience does.

use crate::graph::{reachable_from, GraphIndex};
use crate::steps::StepIndex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The project has no steps, so playback stays idle.
    NoSteps,
    /// A step is anchored to a node the graph does not contain.
    UnknownNode {
        position: usize,
        step_id: String,
        node_id: String,
    },
    /// Several steps share one node.
    SharedNode {
        node_id: String,
        positions: Vec<usize>,
    },
    /// No path leads from the first step's node to this step's node.
    Unreachable {
        position: usize,
        step_id: String,
        node_id: String,
    },
    /// A step names an audio file that is not in the project.
    MissingAudio { step_id: String, audio_file: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::UnknownNode { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoSteps => write!(f, "project has no steps"),
            Diagnostic::UnknownNode {
                position,
                step_id,
                node_id,
            } => write!(
                f,
                "step {} (#{}) is anchored to unknown element '{}'",
                step_id,
                position + 1,
                node_id
            ),
            Diagnostic::SharedNode { node_id, positions } => {
                let positions: Vec<String> = positions.iter().map(|p| format!("#{}", p + 1)).collect();
                write!(
                    f,
                    "element '{}' hosts several steps ({})",
                    node_id,
                    positions.join(", ")
                )
            }
            Diagnostic::Unreachable {
                position,
                step_id,
                node_id,
            } => write!(
                f,
                "step {} (#{}) on '{}' cannot be reached from the first step",
                step_id,
                position + 1,
                node_id
            ),
            Diagnostic::MissingAudio {
                step_id,
                audio_file,
            } => write!(
                f,
                "step {} narrates '{}' but the file is missing, a timer is used instead",
                step_id, audio_file
            ),
        }
    }
}

/// Check steps against the graph.
pub fn diagnose(graph: &GraphIndex, steps: &StepIndex) -> Vec<Diagnostic> {
    let mut found = Vec::new();

    let Some(first_node) = steps.node_id_of(0) else {
        found.push(Diagnostic::NoSteps);
        return found;
    };

    for step in steps.iter() {
        if !graph.contains(&step.node_id) {
            found.push(Diagnostic::UnknownNode {
                position: step.position,
                step_id: step.id.clone(),
                node_id: step.node_id.clone(),
            });
        }
    }

    for step in steps.iter() {
        let positions = steps.positions_for_node(&step.node_id);
        // Reported once, at the first step on the node.
        if positions.len() > 1 && positions[0] == step.position {
            found.push(Diagnostic::SharedNode {
                node_id: step.node_id.clone(),
                positions: positions.to_vec(),
            });
        }
    }

    let reached = reachable_from(graph, first_node);
    if !reached.is_empty() {
        for step in steps.iter().skip(1) {
            if graph.contains(&step.node_id) && !reached.contains(&step.node_id) {
                found.push(Diagnostic::Unreachable {
                    position: step.position,
                    step_id: step.id.clone(),
                    node_id: step.node_id.clone(),
                });
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_graphs::{graph, steps};

    #[test]
    fn test_clean_project_has_no_findings() {
        let g = graph(
            &[("A", "bpmn:Task"), ("B", "bpmn:Task")],
            &[("f1", "A", "B")],
        );
        assert!(diagnose(&g, &steps(&["A", "B"])).is_empty());
    }

    #[test]
    fn test_no_steps() {
        let g = graph(&[("A", "bpmn:Task")], &[]);
        assert_eq!(diagnose(&g, &steps(&[])), vec![Diagnostic::NoSteps]);
    }

    #[test]
    fn test_shared_nodes_reported_once_in_step_order() {
        let g = graph(
            &[("A", "bpmn:Task"), ("B", "bpmn:Task")],
            &[("f1", "A", "B"), ("f2", "B", "A")],
        );
        let found = diagnose(&g, &steps(&["B", "A", "B", "A", "B"]));

        assert_eq!(
            found,
            vec![
                Diagnostic::SharedNode {
                    node_id: "B".to_string(),
                    positions: vec![0, 2, 4],
                },
                Diagnostic::SharedNode {
                    node_id: "A".to_string(),
                    positions: vec![1, 3],
                },
            ]
        );
    }

    #[test]
    fn test_findings() {
        let g = graph(
            &[("A", "bpmn:Task"), ("B", "bpmn:Task"), ("Island", "bpmn:Task")],
            &[("f1", "A", "B"), ("f2", "B", "A")],
        );
        let found = diagnose(&g, &steps(&["A", "B", "Ghost", "Island", "A"]));

        assert_eq!(
            found,
            vec![
                Diagnostic::UnknownNode {
                    position: 2,
                    step_id: "s2".to_string(),
                    node_id: "Ghost".to_string(),
                },
                Diagnostic::SharedNode {
                    node_id: "A".to_string(),
                    positions: vec![0, 4],
                },
                Diagnostic::Unreachable {
                    position: 3,
                    step_id: "s3".to_string(),
                    node_id: "Island".to_string(),
                },
            ]
        );
        assert_eq!(found[0].severity(), Severity::Error);
        assert_eq!(found[2].severity(), Severity::Warning);
        assert_eq!(
            found[1].to_string(),
            "element 'A' hosts several steps (#1, #5)"
        );
    }
}
