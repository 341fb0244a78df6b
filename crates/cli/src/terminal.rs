//! Terminal rendering of playback events.
//!
//! The controller reports through an `EventRenderer`; this view turns the
//! resulting [`Event`] stream into printable lines. Visited marks have no
//! terminal representation beyond a running count.

use colored::Colorize;
use pdb_core::diagnostics::{Diagnostic, Severity};
use pdb_core::session::PlaybackSession;
use pdb_protocol::ipc::Event;
use pdb_protocol::playback_models::PlaybackPhase;
use std::collections::HashMap;
use tracing::warn;

pub struct TerminalView {
    /// Display label per node id: the first step's label, else the node name.
    labels: HashMap<String, String>,
    phase: PlaybackPhase,
    visited: usize,
    /// Print events as JSON lines instead of text.
    json: bool,
}

impl TerminalView {
    pub fn new(session: &PlaybackSession) -> Self {
        let mut labels = HashMap::new();
        for step in session.steps().iter() {
            labels
                .entry(step.node_id.clone())
                .or_insert_with(|| format!("{}. {}", step.position + 1, step.label));
        }
        for node in &session.project().graph.nodes {
            if let Some(name) = node.name.as_deref().filter(|n| !n.trim().is_empty()) {
                labels
                    .entry(node.id.clone())
                    .or_insert_with(|| name.to_string());
            }
        }
        Self::with_labels(labels)
    }

    pub fn with_labels(labels: HashMap<String, String>) -> Self {
        Self {
            labels,
            phase: PlaybackPhase::Idle,
            visited: 0,
            json: false,
        }
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Number of elements on the visited trail.
    pub fn visited(&self) -> usize {
        self.visited
    }

    fn label<'a>(&'a self, node_id: &'a str) -> &'a str {
        self.labels.get(node_id).map(String::as_str).unwrap_or(node_id)
    }

    /// Apply an event and return what to print for it, if anything.
    pub fn render(&mut self, event: &Event) -> Option<String> {
        match event {
            Event::CurrentHighlighted { node_id } => {
                Some(format!("{} {}", "▶".green(), self.label(node_id).bold()))
            }
            Event::ElementVisited { .. } => {
                self.visited += 1;
                None
            }
            Event::VisitedCleared => {
                self.visited = 0;
                None
            }
            Event::ChoicesPublished { choices } => {
                let mut out = format!("{}", "? Which way?".yellow().bold());
                for (number, choice) in choices.iter().enumerate() {
                    out.push_str(&format!("\n  {}) {}", number + 1, choice.label));
                }
                out.push_str(&format!(
                    "\n  {}",
                    "type a number to choose, d to stop here".dimmed()
                ));
                Some(out)
            }
            Event::NarrationText { text: Some(text) } => Some(format!("  {}", text.dimmed())),
            Event::EndPulsed { node_id } => Some(format!(
                "{} {}",
                "■".cyan(),
                format!("Reached {}", self.label(node_id)).cyan()
            )),
            Event::PhaseChanged { snapshot } => {
                let previous = std::mem::replace(&mut self.phase, snapshot.phase);
                match snapshot.phase {
                    PlaybackPhase::Finished if previous != PlaybackPhase::Finished => Some(format!(
                        "{} {}",
                        "✔".green(),
                        "Finished".green().bold()
                    )),
                    PlaybackPhase::Idle if previous != PlaybackPhase::Idle => Some(format!(
                        "{} {}",
                        "✖".yellow(),
                        "Playback cancelled".yellow()
                    )),
                    _ => None,
                }
            }
            Event::CurrentCleared { .. }
            | Event::ChoicesCleared
            | Event::NarrationText { text: None } => None,
        }
    }

    pub fn print(&mut self, event: &Event) {
        let line = self.render(event);
        if self.json {
            match serde_json::to_string(event) {
                Ok(json) => println!("{json}"),
                Err(error) => warn!(%error, "failed to serialize event"),
            }
        } else if let Some(line) = line {
            println!("{line}");
        }
    }
}

/// One line per finding, prefixed by its severity.
pub fn diagnostic_line(diagnostic: &Diagnostic) -> String {
    let prefix = match diagnostic.severity() {
        Severity::Error => "error:".red().bold(),
        Severity::Warning => "warning:".yellow().bold(),
    };
    format!("{prefix} {diagnostic}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdb_protocol::playback_models::{Choice, PlaybackSnapshot};

    fn view() -> TerminalView {
        colored::control::set_override(false);
        let labels = HashMap::from([
            ("review".to_string(), "2. Manager review".to_string()),
            ("paid".to_string(), "Claim paid".to_string()),
        ]);
        TerminalView::with_labels(labels)
    }

    fn phase(phase: PlaybackPhase) -> Event {
        Event::PhaseChanged {
            snapshot: PlaybackSnapshot {
                phase,
                current_position: None,
                run_id: None,
            },
        }
    }

    #[test]
    fn test_highlight_uses_step_label() {
        let mut view = view();
        let line = view.render(&Event::CurrentHighlighted {
            node_id: "review".to_string(),
        });
        assert_eq!(line.as_deref(), Some("▶ 2. Manager review"));

        let line = view.render(&Event::CurrentHighlighted {
            node_id: "unnamed".to_string(),
        });
        assert_eq!(line.as_deref(), Some("▶ unnamed"));
    }

    #[test]
    fn test_choices_are_numbered_from_one() {
        let mut view = view();
        let line = view
            .render(&Event::ChoicesPublished {
                choices: vec![
                    Choice {
                        label: "Approved".to_string(),
                        target_position: 4,
                        flow_id: "f-approve".to_string(),
                    },
                    Choice {
                        label: "Needs changes".to_string(),
                        target_position: 3,
                        flow_id: "f-changes".to_string(),
                    },
                ],
            })
            .expect("choices should print");

        assert!(line.contains("1) Approved"));
        assert!(line.contains("2) Needs changes"));
    }

    #[test]
    fn test_visited_count_and_silent_events() {
        let mut view = view();
        for id in ["submit", "f-submit"] {
            assert_eq!(
                view.render(&Event::ElementVisited {
                    element_id: id.to_string()
                }),
                None
            );
        }
        assert_eq!(view.visited(), 2);
        assert_eq!(view.render(&Event::ChoicesCleared), None);
        assert_eq!(view.render(&Event::NarrationText { text: None }), None);

        view.render(&Event::VisitedCleared);
        assert_eq!(view.visited(), 0);
    }

    #[test]
    fn test_diagnostic_line() {
        colored::control::set_override(false);
        assert_eq!(
            diagnostic_line(&Diagnostic::NoSteps),
            "warning: project has no steps"
        );
        let line = diagnostic_line(&Diagnostic::UnknownNode {
            position: 0,
            step_id: "s1".to_string(),
            node_id: "ghost".to_string(),
        });
        assert!(line.starts_with("error: step s1 (#1)"));
    }

    #[test]
    fn test_end_and_phase_lines() {
        let mut view = view();
        assert_eq!(view.render(&phase(PlaybackPhase::PlayingStep)), None);
        assert_eq!(
            view.render(&Event::EndPulsed {
                node_id: "paid".to_string()
            })
            .as_deref(),
            Some("■ Reached Claim paid")
        );
        assert_eq!(
            view.render(&phase(PlaybackPhase::Finished)).as_deref(),
            Some("✔ Finished")
        );
        assert_eq!(view.phase(), PlaybackPhase::Finished);

        assert_eq!(
            view.render(&phase(PlaybackPhase::Idle)).as_deref(),
            Some("✖ Playback cancelled")
        );
        assert_eq!(view.render(&phase(PlaybackPhase::Idle)), None);
    }
}
