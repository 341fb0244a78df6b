//! Interactive playback in the terminal.

use crate::input::{parse_command, Command, HELP};
use crate::terminal::{diagnostic_line, TerminalView};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use colored::Colorize;
use pdb_core::narration::{Narrator, TimerNarrator};
use pdb_core::playback::{EventRenderer, PlaybackController};
use pdb_core::session::PlaybackSession;
use pdb_protocol::ipc::{Event, Op};
use pdb_protocol::playback_models::{PlaybackPhase, PlaybackSnapshot};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

const OPS_BUFFER: usize = 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayOptions {
    /// Advance only on user input.
    pub manual: bool,
    /// Skip narration waits.
    pub instant: bool,
    /// Emit events as JSON lines.
    pub json: bool,
}

pub async fn play(root: &Path, options: PlayOptions) -> Result<()> {
    let session = PlaybackSession::open(root)
        .await
        .map_err(|e| eyre!("{e:#}"))?;

    if !options.json {
        println!(
            "{} {} ({} steps)",
            "Playing".bold(),
            session.project().name().cyan(),
            session.steps().len()
        );
        for diagnostic in session.diagnostics() {
            println!("{}", diagnostic_line(&diagnostic));
        }
        println!("{}", HELP.dimmed());
    }

    let narrator: Arc<dyn Narrator> = if options.instant {
        Arc::new(TimerNarrator::fixed(Duration::ZERO))
    } else {
        session.default_narrator()
    };
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let controller = session.controller(narrator, Box::new(EventRenderer::new(events_tx)));
    let view = TerminalView::new(&session).json(options.json);
    let lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());

    let snapshot = if options.manual {
        play_manual(controller, view, events_rx, lines).await?
    } else {
        play_continuous(controller, view, events_rx, lines).await?
    };
    debug!(?snapshot, "playback ended");
    Ok(())
}

/// Narration endings advance playback; input lines become ops.
async fn play_continuous<S>(
    mut controller: PlaybackController,
    mut view: TerminalView,
    mut events_rx: mpsc::UnboundedReceiver<Event>,
    mut lines: S,
) -> Result<PlaybackSnapshot>
where
    S: Stream<Item = std::io::Result<String>> + Unpin,
{
    let (ops_tx, ops_rx) = mpsc::channel(OPS_BUFFER);
    let mut run = tokio::spawn(async move { controller.run(ops_rx).await });
    let mut input_open = true;
    let mut dismissed = false;

    loop {
        tokio::select! {
            Some(event) = events_rx.recv() => {
                view.print(&event);
                // Nobody is left to answer a choice once stdin is gone.
                if !input_open && !dismissed && view.phase() == PlaybackPhase::AwaitingChoice {
                    debug!("input closed, dismissing choices");
                    dismissed = true;
                    send_op(&ops_tx, Op::DismissChoices).await;
                }
            }
            line = lines.next(), if input_open => match line {
                Some(Ok(line)) => match parse_command(&line).into_op() {
                    Some(op) => {
                        send_op(&ops_tx, op).await;
                    }
                    None => println!("{}", HELP.dimmed()),
                },
                Some(Err(error)) => {
                    warn!(%error, "failed to read input");
                    input_open = false;
                }
                None => {
                    input_open = false;
                    if view.phase() == PlaybackPhase::AwaitingChoice {
                        dismissed = true;
                        send_op(&ops_tx, Op::DismissChoices).await;
                    }
                }
            },
            Ok(()) = tokio::signal::ctrl_c() => {
                send_op(&ops_tx, Op::Cancel).await;
            }
            result = &mut run => {
                let snapshot = result?;
                while let Ok(event) = events_rx.try_recv() {
                    view.print(&event);
                }
                return Ok(snapshot);
            }
        }
    }
}

/// Every transition waits for a command.
async fn play_manual<S>(
    mut controller: PlaybackController,
    mut view: TerminalView,
    mut events_rx: mpsc::UnboundedReceiver<Event>,
    mut lines: S,
) -> Result<PlaybackSnapshot>
where
    S: Stream<Item = std::io::Result<String>> + Unpin,
{
    controller.start().await;
    flush(&mut view, &mut events_rx);

    while controller.state().is_active() {
        let Some(line) = lines.next().await else {
            controller.cancel().await;
            flush(&mut view, &mut events_rx);
            break;
        };

        match parse_command(&line?) {
            Command::Next => {
                controller.step_once().await;
            }
            Command::Select(index) => {
                if !controller.select_choice(index).await {
                    println!("{}", format!("no choice {}", index + 1).yellow());
                }
            }
            Command::Dismiss => {
                controller.dismiss_choices().await;
            }
            Command::Quit => {
                controller.cancel().await;
            }
            Command::Unknown => println!("{}", HELP.dimmed()),
        }
        flush(&mut view, &mut events_rx);
    }

    Ok(controller.snapshot())
}

/// Returns `false` when the controller has already stopped.
async fn send_op(ops_tx: &mpsc::Sender<Op>, op: Op) -> bool {
    match ops_tx.send(op).await {
        Ok(()) => true,
        Err(error) => {
            debug!(op = ?error.0, "controller stopped, dropping op");
            false
        }
    }
}

fn flush(view: &mut TerminalView, events_rx: &mut mpsc::UnboundedReceiver<Event>) {
    while let Ok(event) = events_rx.try_recv() {
        view.print(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_op_to_running_controller() {
        let (ops_tx, mut ops_rx) = mpsc::channel(1);
        assert!(send_op(&ops_tx, Op::DismissChoices).await);
        assert_eq!(ops_rx.recv().await, Some(Op::DismissChoices));
    }

    #[tokio::test]
    async fn test_send_op_after_controller_stopped() {
        let (ops_tx, ops_rx) = mpsc::channel(1);
        drop(ops_rx);
        assert!(!send_op(&ops_tx, Op::Cancel).await);
    }
}
