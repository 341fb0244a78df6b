//! Narration playback.
//!
//! This module provides the `Narrator` trait (Adapter Pattern) and its
//! implementations:
//! - [`TimerNarrator`]: waits for the step's duration
//! - [`CommandNarrator`]: plays the recorded clip through an external player
//! - [`MockNarrator`]: scripted outcomes for tests
//!
//! Every narration ends exactly one way, reported as a [`NarrationEnd`].
//! The controller treats all three ends identically, so a clip that fails
//! to play never stalls playback.

pub mod command;
pub mod mock;
pub mod timer;

pub use command::CommandNarrator;
pub use mock::{MockNarration, MockNarrator};
pub use timer::TimerNarrator;

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;

/// What to narrate for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationRequest {
    pub step_id: String,
    pub position: usize,
    /// Recorded clip, if any.
    pub audio: Option<PathBuf>,
    /// Timer length used when there is no clip.
    pub duration: Duration,
}

/// How a narration ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationEnd {
    Completed,
    Failed(String),
    Stopped,
}

/// Sending half of a stop signal. Stopping is idempotent.
#[derive(Debug)]
pub struct StopTrigger {
    tx: watch::Sender<bool>,
}

impl StopTrigger {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half of a stop signal, handed to whatever is being waited on.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once stop has been requested, or the trigger was dropped.
    pub async fn stopped(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Create a connected trigger/signal pair.
pub fn stop_channel() -> (StopTrigger, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopTrigger { tx }, StopSignal { rx })
}

#[async_trait]
pub trait Narrator: Send + Sync {
    /// Narrate one step until it finishes or `stop` fires.
    ///
    /// Implementations must return promptly once `stop` fires and must have
    /// silenced any playback resource by the time they return.
    async fn narrate(&self, request: NarrationRequest, stop: StopSignal) -> NarrationEnd;
}
