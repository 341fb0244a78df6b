//! The single pending wait of a playback run.
//!
//! A run is only ever suspended on one thing: a step's narration or the
//! user's branch choice. Both are wrapped in a [`Suspension`] that has one
//! cancel path and resolves exactly once.

use crate::narration::{stop_channel, NarrationEnd, NarrationRequest, Narrator, StopTrigger};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::oneshot;

type PendingResolution = Pin<Box<dyn Future<Output = Resolution> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspensionKind {
    Narration,
    Choice,
}

/// How a suspension resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Narration ended, for whatever reason.
    Narrated(NarrationEnd),
    /// The user picked the choice at this index.
    Selected(usize),
    /// The choice prompt was closed without a pick.
    NoSelection,
}

pub struct Suspension {
    kind: SuspensionKind,
    stop: StopTrigger,
    selector: Option<oneshot::Sender<usize>>,
    option_count: usize,
    pending: Option<PendingResolution>,
    resolved: Option<Resolution>,
}

impl Suspension {
    /// Start narrating `request` on a background task.
    ///
    /// Must be called within a tokio runtime. Dropping the suspension stops
    /// the narration.
    pub fn narration(narrator: Arc<dyn Narrator>, request: NarrationRequest) -> Self {
        let (stop, signal) = stop_channel();
        let task = tokio::spawn(async move { narrator.narrate(request, signal).await });
        let pending: PendingResolution = Box::pin(async move {
            match task.await {
                Ok(end) => Resolution::Narrated(end),
                Err(e) => Resolution::Narrated(NarrationEnd::Failed(format!(
                    "narration task failed: {}",
                    e
                ))),
            }
        });

        Self {
            kind: SuspensionKind::Narration,
            stop,
            selector: None,
            option_count: 0,
            pending: Some(pending),
            resolved: None,
        }
    }

    /// Wait for one of `option_count` choices to be selected.
    pub fn choice(option_count: usize) -> Self {
        let (stop, mut signal) = stop_channel();
        let (selector, selection) = oneshot::channel();
        let pending: PendingResolution = Box::pin(async move {
            tokio::select! {
                biased;
                picked = selection => picked.map(Resolution::Selected).unwrap_or(Resolution::NoSelection),
                _ = signal.stopped() => Resolution::NoSelection,
            }
        });

        Self {
            kind: SuspensionKind::Choice,
            stop,
            selector: Some(selector),
            option_count,
            pending: Some(pending),
            resolved: None,
        }
    }

    pub fn kind(&self) -> SuspensionKind {
        self.kind
    }

    /// Deliver a selection. Returns `false` for narration suspensions,
    /// out-of-range indices and repeat selections.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.option_count {
            return false;
        }
        match self.selector.take() {
            Some(selector) => selector.send(index).is_ok(),
            None => false,
        }
    }

    /// Request early resolution. Narration reports `Stopped`, a choice
    /// reports `NoSelection`. Has no effect once resolved.
    pub fn cancel(&self) {
        self.stop.stop();
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Wait for the resolution.
    ///
    /// Cancel-safe: dropping this future mid-wait keeps the underlying
    /// narration in place for the next call. Once resolved, every call
    /// returns the same value.
    pub async fn wait(&mut self) -> Resolution {
        if let Some(pending) = self.pending.as_mut() {
            let resolution = pending.await;
            self.pending = None;
            self.selector = None;
            self.resolved = Some(resolution);
        }
        self.resolved.clone().unwrap_or(Resolution::NoSelection)
    }
}

impl std::fmt::Debug for Suspension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suspension")
            .field("kind", &self.kind)
            .field("option_count", &self.option_count)
            .field("resolved", &self.resolved)
            .finish()
    }
}
