//! Timer-based narration for steps without a recorded clip.

use super::{NarrationEnd, NarrationRequest, Narrator, StopSignal};
use async_trait::async_trait;
use std::time::Duration;

/// Waits for the step's duration, ignoring any attached clip.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerNarrator {
    fixed: Option<Duration>,
}

impl TimerNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait `duration` for every step regardless of its own length.
    pub fn fixed(duration: Duration) -> Self {
        Self {
            fixed: Some(duration),
        }
    }
}

#[async_trait]
impl Narrator for TimerNarrator {
    async fn narrate(&self, request: NarrationRequest, mut stop: StopSignal) -> NarrationEnd {
        let duration = self.fixed.unwrap_or(request.duration);
        tokio::select! {
            _ = tokio::time::sleep(duration) => NarrationEnd::Completed,
            _ = stop.stopped() => NarrationEnd::Stopped,
        }
    }
}
