//! Mock narrator for testing.

use super::{NarrationEnd, NarrationRequest, Narrator, StopSignal};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted outcome of one narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockNarration {
    /// Finish immediately.
    Complete,
    /// Report a playback failure immediately.
    Fail(String),
    /// Run until stopped.
    UntilStopped,
}

#[derive(Clone)]
pub struct MockNarrator {
    fallback: MockNarration,
    script: Arc<Mutex<VecDeque<MockNarration>>>,
    requests: Arc<Mutex<Vec<NarrationRequest>>>,
}

impl MockNarrator {
    /// Play `script` in order, then repeat `fallback`.
    pub fn new(script: Vec<MockNarration>, fallback: MockNarration) -> Self {
        Self {
            fallback,
            script: Arc::new(Mutex::new(script.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn instant() -> Self {
        Self::new(vec![], MockNarration::Complete)
    }

    pub fn failing() -> Self {
        Self::new(vec![], MockNarration::Fail("Mock playback failure".to_string()))
    }

    pub fn until_stopped() -> Self {
        Self::new(vec![], MockNarration::UntilStopped)
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<NarrationRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Step ids narrated so far, in order.
    pub fn narrated_steps(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.step_id).collect()
    }

    fn next_outcome(&self) -> MockNarration {
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl Narrator for MockNarrator {
    async fn narrate(&self, request: NarrationRequest, mut stop: StopSignal) -> NarrationEnd {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        match self.next_outcome() {
            MockNarration::Complete => {
                tokio::task::yield_now().await;
                NarrationEnd::Completed
            }
            MockNarration::Fail(message) => NarrationEnd::Failed(message),
            MockNarration::UntilStopped => {
                stop.stopped().await;
                NarrationEnd::Stopped
            }
        }
    }
}
