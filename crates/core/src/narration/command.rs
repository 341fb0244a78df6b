//! External audio player narration.
//!
//! Recorded clips are handed to a command-line player (`ffplay`, `afplay`,
//! `paplay`, `aplay`) spawned as a child process. Stopping kills the child.
//! Steps without a clip fall back to a timer.

use super::{NarrationEnd, NarrationRequest, Narrator, StopSignal, TimerNarrator};
use async_trait::async_trait;
use pdb_protocol::config_models::PlayerConfig;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Players probed on `PATH`, in order, with the arguments that make them
/// play a file once without opening a window.
const KNOWN_PLAYERS: &[(&str, &[&str])] = &[
    ("ffplay", &["-nodisp", "-autoexit", "-loglevel", "quiet"]),
    ("afplay", &[]),
    ("paplay", &[]),
    ("aplay", &["-q"]),
];

/// Plays clips through an external command.
#[derive(Debug, Clone)]
pub struct CommandNarrator {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandNarrator {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Locate a player using the configuration, then the known players.
    ///
    /// Returns `None` when no player can be found; callers fall back to
    /// timer narration.
    pub fn discover(config: &PlayerConfig) -> Option<Self> {
        if let Some(command) = config.audio_player.as_deref() {
            return match which::which(command) {
                Ok(program) => Some(Self::new(program, config.audio_args.clone())),
                Err(e) => {
                    warn!(command, error = %e, "configured audio player not found");
                    None
                }
            };
        }

        KNOWN_PLAYERS.iter().find_map(|(name, default_args)| {
            let program = which::which(name).ok()?;
            let args = if config.audio_args.is_empty() {
                default_args.iter().map(|a| a.to_string()).collect()
            } else {
                config.audio_args.clone()
            };
            debug!(player = %program.display(), "using audio player");
            Some(Self::new(program, args))
        })
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

#[async_trait]
impl Narrator for CommandNarrator {
    async fn narrate(&self, request: NarrationRequest, mut stop: StopSignal) -> NarrationEnd {
        let Some(clip) = request.audio.clone() else {
            return TimerNarrator::new().narrate(request, stop).await;
        };

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.arg(&clip);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());
        cmd.kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return NarrationEnd::Failed(format!(
                    "Failed to spawn audio player '{}': {}",
                    self.program.display(),
                    e
                ));
            }
        };

        tokio::select! {
            status = child.wait() => match status {
                Ok(status) if status.success() => NarrationEnd::Completed,
                Ok(status) => NarrationEnd::Failed(format!("audio player exited with {}", status)),
                Err(e) => NarrationEnd::Failed(format!("audio player failed: {}", e)),
            },
            _ = stop.stopped() => {
                if let Err(e) = child.kill().await {
                    warn!(step_id = %request.step_id, error = %e, "failed to stop audio player");
                }
                NarrationEnd::Stopped
            }
        }
    }
}
