//! Player configuration models for `player.toml`.
//!
//! This module defines the optional per-project settings that tune playback.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Narration length used when a step has no positive duration.
pub const DEFAULT_STEP_DURATION_MS: u64 = 1000;

fn default_duration_ms() -> u64 {
    DEFAULT_STEP_DURATION_MS
}

fn default_true() -> bool {
    true
}

/// Represents the settings from `player.toml`.
///
/// Every key is optional; a missing file yields `PlayerConfig::default()`.
///
/// # Example
///
/// ```toml
/// # player.toml
/// default_duration_ms = 1500
/// wrap_around = false
/// pulse_end = true
/// audio_player = "ffplay"
/// audio_args = ["-nodisp", "-autoexit", "-loglevel", "quiet"]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct PlayerConfig {
    /// Duration for steps whose manifest entry has no positive `durationMs`.
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,

    /// Allow linear resolution to wrap back to an earlier step when nothing
    /// ahead of the current step is reachable.
    ///
    /// Off by default: a wrapped target may be a step already played in this
    /// run, which turns process loops into endless playback.
    #[serde(default)]
    pub wrap_around: bool,

    /// Pulse-highlight the end event when playback runs out of steps there.
    #[serde(default = "default_true")]
    pub pulse_end: bool,

    /// Command used to play narration audio. Discovered on `PATH` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_player: Option<String>,

    /// Extra arguments passed to the audio player before the file path.
    #[serde(default)]
    pub audio_args: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_STEP_DURATION_MS,
            wrap_around: false,
            pulse_end: true,
            audio_player: None,
            audio_args: Vec::new(),
        }
    }
}
