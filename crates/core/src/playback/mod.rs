//! Playback runtime: the state machine, its single suspension point, the
//! renderer interface and the controller tying them together.

pub mod controller;
pub mod renderer;
pub mod state;
pub mod suspension;

pub use controller::{ControllerOptions, PlaybackController};
pub use renderer::{EventRenderer, Renderer};
pub use state::{PendingChoice, PlaybackState, StateEvent};
pub use suspension::{Resolution, Suspension, SuspensionKind};
