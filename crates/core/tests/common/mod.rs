//! Common test utilities for playback integration tests.
//!
//! This module provides shared functionality across the integration tests:
//! - Graph and step fixtures for the reference scenarios
//! - Controller construction wired to an event channel
//! - Assertions over the emitted render events

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
