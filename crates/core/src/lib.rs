//! # pdb-core
//!
//! Branching playback engine for the process documentation player.
//!
//! This crate provides:
//! - Project loading from a directory (`manifest.json`, graph export, `player.toml`)
//! - A read-only graph index and reachability searches
//! - The sequencer deciding what plays after each step
//! - The playback controller driving narration and rendering
//!
//! ## Modules
//!
//! - [`config`]: Project loading
//! - [`graph`]: Graph index and BFS utilities
//! - [`steps`]: Ordered step index
//! - [`sequencer`]: Choice, next-step and trail resolution
//! - [`narration`]: Narrator trait and implementations
//! - [`playback`]: State machine, renderer interface and controller
//! - [`session`]: Facade tying a loaded project to controllers
//! - [`diagnostics`]: Static project checks
//! - [`init`]: Project scaffolding

pub mod config;
pub mod diagnostics;
pub mod graph;
pub mod init;
pub mod narration;
pub mod playback;
pub mod sequencer;
pub mod session;
pub mod steps;

#[cfg(test)]
pub(crate) mod test_graphs;
