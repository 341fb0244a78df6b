//! # pdb-protocol
//!
//! Core protocol definitions and data models for the process documentation player.
//!
//! This crate defines all shared data structures used for:
//! - Project file parsing (`manifest.json`, `graph.yaml`, `player.toml`)
//! - Runtime playback snapshots and branch choices
//! - Communication between a host application and the playback controller
//!
//! ## Modules
//!
//! - [`config_models`]: Player settings from `player.toml`
//! - [`graph_models`]: Flattened process graph export
//! - [`manifest_models`]: Project manifest and step metadata
//! - [`playback_models`]: Playback phase, snapshot and choices
//! - [`ipc`]: Operations and Events between host and controller
//!
//! ## Design Principles
//!
//! - Minimal dependencies: serde, ts-rs, uuid and chrono
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other workspace crates

pub mod config_models;
pub mod graph_models;
pub mod ipc;
pub mod manifest_models;
pub mod playback_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use graph_models::*;
pub use ipc::*;
pub use manifest_models::*;
pub use playback_models::*;
