//! Project scaffolding.
//!
//! This module creates a new project directory, either from the embedded
//! sample (a small expense approval process with a gateway) or as an empty
//! shell for an authoring tool to fill in.
//!
//! # Example
//!
//! ```no_run
//! use pdb_core::init::{generate_project, InitOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("docs/expense"),
//!     minimal: true,
//!     ..InitOptions::default()
//! };
//!
//! generate_project(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_project, InitOptions};
pub use templates::{get_template, list_templates};
