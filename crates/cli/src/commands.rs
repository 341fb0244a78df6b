//! `init` and `check` subcommands.

use crate::terminal::diagnostic_line;
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use colored::Colorize;
use pdb_core::diagnostics::Severity;
use pdb_core::init::{generate_project, InitOptions};
use pdb_core::session::PlaybackSession;
use std::path::{Path, PathBuf};

pub async fn init(target_dir: PathBuf, name: Option<String>, force: bool, minimal: bool) -> Result<()> {
    let display = target_dir.display().to_string();
    generate_project(InitOptions {
        target_dir,
        name,
        force,
        minimal,
    })
    .await?;

    let kind = if minimal { "empty project" } else { "sample project" };
    println!("{} Created {} in {}", "✔".green(), kind, display.cyan());
    println!("  Play it with: pdb-player play {display}");
    Ok(())
}

/// Print every finding; fail when any of them is an error.
pub async fn check(root: &Path) -> Result<()> {
    let session = PlaybackSession::open(root)
        .await
        .map_err(|e| eyre!("{e:#}"))?;
    let found = session.diagnostics();

    if found.is_empty() {
        println!(
            "{} {} ({} steps) has no problems",
            "✔".green(),
            session.project().name().cyan(),
            session.steps().len()
        );
        return Ok(());
    }

    for diagnostic in &found {
        println!("{}", diagnostic_line(diagnostic));
    }

    let errors = found
        .iter()
        .filter(|d| d.severity() == Severity::Error)
        .count();
    if errors > 0 {
        bail!("{} error(s) in {}", errors, root.display());
    }
    Ok(())
}
