mod app;
mod commands;
mod input;
mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use app::PlayOptions;

#[derive(Parser)]
#[command(name = "pdb-player", version, about = "Play narrated walkthroughs of process diagrams")]
struct Cli {
    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project directory
    Init {
        /// Directory to create the project in
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Project name
        #[arg(long)]
        name: Option<String>,
        /// Overwrite an existing project
        #[arg(long)]
        force: bool,
        /// Create an empty project instead of the sample
        #[arg(long)]
        minimal: bool,
    },
    /// Report steps that playback cannot reach or place
    Check {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Play a project in the terminal
    Play {
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Wait for input after every step
        #[arg(long)]
        manual: bool,
        /// Do not wait for narration
        #[arg(long)]
        instant: bool,
        /// Print playback events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "pdb_core=debug,pdb_player=debug,warn",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init {
            dir,
            name,
            force,
            minimal,
        } => commands::init(dir, name, force, minimal).await,
        Commands::Check { dir } => commands::check(&dir).await,
        Commands::Play {
            dir,
            manual,
            instant,
            json,
        } => {
            app::play(
                &dir,
                PlayOptions {
                    manual,
                    instant,
                    json,
                },
            )
            .await
        }
    }
}
