//! Encore CLI - animated replay of recorded orchestration scenarios.
//!
//! `encore list` shows the built-in recordings; `encore play <key>`
//! animates one as a chat transcript, with the backstage run panel
//! unveiled at the end.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod render;

/// Encore - replay recorded multi-agent sessions as animated chat
#[derive(Parser)]
#[command(name = "encore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available scenarios
    List,

    /// Play a scenario as an animated transcript
    Play {
        /// Scenario key, as shown by `encore list`
        scenario: String,

        /// Load the scenario from a JSON file instead of the built-ins
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Skip the backstage panel at the end of playback
        #[arg(long)]
        no_backstage: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List => render::list(),
        Commands::Play {
            scenario,
            file,
            no_backstage,
        } => render::play(&scenario, file.as_deref(), !no_backstage).await,
    }
}
