use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unveil_split::{Granularity, RevealPreset};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "unveil")]
#[command(author, version, about = "Split text into fragments and preview staggered reveals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fragments a text splits into
    Split {
        /// Text to split
        text: String,
        /// Split granularity: chars, words or lines
        #[arg(short, long, default_value = "chars")]
        mode: Granularity,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Simulate a reveal in the terminal
    Preview {
        /// Reveal config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the configured text
        #[arg(short, long)]
        text: Option<String>,
        /// Override the configured split granularity
        #[arg(short, long)]
        mode: Option<Granularity>,
        /// Apply a named timing preset before the other overrides
        #[arg(short, long)]
        preset: Option<RevealPreset>,
        /// Frames per simulated second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Reveal only on the first entry
        #[arg(long)]
        once: bool,
        /// Scroll out and back in after the first reveal
        #[arg(long)]
        leave: bool,
    },
    /// Write a default unveil.toml
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "unveil=info",
        1 => "unveil=debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Split { text, mode, json } => commands::split::run(&text, mode, json),
        Commands::Preview {
            config,
            text,
            mode,
            preset,
            fps,
            once,
            leave,
        } => commands::preview::run(commands::preview::PreviewArgs {
            config,
            text,
            mode,
            preset,
            fps,
            once,
            leave,
        }),
        Commands::Init { path, force } => commands::init::run(&path, force),
    }
}
