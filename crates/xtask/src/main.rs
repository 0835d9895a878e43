//! Development tasks for the thing engine
//!
//! This binary provides content inspection and simulation tools using the
//! cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod source;

use anyhow::Result;
use clap::Parser;
use commands::{Classify, Reach, Simulate};

/// Development tasks for the thing engine
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Content analysis and simulation tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Classify every template as permanent solid decoration or not
    Classify(Classify),

    /// Check whether a template can ever reach a named state
    Reach(Reach),

    /// Spawn the pack's templates and run the world for a number of tics
    Simulate(Simulate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for THING_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Classify(cmd) => cmd.execute(),
        Command::Reach(cmd) => cmd.execute(),
        Command::Simulate(cmd) => cmd.execute(),
    }
}
