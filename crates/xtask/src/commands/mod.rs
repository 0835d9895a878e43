//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod classify;
mod reach;
mod simulate;

pub use classify::Classify;
pub use reach::Reach;
pub use simulate::Simulate;

/// Output format shared by the commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text
    Text,
    /// JSON on stdout
    Json,
}
