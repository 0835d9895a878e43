//! Content loaders for reading game data from files.
//!
//! Every loader has a `load(path, ..)` entry point for files on disk and a
//! `parse(text, ..)` entry point for in-memory sources such as the embedded
//! pack.

pub mod actions;
pub mod config;
pub mod factory;
pub mod states;
pub mod things;

pub use actions::StaticCatalog;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use states::{ArgDef, StateDef, StateLoader};
pub use things::{ThingDef, ThingLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
