//! Content source selection shared by every command.

use std::path::PathBuf;

use clap::Args;
use thing_content::ContentFactory;

#[derive(Args, Debug)]
pub struct ContentSource {
    /// Content directory with states.ron, things.ron and config.toml.
    /// Falls back to the bundled pack when neither this nor THING_DATA_DIR
    /// is set.
    #[arg(short, long, value_name = "DIR", env = "THING_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl ContentSource {
    pub fn factory(&self) -> ContentFactory {
        match &self.data_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "loading content directory");
                ContentFactory::new(dir)
            }
            None => ContentFactory::embedded(),
        }
    }

    /// Human-readable name of the source.
    pub fn describe(&self) -> String {
        match &self.data_dir {
            Some(dir) => dir.display().to_string(),
            None => String::from("<embedded>"),
        }
    }
}
