//! Content factory for building tables from data files.

use std::path::{Path, PathBuf};

use thing_core::{ActionCatalog, Content, GameConfig, StateTable, TemplateTable};

use crate::loaders::{ConfigLoader, LoadResult, StateLoader, ThingLoader, read_file};

const STATES_FILE: &str = "states.ron";
const THINGS_FILE: &str = "things.ron";
const CONFIG_FILE: &str = "config.toml";

const EMBEDDED_STATES: &str = include_str!("../../data/states.ron");
const EMBEDDED_THINGS: &str = include_str!("../../data/things.ron");
const EMBEDDED_CONFIG: &str = include_str!("../../data/config.toml");

#[derive(Clone, Debug)]
enum Source {
    Dir(PathBuf),
    Embedded,
}

/// Content factory that loads all game content from one source.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── states.ron
/// └── things.ron
/// ```
///
/// [`ContentFactory::embedded`] reads the same three files from the pack
/// compiled into this crate.
#[derive(Clone, Debug)]
pub struct ContentFactory {
    source: Source,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Dir(data_dir.into()),
        }
    }

    /// Creates a factory over the bundled default pack.
    pub fn embedded() -> Self {
        Self {
            source: Source::Embedded,
        }
    }

    /// Returns the data directory path, or `None` for the embedded pack.
    pub fn data_dir(&self) -> Option<&Path> {
        match &self.source {
            Source::Dir(dir) => Some(dir),
            Source::Embedded => None,
        }
    }

    /// Load engine configuration from `config.toml`.
    ///
    /// A data directory without `config.toml` yields the default config.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        match &self.source {
            Source::Dir(dir) => {
                let path = dir.join(CONFIG_FILE);
                if path.exists() {
                    ConfigLoader::load(&path)
                } else {
                    Ok(GameConfig::default())
                }
            }
            Source::Embedded => ConfigLoader::parse(EMBEDDED_CONFIG),
        }
    }

    /// Load the state table from `states.ron`, binding actions through `catalog`.
    pub fn load_states(&self, catalog: &dyn ActionCatalog) -> LoadResult<StateTable> {
        match &self.source {
            Source::Dir(dir) => StateLoader::load(&dir.join(STATES_FILE), catalog),
            Source::Embedded => StateLoader::parse(EMBEDDED_STATES, catalog)
                .map_err(|e| anyhow::anyhow!("embedded {}: {}", STATES_FILE, e)),
        }
    }

    /// Load thing templates from `things.ron` against a loaded state table.
    pub fn load_things(&self, states: &StateTable) -> LoadResult<TemplateTable> {
        match &self.source {
            Source::Dir(dir) => ThingLoader::load(&dir.join(THINGS_FILE), states),
            Source::Embedded => ThingLoader::parse(EMBEDDED_THINGS, states)
                .map_err(|e| anyhow::anyhow!("embedded {}: {}", THINGS_FILE, e)),
        }
    }

    /// Load states and templates together.
    pub fn load_content(&self, catalog: &dyn ActionCatalog) -> LoadResult<Content> {
        let states = self.load_states(catalog)?;
        let templates = self.load_things(&states)?;
        Ok(Content::new(states, templates))
    }

    /// Raw text of one content file, for tools that echo their input.
    pub fn read_source(&self, file: &str) -> LoadResult<String> {
        match &self.source {
            Source::Dir(dir) => read_file(&dir.join(file)),
            Source::Embedded => match file {
                STATES_FILE => Ok(EMBEDDED_STATES.to_owned()),
                THINGS_FILE => Ok(EMBEDDED_THINGS.to_owned()),
                CONFIG_FILE => Ok(EMBEDDED_CONFIG.to_owned()),
                other => anyhow::bail!("embedded pack has no file '{}'", other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::StaticCatalog;
    use thing_core::DecorationClassifier;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Some(Path::new("/tmp/data")));
        assert_eq!(ContentFactory::embedded().data_dir(), None);
    }

    #[test]
    fn embedded_pack_loads() {
        let factory = ContentFactory::embedded();
        let config = factory.load_config().unwrap();
        assert_eq!(config.seed, 24301);

        let content = factory.load_content(&StaticCatalog).unwrap();
        assert!(content.find_template("ZombieMan").is_some());
        assert!(content.states.find("S_PUFF4").is_some());
    }

    #[test]
    fn embedded_pack_classifies() {
        let content = ContentFactory::embedded()
            .load_content(&StaticCatalog)
            .unwrap();
        let classifier = DecorationClassifier::new(&content);
        let classify = |name: &str| {
            let (_, template) = content.find_template(name).unwrap();
            classifier.is_permanent_solid_template(template)
        };

        for permanent in ["TechLamp", "BlueTorch", "Column", "SignalLight"] {
            assert!(classify(permanent), "{permanent} should be permanent");
        }
        for transient in [
            "CrumblingPillar",
            "Candle",
            "ExplosiveBarrel",
            "ZombieMan",
            "DoomImpBall",
            "BulletPuff",
        ] {
            assert!(!classify(transient), "{transient} should not be permanent");
        }
    }

    #[test]
    fn directory_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(STATES_FILE),
            r#"[(name: "S_ROCK", tics: -1, next: "S_NULL")]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(THINGS_FILE),
            r#"[(name: "Rock", flags: "SOLID", states: {"Spawn": "S_ROCK"})]"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), GameConfig::default());
        let content = factory.load_content(&StaticCatalog).unwrap();
        assert_eq!(content.templates.len(), 1);
        assert!(factory.read_source(THINGS_FILE).unwrap().contains("Rock"));
    }
}
