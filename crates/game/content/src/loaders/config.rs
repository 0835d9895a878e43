//! Engine configuration loader.

use std::path::Path;

use thing_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
///
/// Every key is optional; missing keys take [`GameConfig::default`] values.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))
    }

    pub fn parse(text: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(text)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_things == 0 {
            anyhow::bail!("max_things must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thing_core::CompatMode;

    #[test]
    fn missing_keys_take_defaults() {
        let config = ConfigLoader::parse("seed = 42\n").unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.compat, CompatMode::Modern);
        assert_eq!(config.max_things, GameConfig::DEFAULT_MAX_THINGS);
    }

    #[test]
    fn compat_mode_parses_snake_case() {
        let config = ConfigLoader::parse("compat = \"vanilla\"\nmax_things = 64\n").unwrap();
        assert!(config.is_vanilla());
        assert_eq!(config.max_things, 64);
    }

    #[test]
    fn zero_thing_limit_is_rejected() {
        assert!(ConfigLoader::parse("max_things = 0").is_err());
    }
}
