//! Formula constants loader.

use std::path::Path;

use arena_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`GameConfig`] from TOML files.
///
/// Every field is optional; missing ones keep their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> Result<GameConfig, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("base_interval = 2000\n").unwrap();
        assert_eq!(config.base_interval, 2000);
        assert_eq!(
            config.max_attacks_per_second,
            GameConfig::DEFAULT_MAX_ATTACKS_PER_SECOND
        );
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(ConfigLoader::parse("base_interval = \"fast\"\n").is_err());
    }
}
