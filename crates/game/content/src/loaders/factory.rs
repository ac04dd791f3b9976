//! Content factory for building [`Tables`] from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use arena_core::{EnemyPools, GameConfig, StageTable, Tables, TemplateCatalog};

use crate::loaders::{
    ConfigLoader, LoadResult, PoolLoader, StageLoader, StatTables, TablesLoader, TemplateLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      formula constants
/// ├── tables.toml      base stats and attribute tables
/// ├── stages.ron       stage index → kind, pool, enemy count
/// ├── pools.ron        pool id → template ids
/// └── templates.ron    enemy templates
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    pub fn load_stat_tables(&self) -> LoadResult<StatTables> {
        TablesLoader::load(&self.data_dir.join("tables.toml"))
    }

    pub fn load_stages(&self) -> LoadResult<StageTable> {
        StageLoader::load(&self.data_dir.join("stages.ron"))
    }

    pub fn load_pools(&self) -> LoadResult<EnemyPools> {
        PoolLoader::load(&self.data_dir.join("pools.ron"))
    }

    pub fn load_templates(&self) -> LoadResult<TemplateCatalog> {
        TemplateLoader::load(&self.data_dir.join("templates.ron"))
    }

    /// Loads every file and assembles validated [`Tables`].
    pub fn load_tables(&self) -> LoadResult<Tables> {
        let stats = self.load_stat_tables()?;
        let tables = Tables {
            config: self.load_config()?,
            base_stats: stats.base_stats,
            enemy_attributes: stats.enemy_attributes,
            player_attributes: stats.player_attributes,
            stages: self.load_stages()?,
            pools: self.load_pools()?,
            templates: self.load_templates()?,
        };

        tables
            .validate()
            .with_context(|| format!("Invalid content in {}", self.data_dir.display()))?;
        Ok(tables)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{StageConfig, StageKind, TableError};

    fn copy_bundled(dir: &Path) {
        let bundled = ContentFactory::bundled();
        for name in ["config.toml", "tables.toml", "stages.ron", "pools.ron", "templates.ron"] {
            std::fs::copy(bundled.data_dir().join(name), dir.join(name)).unwrap();
        }
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_content_matches_builtin_tables() {
        let tables = ContentFactory::bundled().load_tables().unwrap();
        assert_eq!(tables, Tables::builtin());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_tables().unwrap_err();
        assert!(err.to_string().contains("tables.toml"));
    }

    #[test]
    fn overridden_stage_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        copy_bundled(dir.path());
        std::fs::write(
            dir.path().join("stages.ron"),
            r#"{ 1: (kind: elite, pool: "elite", enemy_count: 2) }"#,
        )
        .unwrap();

        let tables = ContentFactory::new(dir.path()).load_tables().unwrap();
        assert_eq!(tables.stages.len(), 1);
        assert_eq!(
            tables.stages.get(1),
            Some(&StageConfig::new(StageKind::Elite, "elite", 2))
        );
    }

    #[test]
    fn invalid_content_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        copy_bundled(dir.path());
        std::fs::write(
            dir.path().join("stages.ron"),
            r#"{ 1: (kind: normal, pool: "normal", enemy_count: 0) }"#,
        )
        .unwrap();

        let err = ContentFactory::new(dir.path()).load_tables().unwrap_err();
        assert_eq!(
            err.downcast_ref::<TableError>(),
            Some(&TableError::EmptyStage { index: 1 })
        );
    }
}
