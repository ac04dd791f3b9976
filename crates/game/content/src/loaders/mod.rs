//! Content loaders for reading game data from files.
//!
//! TOML carries flat numeric tables (`config.toml`, `tables.toml`); RON
//! carries keyed catalogs (`stages.ron`, `pools.ron`, `templates.ron`).

pub mod config;
pub mod enemies;
pub mod factory;
pub mod stages;
pub mod tables;

pub use config::ConfigLoader;
pub use enemies::{PoolLoader, TemplateLoader};
pub use factory::ContentFactory;
pub use stages::StageLoader;
pub use tables::{StatTables, TablesLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
