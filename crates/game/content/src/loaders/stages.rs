//! Stage table loader (`stages.ron`).

use std::path::Path;

use arena_core::StageTable;

use crate::loaders::{LoadResult, read_file};

/// Loader for the stage index → configuration table.
///
/// ```ron
/// {
///     1: (kind: normal, pool: "normal", enemy_count: 1),
///     5: (kind: boss, pool: "boss", enemy_count: 1),
/// }
/// ```
pub struct StageLoader;

impl StageLoader {
    pub fn load(path: &Path) -> LoadResult<StageTable> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse stage table RON {}: {}", path.display(), e)
        })
    }

    pub fn parse(content: &str) -> Result<StageTable, ron::error::SpannedError> {
        ron::from_str(content)
    }
}
