//! Stat tables loader (`tables.toml`).
//!
//! ```toml
//! player_attributes = { str = 8, dex = 6, vit = 8, agi = 10, ctr = 5 }
//!
//! [base_stats.player]
//! atk = 5
//! hp = 100
//! crd = 50
//!
//! [enemy_attributes.normal]
//! str = 10
//! # ...
//! ```

use std::path::Path;

use arena_core::{Attributes, BaseStatTable, EnemyAttributeTable, Tables};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Numeric tables stored in `tables.toml`. Omitted sections keep the built-in values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatTables {
    pub base_stats: BaseStatTable,
    pub enemy_attributes: EnemyAttributeTable,
    pub player_attributes: Attributes,
}

impl Default for StatTables {
    fn default() -> Self {
        let builtin = Tables::builtin();
        Self {
            base_stats: builtin.base_stats,
            enemy_attributes: builtin.enemy_attributes,
            player_attributes: builtin.player_attributes,
        }
    }
}

/// Loader for [`StatTables`] from TOML files.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<StatTables> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables TOML {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> Result<StatTables, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_the_builtin_tables() {
        assert_eq!(TablesLoader::parse("").unwrap(), StatTables::default());
    }

    #[test]
    fn sections_override_independently() {
        let tables = TablesLoader::parse(
            r#"
player_attributes = { str = 1, dex = 2, vit = 3, agi = 4, ctr = 5 }

[enemy_attributes.normal]
str = 12
dex = 10
vit = 10
agi = 10
ctr = 5

[enemy_attributes.elite]
str = 16
dex = 14
vit = 20
agi = 15
ctr = 10

[enemy_attributes.boss]
str = 25
dex = 20
vit = 45
agi = 20
ctr = 15
"#,
        )
        .unwrap();

        assert_eq!(tables.player_attributes, Attributes::new(1, 2, 3, 4, 5));
        assert_eq!(tables.enemy_attributes.normal.str, 12);
        assert_eq!(tables.base_stats, BaseStatTable::default());
    }
}
