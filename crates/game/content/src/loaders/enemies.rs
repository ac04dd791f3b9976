//! Enemy pool and template loaders (`pools.ron`, `templates.ron`).

use std::path::Path;

use arena_core::{EnemyPools, EnemyTemplate, TemplateCatalog};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Loader for pool id → template ids.
///
/// ```ron
/// {
///     "normal": ["slime", "goblin", "bat"],
///     "boss": ["dragon"],
/// }
/// ```
pub struct PoolLoader;

impl PoolLoader {
    pub fn load(path: &Path) -> LoadResult<EnemyPools> {
        let content = read_file(path)?;
        ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse pool RON {}: {}", path.display(), e))
    }
}

/// Template catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFile {
    pub templates: Vec<EnemyTemplate>,
}

/// Loader for enemy templates.
///
/// Ids must be unique within the file.
pub struct TemplateLoader;

impl TemplateLoader {
    pub fn load(path: &Path) -> LoadResult<TemplateCatalog> {
        let content = read_file(path)?;
        let file: TemplateFile = ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse template RON {}: {}", path.display(), e)
        })?;

        let count = file.templates.len();
        let catalog = TemplateCatalog::new(file.templates);
        if catalog.len() != count {
            anyhow::bail!("Duplicate template id in {}", path.display());
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn templates_default_level_and_reward() {
        let file = write_temp(
            r#"(templates: [
                (id: "imp", name: "Imp", kind: "normal"),
                (id: "ogre", name: "Ogre", kind: "elite", level: 3, exp_reward: 30),
            ])"#,
        );
        let catalog = TemplateLoader::load(file.path()).unwrap();

        let imp = catalog.get("imp").unwrap();
        assert_eq!((imp.level, imp.exp_reward), (1, 0));
        assert_eq!(catalog.get("ogre").unwrap().level, 3);
    }

    #[test]
    fn duplicate_template_ids_are_rejected() {
        let file = write_temp(
            r#"(templates: [
                (id: "imp", name: "Imp", kind: "normal"),
                (id: "imp", name: "Other Imp", kind: "normal"),
            ])"#,
        );
        let err = TemplateLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Duplicate template id"));
    }

    #[test]
    fn pools_keep_template_order() {
        let file = write_temp(r#"{ "normal": ["slime", "bat"] }"#);
        let pools = PoolLoader::load(file.path()).unwrap();
        assert_eq!(
            pools.get("normal"),
            Some(&["slime".to_owned(), "bat".to_owned()][..])
        );
    }
}
