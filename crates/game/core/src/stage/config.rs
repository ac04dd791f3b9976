use std::collections::BTreeMap;

/// Stage type; informs reward and presentation, not the spawn logic.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StageKind {
    #[default]
    Normal,
    Elite,
    Boss,
}

/// Configuration of a single stage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageConfig {
    pub kind: StageKind,
    pub pool: String,
    pub enemy_count: u32,
}

impl StageConfig {
    /// Pool used when a stage is unconfigured and as the unknown-pool fallback.
    pub const DEFAULT_POOL: &'static str = "normal";

    pub fn new(kind: StageKind, pool: impl Into<String>, enemy_count: u32) -> Self {
        Self {
            kind,
            pool: pool.into(),
            enemy_count,
        }
    }
}

impl Default for StageConfig {
    /// Normal stage, normal pool, one enemy.
    fn default() -> Self {
        Self::new(StageKind::Normal, Self::DEFAULT_POOL, 1)
    }
}

/// Result of looking up a stage index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedStage {
    pub config: StageConfig,
    /// True when the index was unconfigured and the default was used.
    pub fallback: bool,
}

/// Static stage index → configuration mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StageTable {
    entries: BTreeMap<u32, StageConfig>,
}

impl StageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, index: u32, config: StageConfig) -> Self {
        self.insert(index, config);
        self
    }

    pub fn insert(&mut self, index: u32, config: StageConfig) {
        self.entries.insert(index, config);
    }

    pub fn get(&self, index: u32) -> Option<&StageConfig> {
        self.entries.get(&index)
    }

    /// Looks up a stage, falling back to [`StageConfig::default`].
    pub fn resolve(&self, index: u32) -> ResolvedStage {
        match self.entries.get(&index) {
            Some(config) => ResolvedStage {
                config: config.clone(),
                fallback: false,
            },
            None => ResolvedStage {
                config: StageConfig::default(),
                fallback: true,
            },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &StageConfig)> {
        self.entries.iter().map(|(index, config)| (*index, config))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
