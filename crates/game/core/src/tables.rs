//! Static configuration tables consumed read-only by the runtime.
//!
//! [`Tables::builtin`] carries the default content; `arena-content` builds
//! the same struct from data files. Tables are validated once at boot with
//! [`Tables::validate`] so content bugs surface before the first stage.

use crate::actor::EnemyKind;
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::stage::{EnemyPools, EnemyTemplate, StageConfig, StageKind, StageTable, TemplateCatalog};
use crate::stats::{Attributes, DerivedStats};

/// Flat base stats per actor class, added to the attribute portion.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStatTable {
    pub player: DerivedStats,
    pub enemy: DerivedStats,
}

impl Default for BaseStatTable {
    fn default() -> Self {
        Self {
            player: DerivedStats {
                atk: 5,
                hp: 100,
                crd: 50,
                ..DerivedStats::ZERO
            },
            enemy: DerivedStats {
                crd: 50,
                ..DerivedStats::ZERO
            },
        }
    }
}

/// Base attribute points per enemy type at level 1.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAttributeTable {
    pub normal: Attributes,
    pub elite: Attributes,
    pub boss: Attributes,
}

impl EnemyAttributeTable {
    pub fn get(&self, kind: EnemyKind) -> &Attributes {
        match kind {
            EnemyKind::Normal => &self.normal,
            EnemyKind::Elite => &self.elite,
            EnemyKind::Boss => &self.boss,
        }
    }
}

impl Default for EnemyAttributeTable {
    fn default() -> Self {
        Self {
            normal: Attributes::new(10, 10, 10, 10, 5),
            elite: Attributes::new(16, 14, 20, 15, 10),
            boss: Attributes::new(25, 20, 45, 20, 15),
        }
    }
}

/// Errors found while validating tables.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("template '{template}' has invalid type tag '{tag}'")]
    InvalidTemplateKind { template: String, tag: String },

    #[error("pool '{pool}' references unknown template '{template}'")]
    UnknownTemplate { pool: String, template: String },

    #[error("pool '{pool}' is empty")]
    EmptyPool { pool: String },

    #[error("stage {index} spawns no enemies")]
    EmptyStage { index: u32 },

    #[error("fallback pool '{pool}' is missing")]
    MissingFallbackPool { pool: &'static str },

    #[error("max_attacks_per_second must be positive")]
    InvalidAttackRate,
}

impl GameError for TableError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTemplateKind { .. } => "INVALID_TEMPLATE_KIND",
            Self::UnknownTemplate { .. } => "UNKNOWN_TEMPLATE",
            Self::EmptyPool { .. } => "EMPTY_POOL",
            Self::EmptyStage { .. } => "EMPTY_STAGE",
            Self::MissingFallbackPool { .. } => "MISSING_FALLBACK_POOL",
            Self::InvalidAttackRate => "INVALID_ATTACK_RATE",
        }
    }
}

/// Every static table the simulation reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tables {
    pub config: GameConfig,
    pub base_stats: BaseStatTable,
    pub enemy_attributes: EnemyAttributeTable,
    pub player_attributes: Attributes,
    pub stages: StageTable,
    pub pools: EnemyPools,
    pub templates: TemplateCatalog,
}

impl Tables {
    /// Built-in content: five stages ramping from one normal enemy to a boss.
    pub fn builtin() -> Self {
        let templates = TemplateCatalog::new([
            EnemyTemplate::new("slime", "Slime", "normal", 1, 10),
            EnemyTemplate::new("goblin", "Goblin", "normal", 1, 12),
            EnemyTemplate::new("bat", "Cave Bat", "normal", 1, 8),
            EnemyTemplate::new("orc_captain", "Orc Captain", "elite", 3, 40),
            EnemyTemplate::new("troll", "Troll", "elite", 4, 55),
            EnemyTemplate::new("dragon", "Ancient Dragon", "boss", 5, 200),
        ]);

        let pools = EnemyPools::new()
            .with_pool("normal", &["slime", "goblin", "bat"])
            .with_pool("elite", &["orc_captain", "troll"])
            .with_pool("boss", &["dragon"]);

        let stages = StageTable::new()
            .with_stage(1, StageConfig::new(StageKind::Normal, "normal", 1))
            .with_stage(2, StageConfig::new(StageKind::Normal, "normal", 2))
            .with_stage(3, StageConfig::new(StageKind::Normal, "normal", 3))
            .with_stage(4, StageConfig::new(StageKind::Elite, "elite", 1))
            .with_stage(5, StageConfig::new(StageKind::Boss, "boss", 1));

        Self {
            config: GameConfig::default(),
            base_stats: BaseStatTable::default(),
            enemy_attributes: EnemyAttributeTable::default(),
            player_attributes: Attributes::new(8, 6, 8, 10, 5),
            stages,
            pools,
            templates,
        }
    }

    /// Checks cross-table references and type tags.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.config.max_attacks_per_second == 0 {
            return Err(TableError::InvalidAttackRate);
        }

        for template in self.templates.iter() {
            if template.kind.parse::<EnemyKind>().is_err() {
                return Err(TableError::InvalidTemplateKind {
                    template: template.id.clone(),
                    tag: template.kind.clone(),
                });
            }
        }

        for (pool, template_ids) in self.pools.iter() {
            if template_ids.is_empty() {
                return Err(TableError::EmptyPool {
                    pool: pool.to_owned(),
                });
            }
            if let Some(missing) = template_ids
                .iter()
                .find(|id| self.templates.get(id).is_none())
            {
                return Err(TableError::UnknownTemplate {
                    pool: pool.to_owned(),
                    template: missing.clone(),
                });
            }
        }

        if let Some((index, _)) = self.stages.iter().find(|(_, stage)| stage.enemy_count == 0) {
            return Err(TableError::EmptyStage { index });
        }

        if self.pools.get(StageConfig::DEFAULT_POOL).is_none() {
            return Err(TableError::MissingFallbackPool {
                pool: StageConfig::DEFAULT_POOL,
            });
        }

        Ok(())
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::builtin()
    }
}
