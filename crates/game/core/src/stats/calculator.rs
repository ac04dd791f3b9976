//! Class-aware stat calculators.
//!
//! Both calculators run the same chain: attribute table → [`derive`] →
//! [`compose`] with the class base table → [`with_bonuses`]. They differ only
//! in where the attributes and base table come from.

use super::attributes::Attributes;
use super::bonus::StatBonuses;
use super::derived::{DerivedStats, compose, derive, with_bonuses};
use crate::actor::EnemyKind;
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::tables::Tables;

/// Errors raised by stat calculation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    /// The type tag does not name a known actor class.
    #[error("invalid actor type '{tag}'")]
    InvalidActorType { tag: String },

    #[error("cannot allocate {requested} points, only {available} unspent")]
    NotEnoughPoints { requested: u32, available: u32 },
}

impl GameError for StatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidActorType { .. } => ErrorSeverity::Internal,
            Self::NotEnoughPoints { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidActorType { .. } => "INVALID_ACTOR_TYPE",
            Self::NotEnoughPoints { .. } => "NOT_ENOUGH_POINTS",
        }
    }
}

/// Final stats for the player class.
#[derive(Clone, Copy, Debug)]
pub struct PlayerStatCalculator<'a> {
    base: &'a DerivedStats,
    config: &'a GameConfig,
}

impl<'a> PlayerStatCalculator<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        Self {
            base: &tables.base_stats.player,
            config: &tables.config,
        }
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    pub fn calculate(&self, attributes: &Attributes, equipment: &StatBonuses) -> DerivedStats {
        let composed = compose(self.base, &derive(attributes, self.config));
        with_bonuses(&composed, equipment, self.config)
    }
}

/// Attributes and stats produced for one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyStatBlock {
    pub kind: EnemyKind,
    pub attributes: Attributes,
    pub stats: DerivedStats,
}

/// Final stats for enemies, selected by type tag.
#[derive(Clone, Copy, Debug)]
pub struct EnemyStatCalculator<'a> {
    tables: &'a Tables,
}

impl<'a> EnemyStatCalculator<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        Self { tables }
    }

    /// Calculates attributes and stats for an enemy of `type_tag` at `level`.
    ///
    /// Attributes grow by `attribute_growth_per_level` percent for every
    /// level above 1. Unknown tags are an error, never a default.
    pub fn calculate(&self, type_tag: &str, level: u32) -> Result<EnemyStatBlock, StatError> {
        let kind: EnemyKind = type_tag.parse().map_err(|_| StatError::InvalidActorType {
            tag: type_tag.to_owned(),
        })?;

        let config = &self.tables.config;
        let growth = config
            .attribute_growth_per_level
            .saturating_mul(level.max(1) - 1);
        let attributes = self
            .tables
            .enemy_attributes
            .get(kind)
            .scaled(100u32.saturating_add(growth));

        let composed = compose(&self.tables.base_stats.enemy, &derive(&attributes, config));
        let stats = with_bonuses(&composed, &StatBonuses::new(), config);

        Ok(EnemyStatBlock {
            kind,
            attributes,
            stats,
        })
    }
}
