//! Deterministic combat rules shared by the arena runtime and content tools.
//!
//! `arena-core` defines the canonical rules: attribute-to-stat derivation,
//! actors and their hit point invariant, damage resolution, action timers,
//! the stage state machine, and the static tables they read. Everything is
//! pure; the runtime owns all mutable state and event flow.
pub mod actor;
pub mod combat;
pub mod config;
pub mod error;
pub mod rng;
pub mod stage;
pub mod stats;
pub mod tables;

pub use actor::{
    ActorId, ActorState, DamageApplied, Enemy, EnemyKind, EnemyRoster, Player,
    StatusEffect, StatusEffectKind, StatusEffects, Vitals,
};
pub use combat::{ActionTimers, DamageRoll, SkillMultiplier, TimerEntry, resolve_damage};
pub use config::GameConfig;
pub use error::{ErrorSeverity, GameError};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};
pub use stage::{
    EnemyPools, EnemyTemplate, StageConfig, StageError, StageKind, StageMachine, StageOutcome,
    StagePhase, StageSignal, StageTable, TemplateCatalog,
};
pub use stats::{
    Attribute, Attributes, DerivedStats, EnemyStatCalculator, PlayerStatCalculator, StatBonuses,
    StatError,
};
pub use tables::{BaseStatTable, EnemyAttributeTable, TableError, Tables};
