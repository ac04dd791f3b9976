//! Event catalog.
//!
//! Every payload the modules exchange is a variant of [`Event`]. The
//! [`Topic`] enum is generated from the variants, so a topic can never exist
//! without a payload shape and vice versa.

use arena_core::{
    ActorId, Attribute, Attributes, DerivedStats, Enemy, SkillMultiplier, StageConfig,
    StageOutcome, StageSignal, StatBonuses, StatusEffectKind,
};
use serde::{Deserialize, Serialize};

/// A published event. Immutable once published; lives for one dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::EnumDiscriminants)]
#[strum_discriminants(
    name(Topic),
    derive(
        Hash,
        PartialOrd,
        Ord,
        Serialize,
        Deserialize,
        strum::Display,
        strum::IntoStaticStr,
        strum::EnumIter
    ),
    strum(serialize_all = "snake_case")
)]
pub enum Event {
    // ===== lifecycle =====
    /// Every module has been initialized.
    EngineBooted { modules: Vec<String> },
    /// Start signal; the stage module enters stage 1.
    GameStarted,
    /// External clock pulse carrying elapsed simulated time.
    Tick { elapsed: u64 },

    // ===== stage progression =====
    StageEntered {
        index: u32,
    },
    ConfigReady {
        index: u32,
        config: StageConfig,
        /// The index had no entry and the default configuration was used.
        fallback: bool,
    },
    EnemySpawnRequested {
        index: u32,
        pool: String,
        count: u32,
    },
    /// Enemies instantiated with hp 0, waiting for stat binding.
    EnemiesSpawned {
        index: u32,
        enemies: Vec<Enemy>,
    },
    StageCleared {
        index: u32,
    },
    StageFailed {
        index: u32,
    },
    RewardTriggered {
        index: u32,
        exp: u64,
    },

    // ===== combat =====
    CombatStarted {
        index: u32,
    },
    CombatEnded {
        outcome: StageOutcome,
    },
    AttackIntent {
        source: ActorId,
        target: ActorId,
        skill: SkillMultiplier,
    },
    DamageResolved {
        source: ActorId,
        target: ActorId,
        amount: u32,
        critical: bool,
    },

    // ===== actors =====
    ActorUpdated {
        actor: ActorId,
        hp: u32,
        max_hp: u32,
        alive: bool,
    },
    /// Published exactly once per actor, on the hit that took hp to 0.
    ActorDied {
        actor: ActorId,
    },
    StatChanged {
        actor: ActorId,
        stats: DerivedStats,
    },
    LevelUp {
        level: u32,
        unspent_points: u32,
    },

    // ===== inbound from collaborators =====
    AdvanceConfirmed,
    AttributePointsAllocated {
        attribute: Attribute,
        points: u32,
    },
    AttributesChanged {
        attributes: Attributes,
    },
    /// Additive delta over the player's accumulated equipment bonuses.
    EquipmentBonusChanged {
        delta: StatBonuses,
    },
    /// Multiplier consumed by the player's next attack intent.
    SkillMultiplierSet {
        multiplier: SkillMultiplier,
    },
    ExperienceGained {
        amount: u64,
    },
    StatusApplied {
        target: ActorId,
        kind: StatusEffectKind,
        duration: u64,
    },
}

impl Event {
    pub fn topic(&self) -> Topic {
        Topic::from(self)
    }
}

impl From<StageSignal> for Event {
    fn from(signal: StageSignal) -> Self {
        match signal {
            StageSignal::Entered { index } => Event::StageEntered { index },
            StageSignal::ConfigReady {
                index,
                config,
                fallback,
            } => Event::ConfigReady {
                index,
                config,
                fallback,
            },
            StageSignal::SpawnRequested { index, pool, count } => {
                Event::EnemySpawnRequested { index, pool, count }
            }
            StageSignal::Cleared { index } => Event::StageCleared { index },
            StageSignal::RewardTriggered { index, exp } => Event::RewardTriggered { index, exp },
            StageSignal::Failed { index } => Event::StageFailed { index },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn topic_follows_variant() {
        assert_eq!(Event::Tick { elapsed: 16 }.topic(), Topic::Tick);
        assert_eq!(
            Event::ActorDied {
                actor: ActorId(2)
            }
            .topic(),
            Topic::ActorDied
        );
        assert_eq!(Topic::DamageResolved.to_string(), "damage_resolved");
    }

    #[test]
    fn topic_names_are_unique() {
        let mut names: Vec<&'static str> = Topic::iter().map(Into::into).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn stage_signals_map_to_matching_topics() {
        let event: Event = StageSignal::RewardTriggered { index: 2, exp: 30 }.into();
        assert_eq!(event, Event::RewardTriggered { index: 2, exp: 30 });
        assert_eq!(
            Event::from(StageSignal::Failed { index: 1 }).topic(),
            Topic::StageFailed
        );
    }
}
